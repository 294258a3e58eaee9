//! UseCase 層
//!
//! リクエスト層から呼び出され、権限確認を行った上で Hub を操作します。

pub mod error;
pub mod fetch_history;
pub mod join_room;
pub mod list_members;
pub mod send_message;

pub use error::UseCaseError;
pub use fetch_history::{FetchHistoryUseCase, HistoryPage};
pub use join_room::JoinRoomUseCase;
pub use list_members::ListMembersUseCase;
pub use send_message::SendMessageUseCase;
