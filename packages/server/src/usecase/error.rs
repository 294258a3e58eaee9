//! UseCase 層のエラー定義

use thiserror::Error;

use crate::{domain::AccessError, hub::HubError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UseCaseError {
    /// 参加者がルームを利用する権限を持たない、または権限確認ができない
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Hub がリクエストを処理できなかった
    #[error(transparent)]
    Hub(#[from] HubError),
}
