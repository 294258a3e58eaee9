//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length (in characters) of room and participant identifiers.
pub const MAX_IDENTIFIER_LEN: usize = 100;

/// Default maximum length (in characters) of a message body.
pub const DEFAULT_MAX_BODY_LEN: usize = 1000;

/// Display name used when the request layer could not resolve one.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown User";

fn check_identifier(
    value: &str,
    empty: ValueObjectError,
    too_long: impl FnOnce(usize) -> ValueObjectError,
) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(empty);
    }
    let len = value.chars().count();
    if len > MAX_IDENTIFIER_LEN {
        return Err(too_long(len));
    }
    Ok(())
}

/// Participant identifier value object.
///
/// Issued by the external identity provider; the hub treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a new ParticipantId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or longer than [`MAX_IDENTIFIER_LEN`].
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        check_identifier(&id, ValueObjectError::ParticipantIdEmpty, |actual| {
            ValueObjectError::ParticipantIdTooLong {
                max: MAX_IDENTIFIER_LEN,
                actual,
            }
        })?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParticipantId> for String {
    fn from(value: ParticipantId) -> Self {
        value.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// A room is a pool's broadcast domain. The pool itself is owned elsewhere;
/// the hub only looks rooms up by this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or longer than [`MAX_IDENTIFIER_LEN`].
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        check_identifier(&id, ValueObjectError::RoomIdEmpty, |actual| {
            ValueObjectError::RoomIdTooLong {
                max: MAX_IDENTIFIER_LEN,
                actual,
            }
        })?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomId> for String {
    fn from(value: RoomId) -> Self {
        value.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name snapshot taken when a participant attaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty. The identity provider has
    /// already vetted it, so no length limit applies.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        Ok(Self(name))
    }

    /// Placeholder used when no display name is available.
    pub fn unknown() -> Self {
        Self(UNKNOWN_DISPLAY_NAME.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message body value object.
///
/// Length is counted in characters (Unicode scalar values), not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody(String);

impl MessageBody {
    /// Create a new MessageBody no longer than `max_len` characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is empty or exceeds `max_len`.
    pub fn new(body: String, max_len: usize) -> Result<Self, ValueObjectError> {
        if body.is_empty() {
            return Err(ValueObjectError::MessageBodyEmpty);
        }
        let len = body.chars().count();
        if len > max_len {
            return Err(ValueObjectError::MessageBodyTooLong {
                max: max_len,
                actual: len,
            });
        }
        Ok(Self(body))
    }

    /// Body of a hub-generated notice. Not subject to the client length limit.
    pub(crate) fn notice(text: String) -> Self {
        Self(text)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by the message store on append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Written by a participant.
    #[default]
    User,
    /// Generated by the hub (join/leave notices).
    System,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Timestamp for the current instant.
    pub fn now() -> Self {
        Self(huddle_shared::time::now_millis())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Format as an RFC 3339 string.
    pub fn to_rfc3339(&self) -> String {
        huddle_shared::time::timestamp_to_rfc3339(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
