//! Value objects for the chat domain.
//!
//! Constructors validate their input, so a value that exists is a value
//! that is well-formed.

use thiserror::Error;
use uuid::Uuid;

const CONNECTION_ID_MAX_CHARS: usize = 64;
const USERNAME_MAX_CHARS: usize = 32;
const MESSAGE_TEXT_MAX_CHARS: usize = 1000;

/// Validation errors for domain value objects
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("connection id must be at most {max} characters (got {got})")]
    ConnectionIdTooLong { max: usize, got: usize },

    #[error("username must not be empty or whitespace-only")]
    EmptyUsername,

    #[error("username must be at most {max} characters (got {got})")]
    UsernameTooLong { max: usize, got: usize },

    #[error("message text must not be empty")]
    EmptyMessageText,

    #[error("message text must be at most {max} characters (got {got})")]
    MessageTextTooLong { max: usize, got: usize },
}

/// Server-assigned identifier for one live channel.
///
/// Opaque to clients: assigned by [`ConnectionIdFactory`] when the channel
/// is accepted and gone when the channel closes. Inbound values are only
/// checked for shape, not for uuid-ness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        let got = value.chars().count();
        if got > CONNECTION_ID_MAX_CHARS {
            return Err(ValueObjectError::ConnectionIdTooLong {
                max: CONNECTION_ID_MAX_CHARS,
                got,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Factory for server-assigned connection ids (uuid v4)
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// Display name bound to a connection by an identity claim.
///
/// Surrounding whitespace is trimmed; whitespace-only claims are rejected.
/// Usernames are NOT unique across connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        let got = trimmed.chars().count();
        if got > USERNAME_MAX_CHARS {
            return Err(ValueObjectError::UsernameTooLong {
                max: USERNAME_MAX_CHARS,
                got,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Chat message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyMessageText);
        }
        let got = value.chars().count();
        if got > MESSAGE_TEXT_MAX_CHARS {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MESSAGE_TEXT_MAX_CHARS,
                got,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
