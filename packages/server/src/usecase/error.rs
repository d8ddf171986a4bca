//! UseCase error types.

use thiserror::Error;

/// Errors from the identity-claim usecase
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    /// The registry is at member capacity; the claim is dropped
    #[error("online registry is full")]
    RegistryFull,
}

/// Errors from the message-relay usecase
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The sending connection holds no identity; nothing is broadcast
    #[error("connection '{0}' is not identified")]
    UnidentifiedSender(String),

    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}
