//! Domain-level error types.

use thiserror::Error;

/// Errors raised by the online registry entity
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry member capacity exceeded")]
    CapacityExceeded,
}

/// Errors raised by registry repositories
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("registry member capacity exceeded")]
    CapacityExceeded,
}
