//! Shared error types for the discovery system

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid descriptor {name}: {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("Duplicate descriptor name: {name}")]
    DuplicateName { name: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
