//! Router-specific error types

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Registry not ready after {waited:?}")]
    RegistryUnavailable {
        waited: Duration,
        #[source]
        source: Box<RouterError>,
    },

    #[error("Registry request failed: {message}")]
    Registry { message: String },

    #[error("Lifecycle is draining, refusing new work: {task}")]
    Draining { task: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl RouterError {
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
