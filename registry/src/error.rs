//! Registry-specific error types

use thiserror::Error;
use shared::SharedError;

/// Catalog-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("MCP server not found: {name}")]
    NotFound { name: String },
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("MCP server not found: {name}")]
    NotFound { name: String },

    #[error("Catalog construction failed")]
    Catalog(#[from] SharedError),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RegistryError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this is a domain-level miss rather than a malfunction
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

impl From<CatalogError> for RegistryError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { name } => RegistryError::NotFound { name },
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
