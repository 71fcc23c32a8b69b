//! MCP discovery registry
//!
//! Serves paginated listing, exact-name lookup and keyword search over an
//! in-memory descriptor catalog, and accepts tools-update notifications for
//! catalog entries.

pub mod catalog;
pub mod error;
pub mod fixtures;
pub mod registry_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod web;

// Re-export main types
pub use catalog::{Catalog, ToolsUpdate};
pub use error::{CatalogError, RegistryError, RegistryResult};
pub use registry_impl::RegistryServer;
pub use services::InMemoryStore;
pub use state::RegistryState;
pub use traits::DescriptorStore;
