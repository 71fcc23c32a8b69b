//! Service trait definitions for dependency injection
//!
//! The facade reaches the catalog only through this trait, so handlers can be
//! tested against a mock store.

use async_trait::async_trait;

use shared::{PageData, PageRequest, ServiceDescriptor, ToolDescriptor, ToolsUpdateAck};
use crate::error::RegistryResult;

/// Descriptor store backing the registry facade
#[mockall::automock]
#[async_trait]
pub trait DescriptorStore: Send + Sync {
    /// One page of descriptor summaries plus the full catalog size
    async fn list(&self, page: PageRequest) -> RegistryResult<PageData>;

    /// Exact-name lookup; `Ok(None)` when the name is absent
    async fn get(&self, name: &str) -> RegistryResult<Option<ServiceDescriptor>>;

    /// Keyword search over names and descriptions
    async fn search(&self, keyword: &str) -> RegistryResult<Vec<ServiceDescriptor>>;

    /// Record new tool metadata for a named descriptor
    async fn update_tools(&self, name: &str, tools: Vec<ToolDescriptor>) -> RegistryResult<ToolsUpdateAck>;
}
