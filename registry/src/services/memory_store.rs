//! In-memory descriptor store
//!
//! Sole owner of the catalog. Reads take a shared lock; the tools update is
//! the only writer.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use shared::{
    PageData, PageRequest, ProcessId, ServiceDescriptor, ToolDescriptor, ToolsUpdateAck,
    process_debug, process_warn,
};

use crate::catalog::Catalog;
use crate::error::RegistryResult;
use crate::traits::DescriptorStore;

/// Real descriptor store implementation
#[derive(Clone)]
pub struct InMemoryStore {
    catalog: Arc<RwLock<Catalog>>,
    permissive_tools_update: bool,
}

impl InMemoryStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            permissive_tools_update: false,
        }
    }

    /// Acknowledge tools updates for unknown names instead of rejecting them
    /// (fluent API)
    pub fn with_permissive_tools_update(mut self, permissive: bool) -> Self {
        self.permissive_tools_update = permissive;
        self
    }

    pub async fn len(&self) -> usize {
        self.catalog.read().await.len()
    }
}

#[async_trait]
impl DescriptorStore for InMemoryStore {
    async fn list(&self, page: PageRequest) -> RegistryResult<PageData> {
        Ok(self.catalog.read().await.list(page))
    }

    async fn get(&self, name: &str) -> RegistryResult<Option<ServiceDescriptor>> {
        Ok(self.catalog.read().await.get_by_name(name).cloned())
    }

    async fn search(&self, keyword: &str) -> RegistryResult<Vec<ServiceDescriptor>> {
        Ok(self.catalog.read().await.search(keyword))
    }

    async fn update_tools(&self, name: &str, tools: Vec<ToolDescriptor>) -> RegistryResult<ToolsUpdateAck> {
        let tools_count = tools.len();
        let result = self.catalog.write().await.update_tools(name, tools, Utc::now());

        match result {
            Ok(update) => {
                process_debug!(
                    ProcessId::current(),
                    "Tools update for {}: {} tools (changed: {})",
                    name,
                    update.tools_count,
                    update.changed
                );
                Ok(ToolsUpdateAck {
                    mcp_name: name.to_string(),
                    tools_count: update.tools_count,
                })
            }
            Err(_) if self.permissive_tools_update => {
                process_warn!(
                    ProcessId::current(),
                    "Acknowledging tools update for unknown MCP server {} without effect",
                    name
                );
                Ok(ToolsUpdateAck {
                    mcp_name: name.to_string(),
                    tools_count,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}
