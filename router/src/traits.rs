//! Trait definitions with mockall annotations for testing
//!
//! The lifecycle manager drives a `DependentTask`, the router reads the
//! registry through a `RegistryClient`, and process exit goes through a
//! `Terminator` so the fatal path can be observed in tests.

use shared::{PageData, PageRequest, ServiceDescriptor};

use crate::error::RouterResult;
use crate::lifecycle::TaskContext;

/// The unit of work whose lifetime the lifecycle manager governs
#[mockall::automock]
#[async_trait::async_trait]
pub trait DependentTask: Send {
    /// Bring the task up. Background work must be spawned through `ctx`
    /// so that its failures reach the fatal sink.
    async fn start(&mut self, ctx: &TaskContext) -> RouterResult<()>;

    /// Stop accepting new work. Called once when draining begins.
    async fn shutdown(&mut self) -> RouterResult<()>;
}

/// Read-only view of the registry facade
#[mockall::automock]
#[async_trait::async_trait]
pub trait RegistryClient: Send + Sync {
    async fn list(&self, page: PageRequest) -> RouterResult<PageData>;

    /// `Ok(None)` when the registry reports the name as unknown
    async fn get(&self, name: &str) -> RouterResult<Option<ServiceDescriptor>>;

    async fn search(&self, keyword: &str) -> RouterResult<Vec<ServiceDescriptor>>;
}

/// Process exit abstraction
#[mockall::automock]
pub trait Terminator: Send + Sync {
    fn exit(&self, code: i32);
}
