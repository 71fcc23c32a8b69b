//! Router process library
//!
//! Lifecycle management for the router process and a minimal router that
//! reads the service registry over HTTP.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod router;
pub mod services;
pub mod traits;

pub use config::{LifecycleConfig, RouterConfig};
pub use error::{RouterError, RouterResult};
pub use lifecycle::{Fault, FaultOrigin, LifecycleManager, LifecycleState, Outcome, TaskContext};
pub use router::{Resolution, Router};
pub use services::{HttpRegistryClient, ProcessTerminator};
pub use traits::{DependentTask, RegistryClient, Terminator};
