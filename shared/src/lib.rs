//! Shared types for the MCP discovery system
//!
//! Contains the descriptor data model and wire envelopes exchanged between the
//! registry and the router, plus the logging and signal plumbing both
//! binaries use.

pub mod descriptor;
pub mod errors;
pub mod logging;
pub mod messages;
pub mod signals;
pub mod types;

pub use descriptor::{BackendEndpoint, LocalServerConfig, Protocol, ServiceDescriptor, ToolDescriptor};
pub use errors::*;
pub use messages::{
    ApiResponse, DescriptorSummary, PageData, PageRequest, ToolsUpdateAck, ToolsUpdateRequest,
};
pub use types::ProcessId;
