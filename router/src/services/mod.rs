//! Service implementations
//!
//! Real implementations of the router's I/O traits.

pub mod registry_client;
pub mod terminator;

pub use registry_client::HttpRegistryClient;
pub use terminator::ProcessTerminator;
