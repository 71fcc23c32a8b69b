//! Service implementations
//!
//! Real implementations of the registry's service traits.

pub mod memory_store;

pub use memory_store::InMemoryStore;
