//! HTTP surface of the registry facade

pub mod handlers;

pub use handlers::RegistryApp;
