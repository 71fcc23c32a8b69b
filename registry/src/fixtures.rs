//! Built-in descriptor catalog served when no other source is configured

use chrono::Utc;
use shared::{LocalServerConfig, ServiceDescriptor, SharedResult};

use crate::catalog::Catalog;

/// The three-entry catalog used by the router end-to-end checks
pub fn fixture_descriptors() -> Vec<ServiceDescriptor> {
    let now = Utc::now();
    vec![
        ServiceDescriptor::local(
            "exact-server-name",
            "A test server for exact name matching exact-server-name",
            LocalServerConfig::new("node", ["test-server.js"]),
            now,
        ),
        ServiceDescriptor::local(
            "database-query-server",
            "Handles database queries and operations",
            LocalServerConfig::new("node", ["db-server.js"]),
            now,
        ),
        ServiceDescriptor::local(
            "file-server",
            "File management and operations server",
            LocalServerConfig::new("node", ["file-server.js"]),
            now,
        ),
    ]
}

pub fn fixture_catalog() -> SharedResult<Catalog> {
    Catalog::from_descriptors(fixture_descriptors())
}
