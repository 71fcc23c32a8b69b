//! Service descriptor data model
//!
//! A descriptor describes one discoverable tool-serving endpoint: either a
//! locally launched subprocess or a set of remote backend endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Opaque tool metadata reported by a service. The registry only counts it.
pub type ToolDescriptor = serde_json::Value;

/// Transport tag for a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "stdio")]
    Stdio,
    #[serde(rename = "mcp-sse")]
    Sse,
    #[serde(rename = "mcp-streamable")]
    Streamable,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Stdio => "stdio",
            Protocol::Sse => "mcp-sse",
            Protocol::Streamable => "mcp-streamable",
        }
    }

    /// Whether this transport launches a local subprocess
    pub fn is_local(&self) -> bool {
        matches!(self, Protocol::Stdio)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to launch a locally served descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl LocalServerConfig {
    pub fn new(command: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reference to a remote backend serving a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendEndpoint {
    pub address: String,
    pub port: u16,
}

/// One discoverable tool-serving endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,
    pub description: String,
    pub protocol: Protocol,
    #[serde(default)]
    pub backend_endpoints: Vec<BackendEndpoint>,
    #[serde(default)]
    pub local_server_config: Option<LocalServerConfig>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl ServiceDescriptor {
    /// Descriptor for a service launched as a local subprocess
    pub fn local(
        name: impl Into<String>,
        description: impl Into<String>,
        config: LocalServerConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            protocol: Protocol::Stdio,
            backend_endpoints: Vec::new(),
            local_server_config: Some(config),
            enabled: true,
            tools: Vec::new(),
            create_time: now,
            update_time: now,
        }
    }

    /// Descriptor for a service reachable at remote endpoints
    pub fn remote(
        name: impl Into<String>,
        description: impl Into<String>,
        protocol: Protocol,
        endpoints: Vec<BackendEndpoint>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            protocol,
            backend_endpoints: endpoints,
            local_server_config: None,
            enabled: true,
            tools: Vec::new(),
            create_time: now,
            update_time: now,
        }
    }

    /// Check that the descriptor is either locally launched or remotely
    /// reachable, never both and never neither.
    pub fn validate(&self) -> SharedResult<()> {
        if self.name.is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        let local = self.local_server_config.is_some();
        let remote = !self.backend_endpoints.is_empty();
        match (local, remote) {
            (true, true) => Err(self.invalid("has both a local launch config and backend endpoints")),
            (false, false) => Err(self.invalid("has neither a local launch config nor backend endpoints")),
            (true, false) if !self.protocol.is_local() => {
                Err(self.invalid("local launch config requires the stdio protocol"))
            }
            _ => Ok(()),
        }
    }

    /// Case-insensitive substring match against name and description.
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    fn invalid(&self, reason: &str) -> SharedError {
        SharedError::InvalidDescriptor {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}
