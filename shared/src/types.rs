//! Process identity shared by every binary in the workspace

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Identifier tagging every log event with the emitting process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// Discovery registry serving the descriptor catalog
    Registry,
    /// Router host supervising the dependent router task
    Router,
    /// No process identity initialized (library use, tests)
    Unassigned,
}

impl ProcessId {
    /// Initialize the global process ID for the registry
    pub fn init_registry() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Registry)
    }

    /// Initialize the global process ID for the router host
    pub fn init_router() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Router)
    }

    /// Get the global process ID, `Unassigned` until an init_* call
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get().unwrap_or(&ProcessId::Unassigned)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessId::Registry => "registry",
            ProcessId::Router => "router",
            ProcessId::Unassigned => "unassigned",
        }
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
