//! Process lifecycle: state machine, fault traps and drain

pub mod context;
pub mod fault;
pub mod manager;
pub mod sink;
pub mod state;

pub use context::TaskContext;
pub use fault::{FORMAT_FAILED, Fault, format_fault};
pub use manager::{LifecycleManager, Outcome};
pub use sink::{FATAL_EXIT_CODE, FatalSink, FaultOrigin};
pub use state::{LifecycleState, StateCell};
