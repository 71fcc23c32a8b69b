//! Lifecycle state machine

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use shared::{ProcessId, process_debug};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LifecycleState {
    Starting = 0,
    Running = 1,
    Draining = 2,
    Stopped = 3,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Running,
            2 => Self::Draining,
            _ => Self::Stopped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic holder for the current state. Moves are forward only, so once
/// `Stopped` is reached nothing can bring the process back to `Running`.
#[derive(Debug)]
pub struct StateCell {
    raw: AtomicU8,
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCell {
    pub fn new() -> Self {
        Self {
            raw: AtomicU8::new(LifecycleState::Starting as u8),
        }
    }

    pub fn get(&self) -> LifecycleState {
        LifecycleState::from_u8(self.raw.load(Ordering::SeqCst))
    }

    /// Move to `next` if it lies ahead of the current state.
    /// Returns false if the move was refused.
    pub fn advance(&self, next: LifecycleState) -> bool {
        let result = self
            .raw
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (next as u8 > current).then_some(next as u8)
            });

        match result {
            Ok(_) => true,
            Err(current) => {
                process_debug!(
                    ProcessId::current(),
                    "Ignoring lifecycle transition {} -> {}",
                    LifecycleState::from_u8(current),
                    next
                );
                false
            }
        }
    }
}
