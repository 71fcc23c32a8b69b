//! The single funnel for every process-fatal path

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

use shared::{ProcessId, process_debug, process_error};

use super::fault::Fault;
use super::state::{LifecycleState, StateCell};
use crate::traits::Terminator;

pub const FATAL_EXIT_CODE: i32 = 1;

/// Where a fatal failure was caught
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultOrigin {
    StartupFailure,
    UnhandledAsyncFailure { task: String },
    UncaughtFault,
}

impl fmt::Display for FaultOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartupFailure => f.write_str("startup failure"),
            Self::UnhandledAsyncFailure { task } => write!(f, "unhandled async failure in '{task}'"),
            Self::UncaughtFault => f.write_str("uncaught fault"),
        }
    }
}

/// Logs the first fatal failure once, marks the lifecycle stopped and exits
/// the process after `grace_period`. Every later trip is dropped.
pub struct FatalSink {
    tripped: AtomicBool,
    notify: Notify,
    state: Arc<StateCell>,
    terminator: Arc<dyn Terminator>,
    grace_period: Duration,
}

impl FatalSink {
    pub fn new(state: Arc<StateCell>, terminator: Arc<dyn Terminator>, grace_period: Duration) -> Self {
        Self {
            tripped: AtomicBool::new(false),
            notify: Notify::new(),
            state,
            terminator,
            grace_period,
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// Returns true if this call was the one that tripped the sink
    pub fn trip(&self, origin: FaultOrigin, fault: Fault) -> bool {
        if self.tripped.swap(true, Ordering::SeqCst) {
            process_debug!(ProcessId::current(), "Dropping fatal report after the first: {}", origin);
            return false;
        }

        self.state.advance(LifecycleState::Stopped);
        process_error!(
            ProcessId::current(),
            origin = %origin,
            kind = fault.kind().unwrap_or("value"),
            "💀 Fatal {}: {}",
            origin,
            fault.render()
        );
        self.notify.notify_waiters();
        self.schedule_exit();
        true
    }

    /// Resolves once the sink has been tripped
    pub async fn tripped(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_tripped() {
                return;
            }
            notified.await;
        }
    }

    // A plain thread so the exit still happens if the runtime is wedged
    fn schedule_exit(&self) {
        let terminator = Arc::clone(&self.terminator);
        let grace_period = self.grace_period;
        let spawned = std::thread::Builder::new()
            .name("fatal-exit".to_string())
            .spawn(move || {
                std::thread::sleep(grace_period);
                terminator.exit(FATAL_EXIT_CODE);
            });

        if spawned.is_err() {
            self.terminator.exit(FATAL_EXIT_CODE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockTerminator;
    use mockall::predicate::eq;

    fn sink_with(terminator: MockTerminator, grace: Duration) -> (Arc<StateCell>, FatalSink) {
        let state = Arc::new(StateCell::new());
        let sink = FatalSink::new(Arc::clone(&state), Arc::new(terminator), grace);
        (state, sink)
    }

    #[test]
    fn test_first_trip_wins_and_exits_once() {
        let mut terminator = MockTerminator::new();
        terminator.expect_exit().with(eq(1)).times(1).return_const(());
        let (state, sink) = sink_with(terminator, Duration::from_millis(5));

        assert!(sink.trip(FaultOrigin::StartupFailure, Fault::new("RouterError", "first")));
        assert!(!sink.trip(FaultOrigin::UncaughtFault, Fault::new("panic", "second")));
        assert!(sink.is_tripped());
        assert_eq!(state.get(), LifecycleState::Stopped);

        std::thread::sleep(Duration::from_millis(200));
        // Dropping the sink verifies the single exit call
    }

    #[test]
    fn test_exit_waits_for_grace_period() {
        let mut terminator = MockTerminator::new();
        terminator.expect_exit().times(1).return_const(());
        let (_, sink) = sink_with(terminator, Duration::from_millis(150));

        sink.trip(FaultOrigin::UncaughtFault, Fault::new("panic", "boom"));
        std::thread::sleep(Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_tripped_resolves_for_late_and_early_waiters() {
        let mut terminator = MockTerminator::new();
        terminator.expect_exit().return_const(());
        let (_, sink) = sink_with(terminator, Duration::ZERO);
        let sink = Arc::new(sink);

        let waiter = {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move { sink.tripped().await })
        };
        tokio::task::yield_now().await;
        sink.trip(
            FaultOrigin::UnhandledAsyncFailure { task: "refresh".to_string() },
            Fault::new("RouterError", "gone"),
        );

        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
        tokio::time::timeout(Duration::from_secs(1), sink.tripped()).await.unwrap();
    }

    #[test]
    fn test_origin_display() {
        let origin = FaultOrigin::UnhandledAsyncFailure { task: "refresh".to_string() };
        assert_eq!(origin.to_string(), "unhandled async failure in 'refresh'");
        assert_eq!(FaultOrigin::StartupFailure.to_string(), "startup failure");
    }
}
