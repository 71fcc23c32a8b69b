//! Drives one dependent task through start, run and drain

use futures_util::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use shared::{ProcessId, logging, process_info, process_warn};

use super::context::TaskContext;
use super::fault::{self, Fault};
use super::sink::{FATAL_EXIT_CODE, FatalSink, FaultOrigin};
use super::state::{LifecycleState, StateCell};
use crate::config::LifecycleConfig;
use crate::traits::{DependentTask, Terminator};

/// How `LifecycleManager::run` ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Drained after a shutdown request
    Clean,
    /// The fatal sink tripped and has scheduled the process exit
    Fatal,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Fatal => FATAL_EXIT_CODE,
        }
    }
}

pub struct LifecycleManager {
    config: LifecycleConfig,
    state: Arc<StateCell>,
    sink: Arc<FatalSink>,
}

impl LifecycleManager {
    pub fn new(config: LifecycleConfig, terminator: Arc<dyn Terminator>) -> Self {
        let state = Arc::new(StateCell::new());
        let sink = Arc::new(FatalSink::new(
            Arc::clone(&state),
            terminator,
            config.grace_period,
        ));
        Self { config, state, sink }
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub fn sink(&self) -> Arc<FatalSink> {
        Arc::clone(&self.sink)
    }

    /// Replace the process panic hook with one that reports to the sink.
    /// The default hook is not chained, so a panic is reported exactly once.
    fn install_traps(&self) {
        if !self.config.trap_panics {
            return;
        }
        let sink = Arc::clone(&self.sink);
        panic::set_hook(Box::new(move |info| {
            if fault::is_formatting() {
                return;
            }
            sink.trip(
                FaultOrigin::UncaughtFault,
                Fault::from_panic(info.payload(), info.location()),
            );
        }));
    }

    /// Run `task` until `shutdown` resolves or a fatal failure is caught
    pub async fn run<T, F>(&self, task: &mut T, shutdown: F) -> Outcome
    where
        T: DependentTask + ?Sized,
        F: Future<Output = ()>,
    {
        // Traps go in before any of the task's work can fail
        self.install_traps();
        let ctx = TaskContext::new(Arc::clone(&self.sink));
        logging::log_startup(ProcessId::current(), "dependent task");

        let started = tokio::select! {
            result = AssertUnwindSafe(task.start(&ctx)).catch_unwind() => result,
            _ = self.sink.tripped() => return Outcome::Fatal,
        };
        match started {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.sink.trip(FaultOrigin::StartupFailure, Fault::from_error(&err));
                return Outcome::Fatal;
            }
            Err(payload) => {
                self.sink.trip(
                    FaultOrigin::StartupFailure,
                    Fault::from_panic(payload.as_ref(), None),
                );
                return Outcome::Fatal;
            }
        }

        if !self.state.advance(LifecycleState::Running) {
            return Outcome::Fatal;
        }
        logging::log_success(ProcessId::current(), "Router started successfully");

        tokio::select! {
            _ = self.sink.tripped() => return Outcome::Fatal,
            _ = shutdown => {}
        }

        if !self.state.advance(LifecycleState::Draining) {
            return Outcome::Fatal;
        }
        logging::log_shutdown(ProcessId::current(), "termination signal received");
        ctx.begin_drain();

        match AssertUnwindSafe(task.shutdown()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                process_warn!(ProcessId::current(), "⚠️ Task shutdown reported an error: {}", err);
            }
            Err(payload) => {
                self.sink.trip(
                    FaultOrigin::UncaughtFault,
                    Fault::from_panic(payload.as_ref(), None),
                );
                return Outcome::Fatal;
            }
        }

        let aborted = ctx.wait_idle(self.config.drain_timeout).await;
        if self.sink.is_tripped() || !self.state.advance(LifecycleState::Stopped) {
            return Outcome::Fatal;
        }
        if aborted > 0 {
            process_info!(ProcessId::current(), "Aborted {} task(s) during drain", aborted);
        }
        logging::log_success(ProcessId::current(), "Router shut down cleanly");
        Outcome::Clean
    }
}
