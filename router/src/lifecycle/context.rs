//! Supervised background work for a dependent task

use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;

use shared::{ProcessId, process_debug, process_warn};

use super::fault::Fault;
use super::sink::{FatalSink, FaultOrigin};
use crate::error::{RouterError, RouterResult};

struct Supervision {
    tasks: Mutex<JoinSet<()>>,
    shutdown_tx: watch::Sender<bool>,
    sink: Arc<FatalSink>,
}

/// Handle given to a `DependentTask`. Cloning shares the same supervision.
#[derive(Clone)]
pub struct TaskContext {
    inner: Arc<Supervision>,
}

impl TaskContext {
    pub fn new(sink: Arc<FatalSink>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Supervision {
                tasks: Mutex::new(JoinSet::new()),
                shutdown_tx,
                sink,
            }),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `fut` in the background. An `Err` result or a panic that nobody
    /// observes trips the fatal sink. Refused once draining has begun.
    pub fn spawn<F, E>(&self, name: &str, fut: F) -> RouterResult<()>
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + 'static,
    {
        let mut tasks = self.tasks();
        if self.is_draining() {
            return Err(RouterError::Draining {
                task: name.to_string(),
            });
        }

        let sink = Arc::clone(&self.inner.sink);
        let task = name.to_string();
        process_debug!(ProcessId::current(), "Spawning supervised task '{}'", task);
        tasks.spawn(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(())) => {
                    process_debug!(ProcessId::current(), "Supervised task '{}' finished", task);
                }
                Ok(Err(err)) => {
                    sink.trip(
                        FaultOrigin::UnhandledAsyncFailure { task },
                        Fault::from_error(&err),
                    );
                }
                Err(payload) => {
                    sink.trip(FaultOrigin::UncaughtFault, Fault::from_panic(payload.as_ref(), None));
                }
            }
        });
        Ok(())
    }

    /// Receiver that flips to `true` when draining begins
    pub fn shutdown_requested(&self) -> watch::Receiver<bool> {
        self.inner.shutdown_tx.subscribe()
    }

    pub fn is_draining(&self) -> bool {
        *self.inner.shutdown_tx.borrow()
    }

    pub fn in_flight(&self) -> usize {
        self.tasks().len()
    }

    /// Signal draining and refuse further spawns
    pub(crate) fn begin_drain(&self) {
        let _tasks = self.tasks();
        self.inner.shutdown_tx.send_replace(true);
    }

    /// Wait for supervised work to finish within `timeout`, aborting
    /// whatever is still running afterwards. Returns the number aborted.
    pub(crate) async fn wait_idle(&self, timeout: Duration) -> usize {
        let mut tasks = std::mem::take(&mut *self.tasks());

        let drained = tokio::time::timeout(timeout, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;

        if drained.is_ok() {
            return 0;
        }

        let stuck = tasks.len();
        process_warn!(
            ProcessId::current(),
            "⚠️ {} supervised task(s) still running after {:?}, aborting",
            stuck,
            timeout
        );
        tasks.shutdown().await;
        stuck
    }
}
