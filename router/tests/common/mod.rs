//! Shared helpers for router integration tests
#![allow(dead_code)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use router::{LifecycleConfig, Terminator};

/// Records exit codes instead of exiting
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    codes: Mutex<Vec<i32>>,
}

impl RecordingTerminator {
    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().unwrap().clone()
    }

    /// Poll until an exit was requested or `within` elapsed
    pub async fn wait_for_exit(&self, within: Duration) -> Vec<i32> {
        let deadline = tokio::time::Instant::now() + within;
        while self.codes().is_empty() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.codes()
    }
}

impl Terminator for RecordingTerminator {
    fn exit(&self, code: i32) {
        self.codes.lock().unwrap().push(code);
    }
}

/// Collects the message of every ERROR event
#[derive(Clone, Default)]
pub struct ErrorLines {
    count: Arc<AtomicUsize>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl ErrorLines {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for ErrorLines {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::ERROR {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.count.fetch_add(1, Ordering::SeqCst);
        self.lines.lock().unwrap().push(visitor.0);
    }
}

pub fn fast_lifecycle() -> LifecycleConfig {
    LifecycleConfig {
        grace_period: Duration::from_millis(20),
        drain_timeout: Duration::from_secs(1),
        trap_panics: false,
    }
}

pub fn terminator() -> (Arc<RecordingTerminator>, Arc<dyn Terminator>) {
    let recording = Arc::new(RecordingTerminator::default());
    let as_terminator: Arc<dyn Terminator> = recording.clone();
    (recording, as_terminator)
}
