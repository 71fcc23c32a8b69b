//! Failure formatting for the fatal paths
//!
//! Every constructor here is total: whatever the failing value does while it
//! is being described, the result is a `Fault` that renders to one string.

use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::Cell;
use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};

pub const FORMAT_FAILED: &str = "<failure could not be formatted>";

const PANIC_KIND: &str = "panic";

thread_local! {
    static FORMATTING: Cell<bool> = const { Cell::new(false) };
}

/// True while this thread is inside a guarded formatting call. The panic
/// hook ignores panics raised there since they are caught and replaced.
pub(crate) fn is_formatting() -> bool {
    FORMATTING.with(Cell::get)
}

fn guarded<T>(f: impl FnOnce() -> T) -> Option<T> {
    let previous = FORMATTING.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f)).ok();
    FORMATTING.with(|flag| flag.set(previous));
    result
}

/// Backtrace lines, empty unless `RUST_BACKTRACE` enables capture
fn captured_backtrace() -> Vec<String> {
    let backtrace = Backtrace::capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }
    backtrace.to_string().lines().map(str::to_string).collect()
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// A described failure: optional kind, message and trace lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    kind: Option<String>,
    message: String,
    trace: Vec<String>,
}

impl Fault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            message: message.into(),
            trace: Vec::new(),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Kind is the error's type name, trace is its `source()` chain
    /// followed by the backtrace of the reporting site when one is captured
    pub fn from_error<E: Error + 'static>(err: &E) -> Self {
        let kind = short_type_name(std::any::type_name::<E>());
        let described = guarded(|| {
            let message = err.to_string();
            let mut trace = Vec::new();
            let mut source = err.source();
            while let Some(cause) = source {
                trace.push(format!("caused by: {cause}"));
                source = cause.source();
            }
            (message, trace)
        });

        let mut fault = match described {
            Some((message, trace)) => Self {
                kind: Some(kind),
                message,
                trace,
            },
            None => Self::new(kind, FORMAT_FAILED),
        };
        fault.trace.extend(captured_backtrace());
        fault
    }

    /// Describe a panic from its payload and location. A backtrace is
    /// appended when one was captured (`RUST_BACKTRACE` set).
    pub fn from_panic(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };

        let mut trace = Vec::new();
        if let Some(location) = location {
            trace.push(format!(
                "at {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            ));
        }
        trace.extend(captured_backtrace());

        Self {
            kind: Some(PANIC_KIND.to_string()),
            message,
            trace,
        }
    }

    /// Describe an arbitrary value. Objects carrying string `name` (or
    /// `kind`) and `message` fields are treated like errors, with an
    /// optional `stack` string as the trace. Anything else is rendered as
    /// JSON, then as `Debug` if serialization fails.
    pub fn from_value<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        if let Some(Ok(json)) = guarded(|| serde_json::to_value(value)) {
            if let Some(fault) = Self::from_error_like(&json) {
                return fault;
            }
            if let Ok(text) = serde_json::to_string(&json) {
                return Self::plain(text);
            }
        }

        match guarded(|| format!("{value:?}")) {
            Some(text) => Self::plain(text),
            None => Self::plain(FORMAT_FAILED),
        }
    }

    fn from_error_like(json: &Value) -> Option<Self> {
        let object = json.as_object()?;
        let kind = object
            .get("name")
            .or_else(|| object.get("kind"))?
            .as_str()?;
        let message = object.get("message")?.as_str()?;
        let trace = object
            .get("stack")
            .and_then(Value::as_str)
            .map(|stack| stack.lines().map(str::to_string).collect())
            .unwrap_or_default();

        Some(Self {
            kind: Some(kind.to_string()),
            message: message.to_string(),
            trace,
        })
    }

    fn plain(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
            trace: Vec::new(),
        }
    }

    /// `"<kind>: <message>"` with each trace line indented underneath
    pub fn render(&self) -> String {
        let mut out = match (&self.kind, self.message.is_empty()) {
            (Some(kind), false) => format!("{kind}: {}", self.message),
            (Some(kind), true) => kind.clone(),
            (None, _) => self.message.clone(),
        };
        for line in &self.trace {
            out.push_str("\n    ");
            out.push_str(line);
        }
        out
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render any serializable value as a single diagnostic string
pub fn format_fault<T>(value: &T) -> String
where
    T: Serialize + fmt::Debug + ?Sized,
{
    Fault::from_value(value).render()
}
