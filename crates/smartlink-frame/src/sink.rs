//! Notification sink for codec diagnostics.
//!
//! The codec reports rejected frames and truncated text through a
//! [`LogSink`] handed to it at construction. With the `logging` feature
//! disabled every notification compiles away.

use std::fmt;
use std::sync::Arc;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives codec notifications.
pub trait LogSink: Send + Sync {
    fn log(&self, severity: Severity, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(Severity, &str) + Send + Sync,
{
    fn log(&self, severity: Severity, message: &str) {
        self(severity, message)
    }
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _severity: Severity, _message: &str) {}
}

/// Forwards notifications to the `tracing` dispatcher.
///
/// Without an installed subscriber the events are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}

/// Shared sink handle.
pub type SharedSink = Arc<dyn LogSink>;

pub(crate) fn emit(sink: &dyn LogSink, severity: Severity, message: &str) {
    if cfg!(feature = "logging") {
        sink.log(severity, message);
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::testing::RecordingSink;
    use super::*;

    #[test]
    fn closures_are_sinks() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let sink = move |_: Severity, _: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        emit(&sink, Severity::Warning, "one");
        emit(&sink, Severity::Error, "two");

        let expected = if cfg!(feature = "logging") { 2 } else { 0 };
        assert_eq!(hits.load(Ordering::SeqCst), expected);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::default();
        sink.log(Severity::Info, "first");
        sink.log(Severity::Error, "second");

        assert_eq!(
            sink.entries(),
            vec![
                (Severity::Info, "first".to_string()),
                (Severity::Error, "second".to_string())
            ]
        );
        assert_eq!(sink.count(Severity::Error), 1);
    }

    #[test]
    fn noop_and_tracing_sinks_accept_everything() {
        for severity in [
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
        ] {
            NoopSink.log(severity, "dropped");
            TracingSink.log(severity, "no subscriber installed");
        }
    }

    #[test]
    fn severity_labels() {
        assert_eq!(Severity::Warning.to_string(), "WARN");
        assert!(Severity::Error > Severity::Debug);
    }
}
