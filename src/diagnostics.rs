//! Diagnostics reporting for the pair-processing pipeline.
//!
//! The pipeline reports recoverable problems (e.g. malformed mate pairs)
//! through a [`Diagnostics`] sink passed in by the caller rather than
//! writing to a global logger directly. [`TracingDiagnostics`] forwards to
//! `tracing`; [`CollectingDiagnostics`] keeps messages in memory.

use std::sync::Mutex;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Sink for pipeline diagnostics
pub trait Diagnostics {
    fn report(&self, severity: Severity, message: &str);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}

/// Keeps every reported message
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl CollectingDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages reported so far
    #[must_use]
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Number of messages at or above `severity`
    #[must_use]
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.messages()
            .iter()
            .filter(|(s, _)| *s >= severity)
            .count()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, severity: Severity, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((severity, message.to_string()));
        }
    }
}
