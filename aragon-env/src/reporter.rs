//! Reporter capability used to surface resolution messages.

use std::cell::RefCell;

/// Sink for user-facing messages.
///
/// `error` is only called for unrecoverable configuration mismatches, right
/// before resolution fails; `debug` for informational notices.
pub trait Reporter {
    /// Reports a fatal configuration problem.
    fn error(&self, message: &str);
    /// Reports an informational notice.
    fn debug(&self, message: &str);
}

/// [`Reporter`] that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }
}

/// [`Reporter`] that keeps every message, for assertions.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    errors: RefCell<Vec<String>>,
    debugs: RefCell<Vec<String>>,
}

impl RecordingReporter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages passed to [`Reporter::error`].
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    /// Messages passed to [`Reporter::debug`].
    #[must_use]
    pub fn debugs(&self) -> Vec<String> {
        self.debugs.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_owned());
    }

    fn debug(&self, message: &str) {
        self.debugs.borrow_mut().push(message.to_owned());
    }
}
