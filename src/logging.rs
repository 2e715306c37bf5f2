use std::fmt;

/// Logger scoped to one submission.
///
/// Every event carries a `submission` field (the client's network origin,
/// or `-` when the transport did not report one) so the stages of a single
/// submission can be correlated. Callers must not pass recipient addresses
/// at `info` or above.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionLog<'a> {
    submission: &'a str,
}

impl<'a> SubmissionLog<'a> {
    /// Creates a logger for the submission from `origin`.
    pub fn new(origin: &'a str) -> Self {
        let submission = if origin.is_empty() { "-" } else { origin };
        Self { submission }
    }

    /// Returns the submission identifier attached to every event.
    pub fn submission(&self) -> &str {
        self.submission
    }

    /// Logs an info-level message.
    ///
    /// ```no_run
    /// # use formrelay_core::SubmissionLog;
    /// let log = SubmissionLog::new("203.0.113.7");
    /// log.info(format_args!("envelope sent to {} recipient(s)", 2));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(submission = %self.submission, "{}", args);
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(submission = %self.submission, "{}", args);
    }

    /// Logs an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(submission = %self.submission, "{}", args);
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(submission = %self.submission, "{}", args);
    }
}
