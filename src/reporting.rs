//! User-facing error reporting sink.
//!
//! Mutations swallow unexpected failures after handing them to this sink
//! with a short fixed message plus a detail payload. Calls are
//! fire-and-forget; no return value is consumed.

/// Side channel surfacing failures to the user.
pub trait ErrorReporter: Send + Sync {
    /// A failure the user must see (the mutation is abandoned).
    fn fatal(&self, message: &str, detail: &str);

    /// A degraded-but-continuing condition.
    fn warning(&self, message: &str, detail: &str);
}

/// Reporter that logs through `tracing`.
#[derive(Debug, Default, Clone)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn fatal(&self, message: &str, detail: &str) {
        tracing::error!(detail = %detail, "{message}");
    }

    fn warning(&self, message: &str, detail: &str) {
        tracing::warn!(detail = %detail, "{message}");
    }
}
