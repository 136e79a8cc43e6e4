//! Progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receiver of progress reports from a long-running matching pass.
///
/// Consulted periodically between pair scoring steps, never preemptively.
pub trait ProgressSink {
    /// Report coarse progress.
    fn report_progress(&self, done: usize, total: usize, label: &str);

    /// Whether the run should stop at the next check.
    fn is_cancelled(&self) -> bool;
}

/// Sink that ignores progress and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report_progress(&self, _done: usize, _total: usize, _label: &str) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shareable cancellation flag.
///
/// Clones share the same flag, so a UI thread can cancel a matching pass
/// running elsewhere. Progress is logged at trace level.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// New, not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Clear a previous request
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}

impl ProgressSink for CancelFlag {
    fn report_progress(&self, done: usize, total: usize, label: &str) {
        log::trace!("{}: {}/{}", label, done, total);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
