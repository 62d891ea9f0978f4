/*!
 * Progress and result delivery interfaces.
 *
 * The job converts the pipeline's (completed, total, description) callbacks
 * into an integer percentage and forwards them to a [`ProgressSink`] while it
 * is running; callbacks that race past the terminal transition are dropped.
 * The terminal outcome goes to exactly one [`ResultSink`], exactly once.
 */

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receiver of progress updates while a job runs
pub trait ProgressSink: Send + Sync {
    /// Called with a percentage in [0, 100] and a human-readable description
    fn on_progress(&self, percent: u8, description: &str);
}

/// Receiver of a job's single terminal outcome
pub trait ResultSink: Send + Sync {
    /// The job completed; `mono_path` is the monolingual artifact
    fn on_completed(&self, mono_path: &Path);

    /// The job failed with a human-readable message
    fn on_failed(&self, message: &str);

    /// The job was cooperatively cancelled
    fn on_cancelled(&self);
}

/// Convert completed/total units into a clamped percentage
pub(crate) fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (completed.saturating_mul(100) / total).min(100) as u8
}

/// Running-gated relay in front of a [`ProgressSink`].
///
/// Cloned into the pipeline's progress callback; once [`ProgressRelay::disarm`]
/// runs, later callbacks are silently dropped.
#[derive(Clone)]
pub(crate) struct ProgressRelay {
    sink: Arc<dyn ProgressSink>,
    running: Arc<AtomicBool>,
}

impl ProgressRelay {
    pub(crate) fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            sink,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Forward one pipeline callback, unless the job already terminated
    pub(crate) fn report(&self, completed: usize, total: usize, description: &str) {
        if self.running.load(Ordering::SeqCst) {
            self.sink.on_progress(percent(completed, total), description);
        }
    }

    /// Stop forwarding; called at the terminal transition
    pub(crate) fn disarm(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
