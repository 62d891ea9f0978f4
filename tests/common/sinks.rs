/*!
 * Recording progress and result sinks for testing
 */

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use papertrans::job::{ProgressSink, ResultSink};

/// Progress sink that records every forwarded update
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub updates: Mutex<Vec<(u8, String)>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

impl ProgressSink for RecordingProgress {
    fn on_progress(&self, percent: u8, description: &str) {
        self.updates
            .lock()
            .unwrap()
            .push((percent, description.to_string()));
    }
}

/// Result sink that records every terminal notification
#[derive(Debug, Default)]
pub struct RecordingResult {
    pub completed: Mutex<Vec<PathBuf>>,
    pub failed: Mutex<Vec<String>>,
    pub cancelled: AtomicUsize,
}

impl RecordingResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed_paths(&self) -> Vec<PathBuf> {
        self.completed.lock().unwrap().clone()
    }

    pub fn failed_messages(&self) -> Vec<String> {
        self.failed.lock().unwrap().clone()
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl ResultSink for RecordingResult {
    fn on_completed(&self, mono_path: &Path) {
        self.completed.lock().unwrap().push(mono_path.to_path_buf());
    }

    fn on_failed(&self, message: &str) {
        self.failed.lock().unwrap().push(message.to_string());
    }

    fn on_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
    }
}
