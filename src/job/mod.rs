/*!
 * Cancellable job execution.
 *
 * This module contains the job layer that drives one document translation
 * through the external pipeline:
 *
 * - `cancellation`: the shared tri-state cancellation token
 * - `progress`: progress/result sink interfaces and the running-gated relay
 * - `worker`: the job state machine and the single-active-job runner
 */

// Re-export main types for easier usage
pub use self::cancellation::{CancelState, CancellationToken};
pub use self::progress::{ProgressSink, ResultSink};
pub use self::worker::{JobRequest, JobRunner, JobState, TranslationJob};

// Submodules
pub mod cancellation;
pub mod progress;
pub mod worker;
