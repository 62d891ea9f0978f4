/*!
 * Cooperative cancellation token.
 *
 * A tri-state atomic flag shared by reference between a job and the external
 * document pipeline. The job arms it; the pipeline polls it at its own
 * checkpoints and marks it observed when it stops. The not-requested →
 * requested transition is write-once.
 */

use std::sync::atomic::{AtomicU8, Ordering};

const NOT_REQUESTED: u8 = 0;
const REQUESTED: u8 = 1;
const OBSERVED: u8 = 2;

/// Lifecycle of a cancellation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelState {
    /// Nobody has asked the job to stop
    NotRequested,
    /// A stop was requested but the pipeline has not yet acted on it
    Requested,
    /// The pipeline acknowledged the request and is unwinding
    Observed,
}

/// Shared cancellation flag, one per job
#[derive(Debug, Default)]
pub struct CancellationToken {
    state: AtomicU8,
}

impl CancellationToken {
    /// Create an unarmed token
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(NOT_REQUESTED),
        }
    }

    /// Arm the token.
    ///
    /// Only the not-requested → requested transition exists; calling again
    /// after that, or after the pipeline observed the request, changes
    /// nothing. Returns whether this call performed the transition.
    pub fn request(&self) -> bool {
        self.state
            .compare_exchange(NOT_REQUESTED, REQUESTED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Whether a stop has been requested (observed or not)
    pub fn is_requested(&self) -> bool {
        self.state.load(Ordering::SeqCst) != NOT_REQUESTED
    }

    /// Mark a pending request as observed.
    ///
    /// Called by the pipeline when it acts on the request. Returns whether a
    /// request was pending; an unarmed token is left untouched.
    pub fn observe(&self) -> bool {
        self.state
            .compare_exchange(REQUESTED, OBSERVED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            || self.state.load(Ordering::SeqCst) == OBSERVED
    }

    /// Current state of the token
    pub fn state(&self) -> CancelState {
        match self.state.load(Ordering::SeqCst) {
            REQUESTED => CancelState::Requested,
            OBSERVED => CancelState::Observed,
            _ => CancelState::NotRequested,
        }
    }
}
