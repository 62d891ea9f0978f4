/*!
 * Mock backend implementation for testing
 *
 * Implements the TranslationBackend trait without any network access and
 * tracks every call so tests can assert on cache behavior.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use papertrans::errors::TranslatorError;
use papertrans::translators::TranslationBackend;

/// Backend that echoes its input and counts calls
#[derive(Debug)]
pub struct MockBackend {
    /// Number of do_translate invocations
    calls: Arc<AtomicUsize>,
    /// Fixed reply; when None the backend echoes "echo:<text>"
    reply: Mutex<Option<String>>,
    /// Fail the next call with a transport error
    fail_next: Arc<Mutex<bool>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            reply: Mutex::new(None),
            fail_next: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        let backend = Self::new();
        *backend.reply.lock().unwrap() = Some(reply.into());
        backend
    }

    /// Shared call counter, usable after the backend is boxed
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Configure the mock to fail on the next call
    pub fn fail_next_call(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut fail_next = self.fail_next.lock().unwrap();
        if *fail_next {
            *fail_next = false; // Reset for next call
            return Err(TranslatorError::Transport {
                service: "mock".to_string(),
                message: "simulated failure".to_string(),
            });
        }

        match self.reply.lock().unwrap().as_ref() {
            Some(reply) => Ok(reply.clone()),
            None => Ok(format!("echo:{}", text)),
        }
    }
}
