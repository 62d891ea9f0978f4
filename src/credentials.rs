/*!
 * Credential storage interface.
 *
 * Persistence format and location belong to the embedding application; this
 * core only reads credentials once at adapter construction and never holds a
 * global credential table.
 */

use std::collections::HashMap;

use parking_lot::RwLock;

/// Key/value credential persistence, scoped per backend.
///
/// Implementations are provided by the embedding application (settings file,
/// keychain, ...). Writes from user edits must complete before a job starts;
/// reads happen once when an adapter is constructed.
pub trait CredentialStore: Send + Sync {
    /// Look up a credential value for one backend
    fn get(&self, backend: &str, key: &str) -> Option<String>;

    /// Persist a credential value for one backend
    fn set(&self, backend: &str, key: &str, value: &str);
}

/// In-memory credential store.
///
/// Useful for embedding, tests, and one-shot invocations where nothing needs
/// to outlive the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<(String, String), String>>,
}

impl MemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no credentials
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, backend: &str, key: &str) -> Option<String> {
        self.entries
            .read()
            .get(&(backend.to_string(), key.to_string()))
            .cloned()
    }

    fn set(&self, backend: &str, key: &str, value: &str) {
        self.entries
            .write()
            .insert((backend.to_string(), key.to_string()), value.to_string());
    }
}
