/*!
 * Translation caching functionality.
 *
 * Each translator instance owns one cache so repeated segments of a document
 * are translated once. The key includes the backend identifier alongside the
 * language pair and the source text; the `model` parameter deliberately does
 * not participate.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

/// Cache key combining backend, language pair, and source text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Backend identifier
    backend: String,

    /// Source language code (post-remap)
    lang_in: String,

    /// Target language code (post-remap)
    lang_out: String,

    /// Source text segment
    text: String,
}

impl CacheKey {
    fn new(backend: &str, lang_in: &str, lang_out: &str, text: &str) -> Self {
        Self {
            backend: backend.to_string(),
            lang_in: lang_in.to_string(),
            lang_out: lang_out.to_string(),
            text: text.to_string(),
        }
    }
}

/// Translation cache for storing and retrieving translated segments
pub struct TranslationCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,
}

impl TranslationCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
        }
    }

    /// Get a translation from the cache
    pub fn get(&self, backend: &str, lang_in: &str, lang_out: &str, text: &str) -> Option<String> {
        let key = CacheKey::new(backend, lang_in, lang_out, text);
        let cache = self.cache.read();

        match cache.get(&key) {
            Some(translation) => {
                let mut hits = self.hits.write();
                *hits += 1;

                debug!(
                    "Cache hit for '{}' ({} -> {}, {})",
                    truncate_text(text, 30),
                    lang_in,
                    lang_out,
                    backend
                );

                Some(translation.clone())
            }
            None => {
                let mut misses = self.misses.write();
                *misses += 1;

                debug!(
                    "Cache miss for '{}' ({} -> {}, {})",
                    truncate_text(text, 30),
                    lang_in,
                    lang_out,
                    backend
                );

                None
            }
        }
    }

    /// Store a translation, overwriting any previous entry for the same key
    pub fn store(&self, backend: &str, lang_in: &str, lang_out: &str, text: &str, translation: &str) {
        let key = CacheKey::new(backend, lang_in, lang_out, text);
        let mut cache = self.cache.write();

        cache.insert(key, translation.to_string());

        debug!(
            "Cached translation for '{}' ({} -> {}, {})",
            truncate_text(text, 30),
            lang_in,
            lang_out,
            backend
        );
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache and reset counters
    pub fn clear(&self) {
        self.cache.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Translation cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
        }
    }
}

/// Truncate text to a maximum length with ellipsis, for log lines
fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_length).collect::<String>())
    }
}
