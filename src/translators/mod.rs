/*!
 * Backend implementations for the supported translation services.
 *
 * This module contains one adapter per remote or local service:
 * - Google: public web endpoint, response scraping
 * - Bing: page-scraped signed session
 * - DeepL: REST v2 API
 * - DeepLX: self-hosted DeepL relay
 * - Azure: Translator v3 API
 * - Tencent: TMT with TC3-HMAC-SHA256 signing
 * - Baidu: fanyi API with MD5-signed requests
 * - Argos: offline local models
 *
 * Every adapter implements [`TranslationBackend`]; caching, sanitization and
 * language remapping live in the shared [`Translator`] wrapper, so the only
 * service-specific code is each backend's `do_translate`.
 */

use std::fmt::Debug;

use async_trait::async_trait;

use crate::cache::TranslationCache;
use crate::errors::TranslatorError;
use crate::language_utils::remove_control_characters;

/// Common trait for all translation backends.
///
/// Implementations perform exactly one backend call per invocation; they do
/// not retry, rate limit, or back off. Adapters holding session state must
/// discard it on failure so the next call re-establishes it.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Stable identifier used in cache keys and log lines
    fn name(&self) -> &'static str;

    /// Translate one text segment using the backend's wire protocol
    ///
    /// # Arguments
    /// * `text` - The source text segment
    ///
    /// # Returns
    /// * `Result<String, TranslatorError>` - The raw translated text or an error
    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError>;
}

/// Shared translation contract wrapping a concrete backend.
///
/// Owns the remapped language pair, the per-instance cache, and the default
/// cache-bypass flag. Obtained through [`crate::registry::build_translator`];
/// the constructor is public so tests and embedders can wire in their own
/// backend implementations.
pub struct Translator {
    /// The service-specific backend
    backend: Box<dyn TranslationBackend>,

    /// Source language after the backend remap
    lang_in: String,

    /// Target language after the backend remap
    lang_out: String,

    /// Optional model selection, passed through opaque
    model: Option<String>,

    /// Per-instance translation cache
    cache: TranslationCache,

    /// Default cache-bypass flag for [`Translator::translate`]
    ignore_cache: bool,
}

impl Translator {
    /// Create a translator over an already-constructed backend.
    ///
    /// `lang_in`/`lang_out` must already be remapped for the backend; the
    /// registry takes care of that for the built-in services.
    pub fn new(
        backend: Box<dyn TranslationBackend>,
        lang_in: impl Into<String>,
        lang_out: impl Into<String>,
        model: Option<String>,
        ignore_cache: bool,
    ) -> Self {
        Self {
            backend,
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
            model,
            cache: TranslationCache::new(),
            ignore_cache,
        }
    }

    /// Backend identifier
    pub fn name(&self) -> &'static str {
        self.backend.name()
    }

    /// Source language as sent on the wire
    pub fn lang_in(&self) -> &str {
        &self.lang_in
    }

    /// Target language as sent on the wire
    pub fn lang_out(&self) -> &str {
        &self.lang_out
    }

    /// Model selection, if any
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// The translator's cache, mainly for statistics
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate one segment using the construction-time bypass flag
    pub async fn translate(&self, text: &str) -> Result<String, TranslatorError> {
        self.translate_with(text, self.ignore_cache).await
    }

    /// Translate one segment with an explicit cache-bypass flag.
    ///
    /// On a cache hit the backend is not called. A bypass suppresses both the
    /// lookup and the write-back, forcing recomputation without touching the
    /// stored entry. Backend failures propagate unchanged; no retries happen
    /// at this layer.
    pub async fn translate_with(
        &self,
        text: &str,
        ignore_cache: bool,
    ) -> Result<String, TranslatorError> {
        if !ignore_cache {
            if let Some(hit) = self
                .cache
                .get(self.backend.name(), &self.lang_in, &self.lang_out, text)
            {
                return Ok(hit);
            }
        }

        let raw = self.backend.do_translate(text).await?;
        let translation = remove_control_characters(&raw);

        if !ignore_cache {
            self.cache.store(
                self.backend.name(),
                &self.lang_in,
                &self.lang_out,
                text,
                &translation,
            );
        }

        Ok(translation)
    }
}

impl Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("backend", &self.backend.name())
            .field("lang_in", &self.lang_in)
            .field("lang_out", &self.lang_out)
            .field("model", &self.model)
            .field("ignore_cache", &self.ignore_cache)
            .finish()
    }
}

pub mod argos;
pub mod azure;
pub mod baidu;
pub mod bing;
pub mod deepl;
pub mod deeplx;
pub mod google;
pub mod tencent;

pub(crate) mod util;
