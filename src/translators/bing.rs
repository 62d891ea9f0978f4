//! Bing web translation backend.
//!
//! Bing's public translator is driven by a signed session (IG, IID, and an
//! abuse-prevention key/token pair) scraped from the translator page. The
//! session is negotiated lazily on first use and discarded on any failure so
//! the next call starts from a clean slate. Input is capped at 1000
//! characters.

use async_trait::async_trait;
use log::{error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::util::{excerpt, http_client};
use super::TranslationBackend;
use crate::errors::TranslatorError;
use crate::language_utils::truncate_chars;

const ENDPOINT: &str = "https://www.bing.com/translator";
const MAX_CHARS: usize = 1000;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0";

static IG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"IG:"([A-Fa-f0-9]+)""#).expect("valid regex"));
static IID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-iid="(translator\.[^"]+)""#).expect("valid regex"));
static KEY_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"params_AbusePreventionHelper\s?=\s?\[([0-9]+),"([^"]+)","#).expect("valid regex")
});

/// One negotiated translator session
#[derive(Debug, Clone)]
pub(crate) struct BingSession {
    /// Scheme + host of the page we were redirected to
    base_url: String,
    ig: String,
    iid: String,
    key: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct TranslateItem {
    translations: Vec<TranslationText>,
}

#[derive(Debug, Deserialize)]
struct TranslationText {
    text: String,
}

/// Translator backed by the public Bing web endpoint
#[derive(Debug)]
pub struct BingTranslator {
    client: Client,
    lang_in: String,
    lang_out: String,
    session: Mutex<Option<BingSession>>,
}

impl BingTranslator {
    /// Create a Bing adapter for one language pair
    pub fn new(lang_in: impl Into<String>, lang_out: impl Into<String>) -> Self {
        Self {
            client: http_client(10),
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
            session: Mutex::new(None),
        }
    }

    /// Return the cached session or negotiate a fresh one
    async fn find_session(&self) -> Result<BingSession, TranslatorError> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        let response = self
            .client
            .get(ENDPOINT)
            .header("User-Agent", USER_AGENT)
            .header("Referer", ENDPOINT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                error!("Bing session request failed: {}", e);
                TranslatorError::Transport {
                    service: "bing".to_string(),
                    message: format!("session request failed: {}", e),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslatorError::Transport {
                service: "bing".to_string(),
                message: format!("session request returned HTTP {}", status),
            });
        }

        // The redirect target decides which regional host signs our requests.
        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| TranslatorError::Transport {
            service: "bing".to_string(),
            message: format!("failed to read session page: {}", e),
        })?;

        let session = parse_session_page(final_url.as_str(), &body)?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Drop the cached session so the next call re-negotiates
    async fn invalidate_session(&self) {
        self.session.lock().await.take();
    }
}

/// Scrape the signing material out of the translator page
pub(crate) fn parse_session_page(
    final_url: &str,
    body: &str,
) -> Result<BingSession, TranslatorError> {
    let parse_failure = |what: &str| {
        warn!(
            "Could not locate {} in Bing translator page: {}",
            what,
            excerpt(body, 500)
        );
        TranslatorError::ResponseFormat {
            service: "bing".to_string(),
            message: format!("could not locate {} in translator page", what),
        }
    };

    let ig = IG_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .ok_or_else(|| parse_failure("IG"))?
        .as_str()
        .to_string();
    let iid = IID_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .ok_or_else(|| parse_failure("IID"))?
        .as_str()
        .to_string();
    let key_token = KEY_TOKEN_RE
        .captures(body)
        .ok_or_else(|| parse_failure("abuse-prevention key and token"))?;

    let base_url = final_url
        .split("/translator")
        .next()
        .unwrap_or(final_url)
        .to_string();

    Ok(BingSession {
        base_url,
        ig,
        iid,
        key: key_token.get(1).map_or("", |m| m.as_str()).to_string(),
        token: key_token.get(2).map_or("", |m| m.as_str()).to_string(),
    })
}

/// Extract the translated text from a ttranslatev3 reply
pub(crate) fn parse_translate_response(body: &str) -> Result<String, TranslatorError> {
    let items: Vec<TranslateItem> =
        serde_json::from_str(body).map_err(|_| {
            warn!("Unexpected Bing translation response: {}", excerpt(body, 500));
            TranslatorError::ResponseFormat {
                service: "bing".to_string(),
                message: format!("unexpected reply shape: {}", excerpt(body, 200)),
            }
        })?;

    items
        .first()
        .and_then(|item| item.translations.first())
        .map(|t| t.text.clone())
        .ok_or_else(|| TranslatorError::ResponseFormat {
            service: "bing".to_string(),
            message: "reply contained no translations".to_string(),
        })
}

#[async_trait]
impl TranslationBackend for BingTranslator {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let text = truncate_chars(text, MAX_CHARS);
        let session = self.find_session().await?;

        let translate_url = format!(
            "{}/ttranslatev3?isVertical=1&&IG={}&IID={}",
            session.base_url, session.ig, session.iid
        );

        let result = async {
            let response = self
                .client
                .post(&translate_url)
                .header("User-Agent", USER_AGENT)
                .header("Referer", ENDPOINT)
                .form(&[
                    ("fromLang", self.lang_in.as_str()),
                    ("to", self.lang_out.as_str()),
                    ("text", text.as_str()),
                    ("token", session.token.as_str()),
                    ("key", session.key.as_str()),
                ])
                .send()
                .await
                .map_err(|e| {
                    error!("Bing translation request failed: {}", e);
                    TranslatorError::Transport {
                        service: "bing".to_string(),
                        message: e.to_string(),
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(TranslatorError::Transport {
                    service: "bing".to_string(),
                    message: format!("HTTP {}", status),
                });
            }

            let body = response.text().await.map_err(|e| TranslatorError::Transport {
                service: "bing".to_string(),
                message: format!("failed to read response body: {}", e),
            })?;

            parse_translate_response(&body)
        }
        .await;

        if result.is_err() {
            // Stale sessions produce both transport and shape failures;
            // either way the next call must re-negotiate.
            self.invalidate_session().await;
        }
        result
    }
}
