//! Google web translation backend.
//!
//! Talks to the public mobile endpoint and scrapes the result out of the
//! returned markup. No credentials; input is capped at 5000 characters.

use async_trait::async_trait;
use log::{error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use super::util::{excerpt, http_client};
use super::TranslationBackend;
use crate::errors::TranslatorError;
use crate::language_utils::truncate_chars;

const ENDPOINT: &str = "https://translate.google.com/m";
const MAX_CHARS: usize = 5000;
const USER_AGENT: &str = "Mozilla/4.0 (compatible;MSIE 6.0;Windows NT 5.1;SV1;.NET CLR 1.1.4322;.NET CLR 2.0.50727;.NET CLR 3.0.04506.30)";

// The mobile page renders the translation inside a t0/result-container span.
static RESULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)class="(?:t0|result-container)">(.*?)<"#).expect("valid regex"));

/// Translator backed by the public Google web endpoint
#[derive(Debug)]
pub struct GoogleTranslator {
    client: Client,
    lang_in: String,
    lang_out: String,
}

impl GoogleTranslator {
    /// Create a Google adapter for one language pair
    pub fn new(lang_in: impl Into<String>, lang_out: impl Into<String>) -> Self {
        Self {
            client: http_client(10),
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
        }
    }
}

/// Extract the translated text from the returned markup
pub(crate) fn parse_response(body: &str) -> Result<String, TranslatorError> {
    match RESULT_RE.captures(body) {
        Some(captures) => {
            let raw = captures.get(1).map_or("", |m| m.as_str());
            Ok(html_escape::decode_html_entities(raw).into_owned())
        }
        None => {
            warn!(
                "Could not parse Google translation response: {}",
                excerpt(body, 500)
            );
            Err(TranslatorError::ResponseFormat {
                service: "google".to_string(),
                message: format!("no translation found in markup: {}", excerpt(body, 200)),
            })
        }
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslator {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let text = truncate_chars(text, MAX_CHARS);

        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("tl", self.lang_out.as_str()),
                ("sl", self.lang_in.as_str()),
                ("q", text.as_str()),
            ])
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                error!("Google translation request failed: {}", e);
                TranslatorError::Transport {
                    service: "google".to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Google translation returned HTTP {}", status);
            return Err(TranslatorError::Transport {
                service: "google".to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await.map_err(|e| TranslatorError::Transport {
            service: "google".to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

        parse_response(&body)
    }
}
