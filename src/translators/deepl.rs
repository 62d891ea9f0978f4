//! DeepL translation backend.
//!
//! Calls the REST v2 API with a `DeepL-Auth-Key` header. Free-tier keys (the
//! ones ending in `:fx`) live on a separate host; a custom server URL (for
//! proxies or compatible relays) can be supplied instead. ISO codes are
//! uppercased for the wire and "zh-Hans" folds to "ZH".

use std::collections::HashMap;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::util::{excerpt, http_client, optional, require};
use super::TranslationBackend;
use crate::errors::TranslatorError;
use crate::language_utils::{deepl_source_lang, deepl_target_lang};

/// Credential key for the API key
pub const ENV_AUTH_KEY: &str = "DEEPL_AUTH_KEY";
/// Credential key for an optional custom server URL
pub const ENV_SERVER_URL: &str = "DEEPL_SERVER_URL";

const API_URL: &str = "https://api.deepl.com";
const API_FREE_URL: &str = "https://api-free.deepl.com";

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'a str>,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// Translator backed by the DeepL REST API
#[derive(Debug)]
pub struct DeepLTranslator {
    client: Client,
    server_url: String,
    auth_key: String,
    lang_in: String,
    lang_out: String,
}

impl DeepLTranslator {
    /// Create a DeepL adapter, validating credentials before any I/O
    pub fn new(
        lang_in: impl Into<String>,
        lang_out: impl Into<String>,
        envs: &HashMap<String, String>,
    ) -> Result<Self, TranslatorError> {
        let auth_key = require(envs, "deepl", ENV_AUTH_KEY)?.to_string();

        let server_url = match optional(envs, ENV_SERVER_URL) {
            Some(custom) => {
                Url::parse(custom).map_err(|_| TranslatorError::InvalidEndpoint {
                    service: "deepl".to_string(),
                    endpoint: custom.to_string(),
                })?;
                custom.trim_end_matches('/').to_string()
            }
            None => default_server_url(&auth_key).to_string(),
        };

        Ok(Self {
            client: http_client(30),
            server_url,
            auth_key,
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
        })
    }
}

/// Pick the API host matching the key tier
pub(crate) fn default_server_url(auth_key: &str) -> &'static str {
    if auth_key.ends_with(":fx") {
        API_FREE_URL
    } else {
        API_URL
    }
}

#[async_trait]
impl TranslationBackend for DeepLTranslator {
    fn name(&self) -> &'static str {
        "deepl"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let source = deepl_source_lang(&self.lang_in);
        let target = deepl_target_lang(&self.lang_out);

        let request = TranslateRequest {
            text: [text],
            source_lang: if source.is_empty() { None } else { Some(&source) },
            target_lang: &target,
        };

        let response = self
            .client
            .post(format!("{}/v2/translate", self.server_url))
            .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("DeepL API request failed: {}", e);
                TranslatorError::Transport {
                    service: "deepl".to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("DeepL API error ({}): {}", status, excerpt(&body, 500));
            return Err(TranslatorError::Transport {
                service: "deepl".to_string(),
                message: format!("HTTP {}: {}", status, excerpt(&body, 200)),
            });
        }

        let parsed: TranslateResponse =
            response.json().await.map_err(|e| TranslatorError::ResponseFormat {
                service: "deepl".to_string(),
                message: e.to_string(),
            })?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| TranslatorError::ResponseFormat {
                service: "deepl".to_string(),
                message: "reply contained no translations".to_string(),
            })
    }
}
