//! DeepLX relay backend.
//!
//! Talks to a self-hosted or public DeepLX instance; the endpoint defaults to
//! a local relay and an optional bearer token is attached when configured.
//! Shares DeepL's language-code spelling, including the "zh-Hans" → "ZH"
//! fold.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::util::{excerpt, http_client, optional};
use super::TranslationBackend;
use crate::errors::TranslatorError;
use crate::language_utils::{deepl_source_lang, deepl_target_lang};

/// Credential key for the relay endpoint
pub const ENV_ENDPOINT: &str = "DEEPLX_ENDPOINT";
/// Credential key for the optional bearer token
pub const ENV_ACCESS_TOKEN: &str = "DEEPLX_ACCESS_TOKEN";

/// Default relay endpoint, a locally running deeplx instance
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:1188/translate";

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: Option<String>,
}

/// Translator backed by a DeepLX relay
#[derive(Debug)]
pub struct DeepLXTranslator {
    client: Client,
    endpoint: String,
    access_token: Option<String>,
    lang_in: String,
    lang_out: String,
}

impl DeepLXTranslator {
    /// Create a DeepLX adapter, validating the endpoint before any I/O
    pub fn new(
        lang_in: impl Into<String>,
        lang_out: impl Into<String>,
        envs: &HashMap<String, String>,
    ) -> Result<Self, TranslatorError> {
        let endpoint = optional(envs, ENV_ENDPOINT)
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string();
        Url::parse(&endpoint).map_err(|_| TranslatorError::InvalidEndpoint {
            service: "deeplx".to_string(),
            endpoint: endpoint.clone(),
        })?;

        Ok(Self {
            client: http_client(20),
            endpoint,
            access_token: optional(envs, ENV_ACCESS_TOKEN).map(String::from),
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
        })
    }
}

#[async_trait]
impl TranslationBackend for DeepLXTranslator {
    fn name(&self) -> &'static str {
        "deeplx"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let source = deepl_source_lang(&self.lang_in);
        let target = deepl_target_lang(&self.lang_out);

        let request = TranslateRequest {
            text,
            // An unset source lets the relay auto-detect.
            source_lang: if source.is_empty() { "AUTO" } else { &source },
            target_lang: &target,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.access_token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = builder.send().await.map_err(|e| {
            error!("DeepLX request failed: {}", e);
            TranslatorError::Transport {
                service: "deeplx".to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslatorError::Transport {
                service: "deeplx".to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await.map_err(|e| TranslatorError::Transport {
            service: "deeplx".to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

        match serde_json::from_str::<TranslateResponse>(&body) {
            Ok(TranslateResponse { data: Some(data) }) => Ok(data),
            _ => {
                warn!("Unexpected DeepLX response: {}", excerpt(&body, 500));
                Err(TranslatorError::ResponseFormat {
                    service: "deeplx".to_string(),
                    message: format!("reply carried no data field: {}", excerpt(&body, 200)),
                })
            }
        }
    }
}
