//! Azure Translator backend.
//!
//! Calls the Translator v3 REST API with a region-scoped key credential.
//! Endpoint, key, and region must all be present; the endpoint defaults to
//! the global cognitive-services host.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::util::{excerpt, http_client, require};
use super::TranslationBackend;
use crate::errors::TranslatorError;

/// Credential key for the service endpoint
pub const ENV_ENDPOINT: &str = "AZURE_ENDPOINT";
/// Credential key for the subscription key
pub const ENV_API_KEY: &str = "AZURE_API_KEY";
/// Credential key for the resource region
pub const ENV_REGION: &str = "AZURE_REGION";

/// Global endpoint; sovereign clouds configure their own
pub const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

#[derive(Debug, Serialize)]
struct TranslateItem<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResult {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// Translator backed by the Azure Translator v3 API
#[derive(Debug)]
pub struct AzureTranslator {
    client: Client,
    endpoint: String,
    api_key: String,
    region: String,
    lang_in: String,
    lang_out: String,
}

impl AzureTranslator {
    /// Create an Azure adapter, validating all three credentials before any I/O
    pub fn new(
        lang_in: impl Into<String>,
        lang_out: impl Into<String>,
        envs: &HashMap<String, String>,
    ) -> Result<Self, TranslatorError> {
        let endpoint = require(envs, "azure", ENV_ENDPOINT)?
            .trim_end_matches('/')
            .to_string();
        let api_key = require(envs, "azure", ENV_API_KEY)?.to_string();
        let region = require(envs, "azure", ENV_REGION)?.to_string();

        Url::parse(&endpoint).map_err(|_| TranslatorError::InvalidEndpoint {
            service: "azure".to_string(),
            endpoint: endpoint.clone(),
        })?;

        Ok(Self {
            client: http_client(10),
            endpoint,
            api_key,
            region,
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
        })
    }
}

#[async_trait]
impl TranslationBackend for AzureTranslator {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let response = self
            .client
            .post(format!("{}/translate", self.endpoint))
            .query(&[
                ("api-version", "3.0"),
                ("from", self.lang_in.as_str()),
                ("to", self.lang_out.as_str()),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .json(&[TranslateItem { text }])
            .send()
            .await
            .map_err(|e| {
                error!("Azure translation request failed: {}", e);
                TranslatorError::Transport {
                    service: "azure".to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Azure API error ({}): {}", status, excerpt(&body, 500));
            return Err(TranslatorError::Transport {
                service: "azure".to_string(),
                message: format!("HTTP {}: {}", status, excerpt(&body, 200)),
            });
        }

        let body = response.text().await.map_err(|e| TranslatorError::Transport {
            service: "azure".to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

        parse_response(&body)
    }
}

/// Extract the first translation from a v3 reply
pub(crate) fn parse_response(body: &str) -> Result<String, TranslatorError> {
    let results: Vec<TranslateResult> = serde_json::from_str(body).map_err(|_| {
        warn!("Unexpected Azure translation response: {}", excerpt(body, 500));
        TranslatorError::ResponseFormat {
            service: "azure".to_string(),
            message: format!("unexpected reply shape: {}", excerpt(body, 200)),
        }
    })?;

    results
        .first()
        .and_then(|r| r.translations.first())
        .map(|t| t.text.clone())
        .ok_or_else(|| TranslatorError::ResponseFormat {
            service: "azure".to_string(),
            message: "no translation received".to_string(),
        })
}
