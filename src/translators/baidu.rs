//! Baidu fanyi backend.
//!
//! Signs each call with md5(appid + text + salt + secret) using a fresh
//! random salt, per the fanyi-api signing scheme. API-level errors come back
//! as an `error_code` field in an otherwise successful reply.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{error, warn};
use md5::{Digest, Md5};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;

use super::util::{excerpt, http_client, require};
use super::TranslationBackend;
use crate::errors::TranslatorError;

/// Credential key for the application id
pub const ENV_APP_ID: &str = "BAIDU_APP_ID";
/// Credential key for the signing secret
pub const ENV_SECRET_KEY: &str = "BAIDU_SECRET_KEY";

const ENDPOINT: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    error_code: Option<String>,
    error_msg: Option<String>,
    trans_result: Option<Vec<TransResult>>,
}

#[derive(Debug, Deserialize)]
struct TransResult {
    dst: String,
}

/// Translator backed by the Baidu fanyi API
#[derive(Debug)]
pub struct BaiduTranslator {
    client: Client,
    app_id: String,
    secret_key: String,
    lang_in: String,
    lang_out: String,
}

impl BaiduTranslator {
    /// Create a Baidu adapter, validating credentials before any I/O
    pub fn new(
        lang_in: impl Into<String>,
        lang_out: impl Into<String>,
        envs: &HashMap<String, String>,
    ) -> Result<Self, TranslatorError> {
        let app_id = require(envs, "baidu", ENV_APP_ID)?.to_string();
        let secret_key = require(envs, "baidu", ENV_SECRET_KEY)?.to_string();

        Ok(Self {
            client: http_client(10),
            app_id,
            secret_key,
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
        })
    }
}

/// md5(appid + text + salt + secret), lowercase hex
pub(crate) fn sign(app_id: &str, text: &str, salt: u32, secret_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(format!("{}{}{}{}", app_id, text, salt, secret_key).as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the first translation from a fanyi reply
pub(crate) fn parse_response(body: &str) -> Result<String, TranslatorError> {
    let parsed: TranslateResponse = serde_json::from_str(body).map_err(|_| {
        warn!("Unexpected Baidu translation response: {}", excerpt(body, 500));
        TranslatorError::ResponseFormat {
            service: "baidu".to_string(),
            message: format!("unexpected reply shape: {}", excerpt(body, 200)),
        }
    })?;

    if let Some(code) = parsed.error_code {
        let message = parsed.error_msg.unwrap_or_default();
        error!("Baidu API error: {} {}", code, message);
        return Err(TranslatorError::Transport {
            service: "baidu".to_string(),
            message: format!("{}: {}", code, message),
        });
    }

    parsed
        .trans_result
        .and_then(|results| results.into_iter().next())
        .map(|r| r.dst)
        .ok_or_else(|| TranslatorError::ResponseFormat {
            service: "baidu".to_string(),
            message: "reply contained no trans_result".to_string(),
        })
}

#[async_trait]
impl TranslationBackend for BaiduTranslator {
    fn name(&self) -> &'static str {
        "baidu"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let salt: u32 = rand::rng().random_range(32768..65536);
        let signature = sign(&self.app_id, text, salt, &self.secret_key);
        let salt_str = salt.to_string();

        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("appid", self.app_id.as_str()),
                ("q", text),
                ("from", self.lang_in.as_str()),
                ("to", self.lang_out.as_str()),
                ("salt", salt_str.as_str()),
                ("sign", signature.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Baidu translation request failed: {}", e);
                TranslatorError::Transport {
                    service: "baidu".to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslatorError::Transport {
                service: "baidu".to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await.map_err(|e| TranslatorError::Transport {
            service: "baidu".to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

        parse_response(&body)
    }
}
