//! Tencent TMT backend.
//!
//! Calls the Machine Translation service with TC3-HMAC-SHA256 request
//! signing. The region defaults to ap-shanghai when unset; API-level errors
//! arrive inside an otherwise successful HTTP reply and are surfaced from the
//! `Response.Error` envelope.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::util::{excerpt, http_client, require};
use super::TranslationBackend;
use crate::errors::TranslatorError;

/// Credential key for the secret id
pub const ENV_SECRET_ID: &str = "TENCENT_SECRET_ID";
/// Credential key for the secret key
pub const ENV_SECRET_KEY: &str = "TENCENT_SECRET_KEY";
/// Credential key for the region
pub const ENV_REGION: &str = "TENCENT_REGION";

/// Default region when the store has none
pub const DEFAULT_REGION: &str = "ap-shanghai";

const HOST: &str = "tmt.tencentcloudapi.com";
const SERVICE: &str = "tmt";
const ACTION: &str = "TextTranslate";
const VERSION: &str = "2018-03-21";
const ALGORITHM: &str = "TC3-HMAC-SHA256";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    #[serde(rename = "SourceText")]
    source_text: &'a str,
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(rename = "Target")]
    target: &'a str,
    #[serde(rename = "ProjectId")]
    project_id: u64,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "TargetText")]
    target_text: Option<String>,
    #[serde(rename = "Error")]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

/// Translator backed by Tencent Machine Translation
#[derive(Debug)]
pub struct TencentTranslator {
    client: Client,
    secret_id: String,
    secret_key: String,
    region: String,
    lang_in: String,
    lang_out: String,
}

impl TencentTranslator {
    /// Create a Tencent adapter, validating credentials before any I/O
    pub fn new(
        lang_in: impl Into<String>,
        lang_out: impl Into<String>,
        envs: &HashMap<String, String>,
    ) -> Result<Self, TranslatorError> {
        let secret_id = require(envs, "tencent", ENV_SECRET_ID)?.to_string();
        let secret_key = require(envs, "tencent", ENV_SECRET_KEY)?.to_string();
        let region = envs
            .get(ENV_REGION)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            client: http_client(10),
            secret_id,
            secret_key,
            region,
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
        })
    }
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// Build the TC3-HMAC-SHA256 Authorization header for one request.
///
/// The canonical request pins method POST, path "/", and the
/// content-type/host header set; the credential scope is date-bound.
pub(crate) fn build_authorization(
    secret_id: &str,
    secret_key: &str,
    payload: &str,
    timestamp: i64,
) -> String {
    let date = Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d")
        .to_string();

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:application/json; charset=utf-8\nhost:{}\n\ncontent-type;host\n{}",
        HOST,
        sha256_hex(payload)
    );
    let credential_scope = format!("{}/{}/tc3_request", date, SERVICE);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        credential_scope,
        sha256_hex(&canonical_request)
    );

    let secret_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), &date);
    let secret_service = hmac_sha256(&secret_date, SERVICE);
    let secret_signing = hmac_sha256(&secret_service, "tc3_request");
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign));

    format!(
        "{} Credential={}/{}, SignedHeaders=content-type;host, Signature={}",
        ALGORITHM, secret_id, credential_scope, signature
    )
}

/// Unwrap the reply envelope into the translated text
pub(crate) fn parse_response(body: &str) -> Result<String, TranslatorError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|_| {
        warn!("Unexpected Tencent translation response: {}", excerpt(body, 500));
        TranslatorError::ResponseFormat {
            service: "tencent".to_string(),
            message: format!("unexpected reply shape: {}", excerpt(body, 200)),
        }
    })?;

    if let Some(api_error) = envelope.response.error {
        return Err(TranslatorError::Transport {
            service: "tencent".to_string(),
            message: format!("{}: {}", api_error.code, api_error.message),
        });
    }

    envelope
        .response
        .target_text
        .ok_or_else(|| TranslatorError::ResponseFormat {
            service: "tencent".to_string(),
            message: "reply carried neither TargetText nor Error".to_string(),
        })
}

#[async_trait]
impl TranslationBackend for TencentTranslator {
    fn name(&self) -> &'static str {
        "tencent"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let request = TranslateRequest {
            source_text: text,
            source: &self.lang_in,
            target: &self.lang_out,
            project_id: 0,
        };
        let payload =
            serde_json::to_string(&request).map_err(|e| TranslatorError::Transport {
                service: "tencent".to_string(),
                message: format!("failed to encode request: {}", e),
            })?;

        let timestamp = Utc::now().timestamp();
        let authorization =
            build_authorization(&self.secret_id, &self.secret_key, &payload, timestamp);

        let response = self
            .client
            .post(format!("https://{}", HOST))
            .header("Authorization", authorization)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Host", HOST)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Version", VERSION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Region", &self.region)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                error!("Tencent translation request failed: {}", e);
                TranslatorError::Transport {
                    service: "tencent".to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslatorError::Transport {
                service: "tencent".to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await.map_err(|e| TranslatorError::Transport {
            service: "tencent".to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

        parse_response(&body)
    }
}
