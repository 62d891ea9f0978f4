//! Small helpers shared by the backend adapters.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;

use crate::errors::TranslatorError;

/// Fetch a required credential from a resolved env map.
///
/// An empty value counts as missing, matching how the front end treats blank
/// credential fields.
pub(crate) fn require<'a>(
    envs: &'a HashMap<String, String>,
    service: &str,
    key: &str,
) -> Result<&'a str, TranslatorError> {
    match envs.get(key).map(String::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(TranslatorError::MissingCredentials {
            service: service.to_string(),
            keys: vec![key.to_string()],
        }),
    }
}

/// Fetch an optional, non-empty credential from a resolved env map
pub(crate) fn optional<'a>(envs: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    envs.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Build an HTTP client with the given request timeout
pub(crate) fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// First `max_chars` characters of a payload, for log lines and error messages
pub(crate) fn excerpt(payload: &str, max_chars: usize) -> String {
    if payload.chars().count() > max_chars {
        payload.chars().take(max_chars).collect()
    } else {
        payload.to_string()
    }
}
