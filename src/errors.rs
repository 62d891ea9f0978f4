/*!
 * Error types for the papertrans core.
 *
 * This module contains custom error types for the translation backends and
 * the job layer, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Broad classification of translator failures.
///
/// Configuration errors are raised before any I/O; everything else is
/// surfaced to the caller as a transport-class failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing credential, unknown service, unusable local model
    Configuration,
    /// Network, timeout, HTTP status or malformed payload
    Transport,
}

/// Errors that can occur when resolving or calling a translation backend
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// The requested service name is not in the registry
    #[error("unknown translation service: {0}")]
    UnknownService(String),

    /// One or more required credential keys are absent from the store
    #[error("{service} is missing required credentials: {}", .keys.join(", "))]
    MissingCredentials {
        /// Service display name
        service: String,
        /// Credential keys that were not provided
        keys: Vec<String>,
    },

    /// A configured endpoint could not be parsed as a URL
    #[error("{service} endpoint is not a valid URL: {endpoint}")]
    InvalidEndpoint {
        /// Service display name
        service: String,
        /// The offending endpoint value
        endpoint: String,
    },

    /// No installed offline model covers the requested language pair
    #[error("no installed {service} language package for {lang_in} -> {lang_out}")]
    LanguagePairUnavailable {
        /// Service display name
        service: String,
        /// Requested source language
        lang_in: String,
        /// Requested target language
        lang_out: String,
    },

    /// Error when making a backend request fails
    #[error("{service} request failed: {message}")]
    Transport {
        /// Service display name
        service: String,
        /// Human-readable failure description
        message: String,
    },

    /// Error when a backend payload does not match the expected shape
    #[error("{service} returned an unexpected response: {message}")]
    ResponseFormat {
        /// Service display name
        service: String,
        /// Description including a payload excerpt
        message: String,
    },
}

impl TranslatorError {
    /// Classify the error per the core taxonomy.
    ///
    /// Response-format failures travel with the transport class once they
    /// propagate; only pre-I/O setup failures are configuration errors.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownService(_)
            | Self::MissingCredentials { .. }
            | Self::InvalidEndpoint { .. }
            | Self::LanguagePairUnavailable { .. } => ErrorClass::Configuration,
            Self::Transport { .. } | Self::ResponseFormat { .. } => ErrorClass::Transport,
        }
    }

    /// Whether the error was raised before any I/O was attempted
    pub fn is_configuration(&self) -> bool {
        self.class() == ErrorClass::Configuration
    }
}

/// Failure modes of the external document pipeline.
///
/// Cancellation is distinguished from failure so the caller does not have to
/// present a cooperative stop as an error.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The pipeline observed the cancellation token and stopped
    #[error("translation cancelled")]
    Cancelled,

    /// Any other pipeline failure
    #[error("{0}")]
    Failed(String),
}

impl PipelineError {
    /// Whether this failure is a cooperative cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<TranslatorError> for PipelineError {
    fn from(error: TranslatorError) -> Self {
        Self::Failed(error.to_string())
    }
}

/// Error raised for malformed page-selection strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid page selection: {0}")]
pub struct PageSelectionError(pub String);
