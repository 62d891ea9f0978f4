//! Argos Translate backend.
//!
//! Fully offline: translation happens through locally installed Argos
//! language-pair packages, driven via the `argos-translate` executable. The
//! package for the requested pair is resolved at construction and missing
//! pairs fail immediately; no network calls are ever made.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, error};
use serde::Deserialize;
use tokio::process::Command;

use super::util::optional;
use super::TranslationBackend;
use crate::errors::TranslatorError;

/// Credential key overriding the package directory (mainly for tests and
/// portable installs)
pub const ENV_PACKAGES_DIR: &str = "ARGOS_PACKAGES_DIR";

const EXECUTABLE: &str = "argos-translate";

/// Package manifest, one per installed language pair
#[derive(Debug, Deserialize)]
struct PackageMetadata {
    from_code: String,
    to_code: String,
    #[serde(default)]
    package_version: String,
}

/// Translator backed by locally installed Argos models
#[derive(Debug)]
pub struct ArgosTranslator {
    lang_in: String,
    lang_out: String,
    /// Root of the resolved package, kept for diagnostics
    package_dir: PathBuf,
}

impl ArgosTranslator {
    /// Create an Argos adapter, resolving the installed language pair.
    ///
    /// Fails with a configuration-class error when no installed package
    /// covers the pair.
    pub fn new(
        lang_in: impl Into<String>,
        lang_out: impl Into<String>,
        envs: &HashMap<String, String>,
    ) -> Result<Self, TranslatorError> {
        let lang_in = lang_in.into();
        let lang_out = lang_out.into();

        let packages_dir = optional(envs, ENV_PACKAGES_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_packages_dir);

        let package_dir = find_package(&packages_dir, &lang_in, &lang_out).ok_or_else(|| {
            TranslatorError::LanguagePairUnavailable {
                service: "argos".to_string(),
                lang_in: lang_in.clone(),
                lang_out: lang_out.clone(),
            }
        })?;

        debug!(
            "Resolved Argos package for {} -> {} at {}",
            lang_in,
            lang_out,
            package_dir.display()
        );

        Ok(Self {
            lang_in,
            lang_out,
            package_dir,
        })
    }

    /// Directory of the resolved package
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }
}

/// Where argospm installs packages by default
fn default_packages_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("argos-translate")
        .join("packages")
}

/// Scan the package directory for a manifest matching the language pair
fn find_package(packages_dir: &Path, lang_in: &str, lang_out: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(packages_dir).ok()?;
    for entry in entries.flatten() {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let manifest_path = dir.join("metadata.json");
        let Ok(raw) = std::fs::read_to_string(&manifest_path) else {
            continue;
        };
        let Ok(metadata) = serde_json::from_str::<PackageMetadata>(&raw) else {
            debug!("Skipping unreadable Argos manifest at {}", manifest_path.display());
            continue;
        };
        if metadata.from_code == lang_in && metadata.to_code == lang_out {
            debug!(
                "Found Argos package {} -> {} (version {})",
                metadata.from_code, metadata.to_code, metadata.package_version
            );
            return Some(dir);
        }
    }
    None
}

#[async_trait]
impl TranslationBackend for ArgosTranslator {
    fn name(&self) -> &'static str {
        "argos"
    }

    async fn do_translate(&self, text: &str) -> Result<String, TranslatorError> {
        let output = Command::new(EXECUTABLE)
            .arg("--from-lang")
            .arg(&self.lang_in)
            .arg("--to-lang")
            .arg(&self.lang_out)
            .arg(text)
            .output()
            .await
            .map_err(|e| {
                error!("Failed to run {}: {}", EXECUTABLE, e);
                TranslatorError::Transport {
                    service: "argos".to_string(),
                    message: format!("failed to run {}: {}", EXECUTABLE, e),
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("{} exited with {}: {}", EXECUTABLE, output.status, stderr.trim());
            return Err(TranslatorError::Transport {
                service: "argos".to_string(),
                message: format!("{} exited with {}", EXECUTABLE, output.status),
            });
        }

        let translated = String::from_utf8_lossy(&output.stdout);
        Ok(translated.trim_end_matches('\n').to_string())
    }
}
