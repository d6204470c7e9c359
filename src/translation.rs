use crate::config::Config;
use crate::i18n::{Language, LanguageRegistry, DEFAULT_SOURCE_LOCALE};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

/// Longest provider error excerpt passed back to callers
const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// Longest raw response excerpt reported by the self-test
const PROBE_PREVIEW_CHARS: usize = 50;

/// Sarvam translate request
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    input: &'a str,
    source_language_code: &'a str,
    target_language_code: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translated_text: String,
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Unsupported target language '{locale}'. Supported: {supported}")]
    UnsupportedLanguage { locale: String, supported: String },

    #[error("SARVAM_API_KEY not configured")]
    MissingApiKey,

    #[error("Translation request timeout")]
    Timeout,

    #[error("Cannot connect to translation service")]
    Connection,

    #[error("API returned {}", .status.as_u16())]
    Provider {
        status: reqwest::StatusCode,
        details: String,
    },

    #[error("Translation failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslationError::Timeout
        } else if err.is_connect() {
            TranslationError::Connection
        } else {
            TranslationError::Other(err.to_string())
        }
    }
}

impl TranslationError {
    fn unsupported(locale: &str) -> Self {
        TranslationError::UnsupportedLanguage {
            locale: locale.to_string(),
            supported: LanguageRegistry::get().locale_codes().join(", "),
        }
    }
}

/// One locale's outcome inside a batch translation
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub translated_text: String,
    pub language_name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Raw provider answer for one locale of the self-test
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub status: u16,
    pub language: &'static str,
    pub preview: String,
}

/// Client for the Sarvam translation API.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its pool.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
    probe_timeout: Duration,
}

impl TranslationClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.sarvam_api_url.clone(),
            api_key: config.sarvam_api_key.clone(),
            model: config.sarvam_model.clone(),
            timeout: Duration::from_secs(config.translation_timeout_secs),
            probe_timeout: Duration::from_secs(config.test_translation_timeout_secs),
        }
    }

    /// Override the request timeouts
    pub fn with_timeouts(mut self, timeout: Duration, probe_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.probe_timeout = probe_timeout;
        self
    }

    /// Translate `text` from `source` to `target` (both locale codes).
    ///
    /// The target must be a registered locale and the API key must be set;
    /// both are checked before any request leaves the process.
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let target_language =
            Language::from_locale(target).map_err(|_| TranslationError::unsupported(target))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranslationError::MissingApiKey)?;

        info!(
            "Translation request: {} -> {}, Length: {}",
            source,
            target,
            text.chars().count()
        );

        let request = TranslateRequest {
            input: text,
            source_language_code: source,
            target_language_code: target_language.locale_code(),
            model: &self.model,
        };

        let response = self
            .http
            .post(&self.api_url)
            .header("api-subscription-key", api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Translation request to {} failed: {}", target, e);
                TranslationError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            error!("Sarvam API error: {} - {}", status, body);
            return Err(TranslationError::Provider {
                status,
                details: error_excerpt(&body),
            });
        }

        let translated: TranslateResponse = response.json().await?;

        info!("Translation completed successfully for {}", target);
        Ok(translated.translated_text)
    }

    /// Translate `text` into every locale in `targets`.
    ///
    /// Every target is validated up front, so an unsupported locale fails the
    /// whole call before anything is sent. After that each locale succeeds or
    /// fails on its own and its outcome lands in the returned map.
    pub async fn batch_translate(
        &self,
        text: &str,
        targets: &[String],
    ) -> Result<BTreeMap<String, BatchEntry>, TranslationError> {
        if let Some(unsupported) = targets
            .iter()
            .find(|locale| !LanguageRegistry::get().is_supported_locale(locale))
        {
            return Err(TranslationError::unsupported(unsupported));
        }

        let calls = targets.iter().map(|target| async move {
            let language_name = LanguageRegistry::get()
                .display_name_for_locale(target)
                .to_string();

            let entry = match self.translate(text, DEFAULT_SOURCE_LOCALE, target).await {
                Ok(translated_text) => BatchEntry {
                    translated_text,
                    language_name,
                    status: "success",
                    error: None,
                },
                Err(e) => {
                    warn!("Batch translation to {} failed: {}", target, e);
                    BatchEntry {
                        translated_text: String::new(),
                        language_name,
                        status: "error",
                        error: Some(e.to_string()),
                    }
                }
            };

            (target.clone(), entry)
        });

        Ok(join_all(calls).await.into_iter().collect())
    }

    /// Send one translation and report the provider's raw answer.
    ///
    /// Non-success statuses are reported, not raised; only transport
    /// failures and a missing key are errors.
    pub async fn probe(
        &self,
        text: &str,
        target: Language,
    ) -> Result<ProbeResult, TranslationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranslationError::MissingApiKey)?;

        let request = TranslateRequest {
            input: text,
            source_language_code: DEFAULT_SOURCE_LOCALE,
            target_language_code: target.locale_code(),
            model: &self.model,
        };

        let response = self
            .http
            .post(&self.api_url)
            .header("api-subscription-key", api_key)
            .timeout(self.probe_timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ProbeResult {
            status,
            language: target.name(),
            preview: if body.is_empty() {
                "No response".to_string()
            } else {
                body.chars().take(PROBE_PREVIEW_CHARS).collect()
            },
        })
    }
}

fn error_excerpt(body: &str) -> String {
    if body.is_empty() {
        "No error details".to_string()
    } else {
        body.chars().take(MAX_ERROR_DETAIL_CHARS).collect()
    }
}
