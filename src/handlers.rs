//! One handler per HTTP operation.
//!
//! Each handler validates its input, calls the formatter and/or provider
//! clients, and answers with a `"status": "success"` body or an `ApiError`.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::error::ApiError;
use crate::formatter::{format_sms_body, ConsultationContent, MessageKind, NOT_SPECIFIED};
use crate::health::HealthReport;
use crate::i18n::{Language, LanguageConfig, DEFAULT_SOURCE_LOCALE};
use crate::report::PdfContent;
use crate::sms::{SmsDispatchResult, SmsError};
use crate::state::AppState;
use crate::translation::{BatchEntry, ProbeResult};

pub const DEFAULT_TARGET_LOCALE: &str = "mr-IN";
pub const UNKNOWN_LANGUAGE: &str = "Unknown Language";

pub const SELF_TEST_TEXT: &str =
    "Hello, how are you today? This is a test of the translation service.";
pub const SELF_TEST_LANGUAGES: [Language; 4] = [
    Language::HINDI,
    Language::MARATHI,
    Language::TAMIL,
    Language::TELUGU,
];

// ==================== Request Types ====================

/// Body shared by the SMS and PDF operations. Every field is optional;
/// each operation applies its own defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConsultationRequest {
    pub to: Option<String>,
    pub diagnosis: Option<String>,
    pub medicines: Option<String>,
    pub nutrition: Option<String>,
    pub notes: Option<String>,
    pub message_type: Option<String>,
    pub language_name: Option<String>,
    pub patient_info: Option<Value>,
}

impl ConsultationRequest {
    fn content(&self, default: &str) -> ConsultationContent {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| default.to_string());
        ConsultationContent {
            diagnosis: field(&self.diagnosis),
            medicines: field(&self.medicines),
            nutrition: field(&self.nutrition),
            notes: field(&self.notes),
        }
    }

    fn recipient(&self) -> Result<String, ApiError> {
        match self.to.as_deref().map(str::trim) {
            Some(to) if !to.is_empty() => Ok(to.to_string()),
            _ => Err(SmsError::MissingRecipient.into()),
        }
    }

    fn message_type(&self) -> String {
        self.message_type.clone().unwrap_or_else(|| "all".to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    #[serde(rename = "sourceLang")]
    pub source_lang: Option<String>,
    #[serde(rename = "targetLang")]
    pub target_lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchTranslateRequest {
    pub text: Option<String>,
    #[serde(rename = "targetLanguages", default)]
    pub target_languages: Option<Vec<String>>,
}

// ==================== Response Types ====================

#[derive(Debug, Serialize)]
pub struct SendSmsResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub dispatch: SmsDispatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PdfResponse {
    pub status: &'static str,
    pub pdf_content: PdfContent,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub status: &'static str,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub language_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub status: &'static str,
    pub languages: BTreeMap<&'static str, &'static LanguageConfig>,
    pub default_source: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BatchTranslateResponse {
    pub status: &'static str,
    pub translations: BTreeMap<String, BatchEntry>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SelfTestResponse {
    pub status: &'static str,
    pub test_text: &'static str,
    pub results: BTreeMap<&'static str, ProbeResult>,
}

// ==================== Helpers ====================

/// Unwrap a JSON body, turning extractor rejections into 400s.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            Err(ApiError::Validation("No JSON data provided".to_string()))
        }
        Err(rejection) => Err(ApiError::Validation(format!(
            "Invalid JSON body: {}",
            rejection.body_text()
        ))),
    }
}

fn required_text(text: Option<String>) -> Result<String, ApiError> {
    text.filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("No text provided for translation".to_string()))
}

fn sms_failure(err: SmsError) -> ApiError {
    error!("SMS dispatch failed: {}", err);
    ApiError::from(err)
}

// ==================== Handlers ====================

/// `POST /api/send_sms`
pub async fn send_sms(
    State(state): State<AppState>,
    payload: Result<Json<ConsultationRequest>, JsonRejection>,
) -> Result<Json<SendSmsResponse>, ApiError> {
    let request = json_body(payload)?;
    let to = request.recipient()?;
    let message_type = request.message_type();

    let body = format_sms_body(
        MessageKind::parse(&message_type),
        &request.content(NOT_SPECIFIED),
        None,
    );

    let dispatch = state
        .sms
        .send_sms(&to, &body, &message_type)
        .await
        .map_err(sms_failure)?;

    Ok(Json(SendSmsResponse {
        status: "success",
        dispatch,
        language: None,
    }))
}

/// `POST /api/send-translated-sms`
pub async fn send_translated_sms(
    State(state): State<AppState>,
    payload: Result<Json<ConsultationRequest>, JsonRejection>,
) -> Result<Json<SendSmsResponse>, ApiError> {
    let request = json_body(payload)?;
    let to = request.recipient()?;
    let message_type = request.message_type();
    let language_name = request
        .language_name
        .clone()
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    let body = format_sms_body(
        MessageKind::parse(&message_type),
        &request.content(""),
        Some(&language_name),
    );

    let dispatch = state
        .sms
        .send_sms(&to, &body, &message_type)
        .await
        .map_err(sms_failure)?;

    info!(
        "Translated SMS sent successfully to {} in {}",
        dispatch.to, language_name
    );

    Ok(Json(SendSmsResponse {
        status: "success",
        dispatch,
        language: Some(language_name),
    }))
}

/// `POST /api/generate-translated-pdf`
pub async fn generate_translated_pdf(
    payload: Result<Json<ConsultationRequest>, JsonRejection>,
) -> Result<Json<PdfResponse>, ApiError> {
    let request = json_body(payload)?;
    let language_name = request
        .language_name
        .clone()
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());
    let patient_info = request
        .patient_info
        .clone()
        .unwrap_or_else(|| Value::Object(Default::default()));

    let pdf_content = PdfContent::build(request.content(""), &language_name, patient_info);

    info!("PDF content prepared for {} translation", language_name);

    Ok(Json(PdfResponse {
        status: "success",
        pdf_content,
        message: "PDF content prepared for frontend generation",
        timestamp: Utc::now(),
    }))
}

/// `POST /api/translate`
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let request = json_body(payload)?;
    let text = required_text(request.text)?;
    let source = request
        .source_lang
        .unwrap_or_else(|| DEFAULT_SOURCE_LOCALE.to_string());
    let target = request
        .target_lang
        .unwrap_or_else(|| DEFAULT_TARGET_LOCALE.to_string());

    let translated_text = state.translator.translate(&text, &source, &target).await?;

    Ok(Json(TranslateResponse {
        status: "success",
        translated_text,
        language_name: state.languages.display_name_for_locale(&target).to_string(),
        source_language: source,
        target_language: target,
        timestamp: Utc::now(),
    }))
}

/// `GET /api/languages`
pub async fn languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        status: "success",
        languages: state.languages.table(),
        default_source: DEFAULT_SOURCE_LOCALE,
        timestamp: Utc::now(),
    })
}

/// `POST /api/batch-translate`
pub async fn batch_translate(
    State(state): State<AppState>,
    payload: Result<Json<BatchTranslateRequest>, JsonRejection>,
) -> Result<Json<BatchTranslateResponse>, ApiError> {
    let request = json_body(payload)?;
    let text = required_text(request.text)?;
    let targets = request.target_languages.unwrap_or_default();
    if targets.is_empty() {
        return Err(ApiError::Validation(
            "No target languages specified".to_string(),
        ));
    }

    let translations = state.translator.batch_translate(&text, &targets).await?;

    let failed = translations.values().filter(|e| !e.is_success()).count();
    info!(
        "Batch translation finished: {} succeeded, {} failed",
        translations.len() - failed,
        failed
    );

    Ok(Json(BatchTranslateResponse {
        status: "success",
        translations,
        timestamp: Utc::now(),
    }))
}

/// `POST /api/test-translate`
pub async fn test_translate(
    State(state): State<AppState>,
) -> Result<Json<SelfTestResponse>, ApiError> {
    let probes = join_all(
        SELF_TEST_LANGUAGES
            .iter()
            .map(|language| state.translator.probe(SELF_TEST_TEXT, *language)),
    )
    .await;

    let mut results = BTreeMap::new();
    for (language, probe) in SELF_TEST_LANGUAGES.iter().zip(probes) {
        let probe = probe.map_err(|e| {
            error!("Translation self-test failed for {}: {}", language.locale_code(), e);
            ApiError::Internal(e.to_string())
        })?;
        results.insert(language.locale_code(), probe);
    }

    Ok(Json(SelfTestResponse {
        status: "success",
        test_text: SELF_TEST_TEXT,
        results,
    }))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::from_config(&state.config))
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
