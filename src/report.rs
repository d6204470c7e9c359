//! Content bundle for the consultation PDF.
//!
//! Rendering happens in the browser; this only arranges the already
//! translated text and patient metadata.

use crate::formatter::ConsultationContent;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct PdfSections {
    pub diagnosis: String,
    pub nutrition: String,
    pub notes: String,
    pub medicines: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PdfContent {
    pub title: String,
    pub language: String,
    pub sections: PdfSections,
    pub patient_info: Value,
    pub timestamp: DateTime<Utc>,
    pub generated_at: String,
}

impl PdfContent {
    pub fn build(content: ConsultationContent, language_name: &str, patient_info: Value) -> Self {
        let now = Utc::now();
        Self {
            title: format!("Medical Consultation Report ({})", language_name),
            language: language_name.to_string(),
            sections: PdfSections {
                diagnosis: content.diagnosis,
                nutrition: content.nutrition,
                notes: content.notes,
                medicines: content.medicines,
            },
            patient_info,
            timestamp: now,
            generated_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
