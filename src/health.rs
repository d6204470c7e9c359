use crate::config::Config;
use crate::i18n::LanguageRegistry;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SERVICE_NAME: &str = "Medical Consultation API";

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub features: Features,
    pub dependencies: Dependencies,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Features {
    pub sms: &'static str,
    pub translation: &'static str,
    pub translated_sms: &'static str,
    pub pdf_generation: &'static str,
    pub supported_languages: usize,
}

#[derive(Debug, Serialize)]
pub struct Dependencies {
    pub twilio: &'static str,
    pub sarvam_ai: &'static str,
}

impl HealthReport {
    /// Build the report from what is configured.
    ///
    /// Missing credentials degrade the status but never fail the check.
    pub fn from_config(config: &Config) -> Self {
        let twilio_ok = config.twilio_configured();
        let sarvam_ok = config.sarvam_configured();
        let healthy = twilio_ok && sarvam_ok;

        Self {
            status: if healthy { "healthy" } else { "degraded" },
            service: SERVICE_NAME,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            features: Features {
                sms: "enabled",
                translation: "enabled",
                translated_sms: "enabled",
                pdf_generation: "enabled",
                supported_languages: LanguageRegistry::get().list_all().len(),
            },
            dependencies: Dependencies {
                twilio: if twilio_ok { "connected" } else { "misconfigured" },
                sarvam_ai: if sarvam_ok { "configured" } else { "not_configured" },
            },
            message: if healthy {
                None
            } else {
                Some("Some dependencies are not properly configured")
            },
        }
    }
}
