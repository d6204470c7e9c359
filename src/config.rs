use anyhow::{Context, Result};

pub const DEFAULT_MESSAGING_SERVICE_SID: &str = "MG5f279602eea059dd0207a0ddc7e18290";

#[derive(Debug, Clone)]
pub struct Config {
    // Twilio
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub messaging_service_sid: String,
    pub twilio_api_url: String,

    // Sarvam AI
    pub sarvam_api_key: Option<String>,
    pub sarvam_api_url: String,
    pub sarvam_model: String,
    pub translation_timeout_secs: u64,
    pub test_translation_timeout_secs: u64,

    // Server
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Twilio - credentials are optional so /api/health can report them
            twilio_account_sid: optional_var("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: optional_var("TWILIO_AUTH_TOKEN"),
            messaging_service_sid: optional_var("MESSAGING_SERVICE_SID")
                .unwrap_or_else(|| DEFAULT_MESSAGING_SERVICE_SID.to_string()),
            twilio_api_url: optional_var("TWILIO_API_URL")
                .unwrap_or_else(|| "https://api.twilio.com".to_string()),

            // Sarvam AI
            sarvam_api_key: optional_var("SARVAM_API_KEY"),
            sarvam_api_url: optional_var("SARVAM_API_URL")
                .unwrap_or_else(|| "https://api.sarvam.ai/translate".to_string()),
            sarvam_model: optional_var("SARVAM_MODEL")
                .unwrap_or_else(|| "sarvam-translate:v1".to_string()),
            translation_timeout_secs: parsed_var("TRANSLATION_TIMEOUT_SECS", 30)?,
            test_translation_timeout_secs: parsed_var("TEST_TRANSLATION_TIMEOUT_SECS", 10)?,

            // Server
            host: optional_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed_var("PORT", 5000)?,
        })
    }

    /// Both Twilio credentials are present.
    pub fn twilio_configured(&self) -> bool {
        self.twilio_account_sid.is_some() && self.twilio_auth_token.is_some()
    }

    pub fn sarvam_configured(&self) -> bool {
        self.sarvam_api_key.is_some()
    }
}

/// Read a variable, treating an empty value the same as an unset one.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", name, raw)),
        None => Ok(default),
    }
}
