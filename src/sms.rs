use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("Recipient phone number ('to') is required.")]
    MissingRecipient,

    #[error("Twilio credentials are not configured")]
    MissingCredentials,

    /// Twilio refused the message (invalid or unverified number, bad auth, ...)
    #[error("Twilio rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    Transport(String),
}

/// Successful Messages API response; only the SID is needed
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// Twilio REST error payload
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmsDispatchResult {
    pub message_sid: String,
    pub to: String,
    pub message_type: String,
    pub timestamp: DateTime<Utc>,
}

/// Client for the Twilio Messages API.
///
/// Messages are addressed through a Messaging Service SID, which lets Twilio
/// pick the sending number from the service's pool.
#[derive(Debug, Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    api_url: String,
    account_sid: Option<String>,
    auth_token: Option<String>,
    messaging_service_sid: String,
}

impl SmsClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.twilio_api_url.trim_end_matches('/').to_string(),
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            messaging_service_sid: config.messaging_service_sid.clone(),
        }
    }

    /// Send an SMS via the Twilio API
    ///
    /// `message_type` is only echoed back in the result for the caller's
    /// response.
    pub async fn send_sms(
        &self,
        to: &str,
        body: &str,
        message_type: &str,
    ) -> Result<SmsDispatchResult, SmsError> {
        if to.trim().is_empty() {
            return Err(SmsError::MissingRecipient);
        }
        let (account_sid, auth_token) = match (&self.account_sid, &self.auth_token) {
            (Some(sid), Some(token)) => (sid, token),
            _ => return Err(SmsError::MissingCredentials),
        };

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url, account_sid
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(account_sid, Some(auth_token))
            .form(&[
                ("To", to),
                ("Body", body),
                ("MessagingServiceSid", self.messaging_service_sid.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                SmsError::Transport(format!("Failed to send request to Twilio API: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            error!("Twilio API error ({}): {}", status, text);
            return Err(rejection(status, &text));
        }

        let message: MessageResource = response
            .json()
            .await
            .map_err(|e| SmsError::Transport(format!("Failed to parse Twilio response: {}", e)))?;

        info!(
            "SMS sent successfully to {}. Message SID: {}",
            to, message.sid
        );
        info!(
            "Message type: {}, Length: {} chars",
            message_type,
            body.chars().count()
        );

        Ok(SmsDispatchResult {
            message_sid: message.sid,
            to: to.to_string(),
            message_type: message_type.to_string(),
            timestamp: Utc::now(),
        })
    }
}

/// Build a rejection from a non-2xx response, preferring Twilio's own message.
fn rejection(status: u16, text: &str) -> SmsError {
    let message = serde_json::from_str::<TwilioErrorBody>(text)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("HTTP {} error: {}", status, text));

    SmsError::Rejected { status, message }
}
