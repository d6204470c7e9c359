use std::sync::Arc;

use crate::config::Config;
use crate::i18n::LanguageRegistry;
use crate::sms::SmsClient;
use crate::translation::TranslationClient;

/// Shared, read-only context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub languages: &'static LanguageRegistry,
    pub translator: Arc<TranslationClient>,
    pub sms: Arc<SmsClient>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            translator: Arc::new(TranslationClient::new(http.clone(), &config)),
            sms: Arc::new(SmsClient::new(http, &config)),
            languages: LanguageRegistry::get(),
            config: Arc::new(config),
        })
    }

    /// Swap in a translation client, e.g. one with shorter timeouts.
    pub fn with_translator(mut self, translator: TranslationClient) -> Self {
        self.translator = Arc::new(translator);
        self
    }
}
