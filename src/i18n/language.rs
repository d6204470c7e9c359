//! Language type: a locale validated against the registry.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};

/// A supported translation target or source.
///
/// Only constructible from codes present in the registry, so holders never
/// need to re-check support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    short_code: &'static str,
}

impl Language {
    pub const HINDI: Language = Language { short_code: "hi" };
    pub const MARATHI: Language = Language { short_code: "mr" };
    pub const TAMIL: Language = Language { short_code: "ta" };
    pub const TELUGU: Language = Language { short_code: "te" };

    /// Create a Language from a provider locale code (e.g., "hi-IN").
    ///
    /// # Returns
    /// * `Ok(Language)` if the locale is in the registry
    /// * `Err` otherwise
    pub fn from_locale(locale: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_locale(locale) {
            Some(config) => Ok(Language {
                short_code: config.short_code,
            }),
            None => bail!("Unsupported locale code: '{}'", locale),
        }
    }

    pub fn short_code(&self) -> &'static str {
        self.short_code
    }

    /// # Panics
    /// Panics if the short code is missing from the registry, which cannot
    /// happen for a Language built through the constructors or constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_short_code(self.short_code)
            .expect("Language code should always be valid")
    }

    pub fn locale_code(&self) -> &'static str {
        self.config().locale_code
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }
}
