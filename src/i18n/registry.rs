//! Language registry: Single source of truth for all supported languages.
//!
//! The table is fixed at compile time and built once on first access through
//! `OnceLock`. Nothing mutates it afterwards, so handlers share a plain
//! `&'static` reference.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Locale every translation starts from unless the caller says otherwise.
pub const DEFAULT_SOURCE_LOCALE: &str = "en-IN";

/// Configuration for a supported language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageConfig {
    /// Two-letter key used internally (e.g., "hi", "mr")
    #[serde(skip)]
    pub short_code: &'static str,

    /// Locale code understood by the translation provider (e.g., "hi-IN")
    #[serde(rename = "code")]
    pub locale_code: &'static str,

    /// English display name (e.g., "Hindi")
    pub name: &'static str,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its short code.
    ///
    /// # Arguments
    /// * `code` - The two-letter key (e.g., "hi", "ta")
    pub fn get_by_short_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.short_code == code)
    }

    /// Get a language configuration by its provider locale code (e.g., "hi-IN").
    pub fn get_by_locale(&self, locale: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.locale_code == locale)
    }

    /// All languages in registry order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// The table keyed by short code, as served by `GET /api/languages`.
    pub fn table(&self) -> BTreeMap<&'static str, &LanguageConfig> {
        self.languages
            .iter()
            .map(|lang| (lang.short_code, lang))
            .collect()
    }

    /// Check whether a locale code belongs to the supported set.
    pub fn is_supported_locale(&self, locale: &str) -> bool {
        self.get_by_locale(locale).is_some()
    }

    /// All supported locale codes, in registry order.
    pub fn locale_codes(&self) -> Vec<&'static str> {
        self.languages.iter().map(|lang| lang.locale_code).collect()
    }

    /// Display name for a short code, falling back to the code itself.
    pub fn display_name<'a>(&'a self, short_code: &'a str) -> &'a str {
        self.get_by_short_code(short_code)
            .map(|lang| lang.name)
            .unwrap_or(short_code)
    }

    /// Display name for a locale code.
    ///
    /// The locale's language part ("hi" of "hi-IN") is looked up in the
    /// registry; unknown locales fall back to the raw locale string.
    pub fn display_name_for_locale<'a>(&'a self, locale: &'a str) -> &'a str {
        let short_code = locale.split('-').next().unwrap_or(locale);
        self.get_by_short_code(short_code)
            .map(|lang| lang.name)
            .unwrap_or(locale)
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    [
        ("mr", "mr-IN", "Marathi"),
        ("hi", "hi-IN", "Hindi"),
        ("ta", "ta-IN", "Tamil"),
        ("te", "te-IN", "Telugu"),
        ("kn", "kn-IN", "Kannada"),
        ("bn", "bn-IN", "Bengali"),
        ("gu", "gu-IN", "Gujarati"),
        ("ml", "ml-IN", "Malayalam"),
        ("pa", "pa-IN", "Punjabi"),
        ("en", "en-IN", "English"),
    ]
    .into_iter()
    .map(|(short_code, locale_code, name)| LanguageConfig {
        short_code,
        locale_code,
        name,
    })
    .collect()
}
