//! Supported languages for translation.
//!
//! - `registry`: the fixed table of ten Indian-language locales
//! - `language`: a `Language` type that can only hold a registered locale
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{Language, LanguageRegistry};
//!
//! let hindi = Language::from_locale("hi-IN")?;
//! let name = LanguageRegistry::get().display_name_for_locale("ta-IN");
//! ```

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry, DEFAULT_SOURCE_LOCALE};
