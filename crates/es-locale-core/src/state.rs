//! The persisted state shape: languages, translations and options.

use crate::options::Options;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Translation key (dot-delimited) to one slot per registered language.
///
/// Slot `i` belongs to `languages[i]`. `None` marks a translation that has
/// not been provided yet, as opposed to `Some("")`.
pub type Translations = IndexMap<String, Vec<Option<String>>>;

/// Translations projected onto a single language slot; absent slots are
/// omitted.
pub type LanguageTranslations = IndexMap<String, String>;

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Language {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub code: String,
    pub active: bool,
}

impl Language {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            name: None,
            code: code.into(),
            active: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn activated(mut self) -> Self {
        self.active = true;
        self
    }
}

/// A language as supplied to an initialize action: a bare code or a
/// `{name, code}` record.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LanguageInput {
    Code(String),
    Named { name: String, code: String },
}

impl LanguageInput {
    pub fn code(&self) -> &str {
        match self {
            LanguageInput::Code(code) => code,
            LanguageInput::Named { code, .. } => code,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            LanguageInput::Code(_) => None,
            LanguageInput::Named { name, .. } => Some(name),
        }
    }
}

impl From<&str> for LanguageInput {
    fn from(code: &str) -> Self {
        LanguageInput::Code(code.to_string())
    }
}

impl From<String> for LanguageInput {
    fn from(code: String) -> Self {
        LanguageInput::Code(code)
    }
}

impl From<(&str, &str)> for LanguageInput {
    fn from((name, code): (&str, &str)) -> Self {
        LanguageInput::Named {
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

/// Root state. Reducers always return a new value; `translations` sits
/// behind an `Arc` so untouched maps are shared between snapshots.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LocaleState {
    pub languages: Vec<Language>,
    pub translations: Arc<Translations>,
    pub options: Options,
}

impl LocaleState {
    /// Language codes in registration order, which is also slot order.
    pub fn language_codes(&self) -> Vec<String> {
        self.languages.iter().map(|lang| lang.code.clone()).collect()
    }
}
