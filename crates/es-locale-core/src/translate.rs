//! Translation resolution: lookup, missing-translation fallback,
//! placeholder substitution and the markup decision.

use crate::element::{Fragment, PlaceholderData, PlaceholderValue, Translated};
use crate::error::{LocaleError, LocaleResult};
use crate::markup::has_html_tags;
use crate::options::{MissingTranslation, Options, TranslateOptions, describe};
use crate::selectors::{Selectors, get_active_language};
use crate::state::{Language, LanguageTranslations, LocaleState};
use crate::templater::templater;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Passed to the missing-translation handler when the default language
/// lacks the key as well.
pub const MISSING_DEFAULT_TRANSLATION: &str =
    "No default translation found! Ensure you've added translations for your default language.";

/// One key or several keys to translate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TranslationKey {
    Single(String),
    Multi(Vec<String>),
}

impl From<&str> for TranslationKey {
    fn from(key: &str) -> Self {
        TranslationKey::Single(key.to_string())
    }
}

impl From<String> for TranslationKey {
    fn from(key: String) -> Self {
        TranslationKey::Single(key)
    }
}

impl From<Vec<String>> for TranslationKey {
    fn from(keys: Vec<String>) -> Self {
        TranslationKey::Multi(keys)
    }
}

impl From<&[&str]> for TranslationKey {
    fn from(keys: &[&str]) -> Self {
        TranslationKey::Multi(keys.iter().map(|key| key.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TranslationKey {
    fn from(keys: [&str; N]) -> Self {
        TranslationKey::Multi(keys.iter().map(|key| key.to_string()).collect())
    }
}

impl TryFrom<&Value> for TranslationKey {
    type Error = LocaleError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(key) => Ok(TranslationKey::Single(key.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(key) => Ok(key.clone()),
                    other => Err(LocaleError::InvalidKey {
                        found: format!("an array containing {}", describe(other)),
                    }),
                })
                .collect::<LocaleResult<Vec<_>>>()
                .map(TranslationKey::Multi),
            other => Err(LocaleError::InvalidKey {
                found: describe(other).to_string(),
            }),
        }
    }
}

/// Mirrors [`TranslationKey`]: one result, or one result per requested key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TranslateResult {
    Single(Translated),
    Multi(IndexMap<String, Translated>),
}

impl TranslateResult {
    pub fn into_single(self) -> Option<Translated> {
        match self {
            TranslateResult::Single(translated) => Some(translated),
            TranslateResult::Multi(_) => None,
        }
    }

    pub fn into_multi(self) -> Option<IndexMap<String, Translated>> {
        match self {
            TranslateResult::Single(_) => None,
            TranslateResult::Multi(map) => Some(map),
        }
    }
}

/// The translate function for one state snapshot.
pub struct Translator<'a> {
    selectors: &'a Selectors,
    state: &'a LocaleState,
    active_translations: Arc<LanguageTranslations>,
}

/// Everything a single translate call resolves once and shares across keys.
struct CallContext<'c> {
    options: Options,
    language_code: Option<&'c str>,
    translations: Arc<LanguageTranslations>,
    default_translations: Arc<LanguageTranslations>,
}

impl<'a> Translator<'a> {
    pub(crate) fn new(
        selectors: &'a Selectors,
        state: &'a LocaleState,
        active_translations: Arc<LanguageTranslations>,
    ) -> Self {
        Self {
            selectors,
            state,
            active_translations,
        }
    }

    pub fn active_language(&self) -> Option<&'a Language> {
        get_active_language(self.state)
    }

    pub fn translate(&self, key: impl Into<TranslationKey>) -> TranslateResult {
        self.translate_with(key, &PlaceholderData::new(), &TranslateOptions::default())
    }

    pub fn translate_with(
        &self,
        key: impl Into<TranslationKey>,
        data: &PlaceholderData,
        overrides: &TranslateOptions,
    ) -> TranslateResult {
        let context = self.call_context(overrides);
        match key.into() {
            TranslationKey::Single(key) => TranslateResult::Single(self.resolve(&key, data, &context)),
            TranslationKey::Multi(keys) => TranslateResult::Multi(
                keys.into_iter()
                    .map(|key| {
                        let translated = self.resolve(&key, data, &context);
                        (key, translated)
                    })
                    .collect(),
            ),
        }
    }

    /// Like [`Translator::translate_with`] for keys that arrive as dynamic
    /// data; anything but a string or an array of strings is rejected.
    pub fn translate_value(
        &self,
        key: &Value,
        data: &PlaceholderData,
        overrides: &TranslateOptions,
    ) -> LocaleResult<TranslateResult> {
        let key = TranslationKey::try_from(key)?;
        Ok(self.translate_with(key, data, overrides))
    }

    /// Translates a single key without data and flattens the result to text.
    pub fn text(&self, key: &str) -> String {
        self.translate(key)
            .into_single()
            .map(|translated| translated.to_string())
            .unwrap_or_default()
    }

    fn call_context<'c>(&self, overrides: &'c TranslateOptions) -> CallContext<'c>
    where
        'a: 'c,
    {
        let active_code = self.active_language().map(|lang| lang.code.as_str());
        let language_code = overrides.language.as_deref().or(active_code);

        let translations = match overrides.language.as_deref() {
            Some(language) => self.selectors.translations_for_language(self.state, language),
            None => Arc::clone(&self.active_translations),
        };

        let default_language = self.state.options.default_language.as_deref();
        let default_translations = match default_language {
            Some(default) if active_code == Some(default) => Arc::clone(&self.active_translations),
            Some(default) => self.selectors.translations_for_language(self.state, default),
            None => Arc::new(LanguageTranslations::new()),
        };

        CallContext {
            options: self.state.options.with_overrides(overrides),
            language_code,
            translations,
            default_translations,
        }
    }

    fn resolve(&self, key: &str, data: &PlaceholderData, context: &CallContext<'_>) -> Translated {
        let render_inner_html = context.options.render_inner_html;

        if let Some(text) = context.translations.get(key) {
            return localize(text, data, render_inner_html);
        }

        let default_translation = match context.default_translations.get(key) {
            Some(text) => localize(text, data, render_inner_html),
            None => Translated::Text(MISSING_DEFAULT_TRANSLATION.to_string()),
        };
        let missing = MissingTranslation {
            translation_id: key,
            language_code: context.language_code,
            default_translation: &default_translation,
        };
        let message = context.options.on_missing_translation.resolve(&missing);

        let mut missing_data = PlaceholderData::new();
        missing_data.insert("translationId".to_string(), PlaceholderValue::from(key));
        if let Some(code) = context.language_code {
            missing_data.insert("languageCode".to_string(), PlaceholderValue::from(code));
        }
        if let Some(text) = default_translation.as_str() {
            missing_data.insert("defaultTranslation".to_string(), PlaceholderValue::from(text));
        }

        localize(&message, &missing_data, render_inner_html)
    }
}

/// Substitutes `data` into `text` and decides between text and markup.
///
/// Fragment results cannot carry markup: if any text fragment looks like
/// markup the result is an empty string.
pub fn localize(text: &str, data: &PlaceholderData, render_inner_html: bool) -> Translated {
    match templater(text, data) {
        Translated::Text(text) if render_inner_html && has_html_tags(&text) => Translated::Markup(text),
        Translated::Fragments(fragments)
            if fragments
                .iter()
                .any(|fragment| matches!(fragment, Fragment::Text(text) if has_html_tags(text))) =>
        {
            tracing::warn!(
                "HTML tags in a translation are not supported when elements are passed as data"
            );
            Translated::Text(String::new())
        },
        translated => translated,
    }
}
