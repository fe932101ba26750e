//! The four actions consumed by the root reducer, and their creators.

use crate::options::{OptionsPatch, TranslationTransform};
use crate::state::LanguageInput;
use bon::Builder;
use serde_json::Value;

#[derive(Builder, Clone, Debug)]
pub struct InitializePayload {
    pub languages: Vec<LanguageInput>,
    /// Nested translation data, single- or multi-language shaped.
    pub translation: Option<Value>,
    pub options: Option<OptionsPatch>,
    /// Takes precedence over `options.default_language` when picking the
    /// active language.
    #[builder(into)]
    pub active_language: Option<String>,
}

/// Per-action settings for [`LocaleAction::AddTranslation`].
#[derive(Builder, Clone, Debug, Default)]
pub struct TranslationOptions {
    /// Overrides the transform configured in the persisted options.
    pub translation_transform: Option<TranslationTransform>,
}

#[derive(Clone, Debug)]
pub struct AddTranslationPayload {
    pub translation: Value,
    pub translation_options: TranslationOptions,
}

#[derive(Clone, Debug)]
pub struct AddTranslationForLanguagePayload {
    pub translation: Value,
    pub language: String,
}

#[derive(Clone, Debug)]
pub struct SetActiveLanguagePayload {
    pub language_code: String,
}

#[derive(Clone, Debug, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LocaleAction {
    Initialize(InitializePayload),
    AddTranslation(AddTranslationPayload),
    AddTranslationForLanguage(AddTranslationForLanguagePayload),
    SetActiveLanguage(SetActiveLanguagePayload),
}

impl LocaleAction {
    /// Action type name, e.g. `ADD_TRANSLATION_FOR_LANGUAGE`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

pub fn initialize(payload: InitializePayload) -> LocaleAction {
    LocaleAction::Initialize(payload)
}

pub fn add_translation(translation: Value) -> LocaleAction {
    add_translation_with_options(translation, TranslationOptions::default())
}

pub fn add_translation_with_options(
    translation: Value,
    translation_options: TranslationOptions,
) -> LocaleAction {
    LocaleAction::AddTranslation(AddTranslationPayload {
        translation,
        translation_options,
    })
}

pub fn add_translation_for_language(
    translation: Value,
    language: impl Into<String>,
) -> LocaleAction {
    LocaleAction::AddTranslationForLanguage(AddTranslationForLanguagePayload {
        translation,
        language: language.into(),
    })
}

pub fn set_active_language(language_code: impl Into<String>) -> LocaleAction {
    LocaleAction::SetActiveLanguage(SetActiveLanguagePayload {
        language_code: language_code.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_kinds() {
        assert_eq!(set_active_language("en").kind(), "SET_ACTIVE_LANGUAGE");
        assert_eq!(add_translation(json!({})).kind(), "ADD_TRANSLATION");
        assert_eq!(
            add_translation_for_language(json!({}), "en").kind(),
            "ADD_TRANSLATION_FOR_LANGUAGE"
        );
        let init = initialize(InitializePayload::builder().languages(vec!["en".into()]).build());
        assert_eq!(init.kind(), "INITIALIZE");
    }
}
