use crate::action::LocaleAction;
use crate::state::{Language, LanguageInput};

pub fn languages_reducer(state: &[Language], action: &LocaleAction) -> Vec<Language> {
    match action {
        LocaleAction::Initialize(payload) => {
            let active_code = payload
                .active_language
                .as_deref()
                .or_else(|| {
                    payload
                        .options
                        .as_ref()
                        .and_then(|options| options.default_language.as_deref())
                })
                .or_else(|| payload.languages.first().map(LanguageInput::code));

            payload
                .languages
                .iter()
                .map(|input| Language {
                    name: input.name().map(str::to_string),
                    code: input.code().to_string(),
                    active: Some(input.code()) == active_code,
                })
                .collect()
        },
        LocaleAction::SetActiveLanguage(payload) => {
            if !state.iter().any(|lang| lang.code == payload.language_code) {
                tracing::debug!(
                    "Language '{}' is not registered, no language is active",
                    payload.language_code
                );
            }
            state
                .iter()
                .map(|lang| Language {
                    active: lang.code == payload.language_code,
                    ..lang.clone()
                })
                .collect()
        },
        LocaleAction::AddTranslation(_) | LocaleAction::AddTranslationForLanguage(_) => {
            state.to_vec()
        },
    }
}
