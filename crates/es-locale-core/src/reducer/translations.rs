use crate::action::{AddTranslationPayload, LocaleAction};
use crate::options::{Options, TransformOrder};
use crate::state::Translations;
use crate::utils::{
    FlatTranslations, TranslationShape, flat_to_value, flatten, merge_translations,
    multi_language_translations, single_to_multi_language,
};
use std::sync::Arc;

/// `language_codes` are the codes after the languages reducer ran for this
/// action. `options` are the persisted options before this action.
pub fn translations_reducer(
    state: &Arc<Translations>,
    action: &LocaleAction,
    language_codes: &[String],
    options: &Options,
) -> Arc<Translations> {
    match action {
        LocaleAction::Initialize(payload) => {
            let Some(translation) = &payload.translation else {
                return Arc::clone(state);
            };
            let flat = flatten(translation);
            let contribution = match TranslationShape::detect(&flat) {
                TranslationShape::MultiLanguage => multi_language_translations(flat),
                TranslationShape::SingleLanguage => {
                    let default_language = payload
                        .options
                        .as_ref()
                        .and_then(|options| options.default_language.as_deref())
                        .or_else(|| language_codes.first().map(String::as_str));
                    match default_language {
                        Some(language) => {
                            single_to_multi_language(language, language_codes, &flat, state)
                        },
                        None => Translations::new(),
                    }
                },
            };
            merge_translations(state, contribution)
        },
        LocaleAction::AddTranslation(payload) => {
            let flat = transformed_payload(payload, language_codes, options);
            merge_translations(state, multi_language_translations(flat))
        },
        LocaleAction::AddTranslationForLanguage(payload) => {
            let flat = flatten(&payload.translation);
            let contribution =
                single_to_multi_language(&payload.language, language_codes, &flat, state);
            merge_translations(state, contribution)
        },
        LocaleAction::SetActiveLanguage(_) => Arc::clone(state),
    }
}

fn transformed_payload(
    payload: &AddTranslationPayload,
    language_codes: &[String],
    options: &Options,
) -> FlatTranslations {
    let transform = payload
        .translation_options
        .translation_transform
        .as_ref()
        .or(options.translation_transform.as_ref());

    let Some(transform) = transform else {
        return flatten(&payload.translation);
    };

    match options.transform_order {
        TransformOrder::BeforeFlatten => {
            flatten(&transform.apply(&payload.translation, language_codes))
        },
        TransformOrder::AfterFlatten => {
            let flat = flat_to_value(&flatten(&payload.translation));
            flatten(&transform.apply(&flat, language_codes))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{
        InitializePayload, TranslationOptions, add_translation, add_translation_for_language,
        add_translation_with_options, initialize, set_active_language,
    };
    use crate::options::{OptionsPatch, TranslationTransform};
    use serde_json::{Value, json};

    fn codes(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|code| code.to_string()).collect()
    }

    fn slots(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|value| value.map(str::to_string)).collect()
    }

    fn empty() -> Arc<Translations> {
        Arc::new(Translations::new())
    }

    fn init_with(translation: Value, options: Option<OptionsPatch>) -> LocaleAction {
        initialize(
            InitializePayload::builder()
                .languages(vec!["en".into(), "fr".into()])
                .translation(translation)
                .maybe_options(options)
                .build(),
        )
    }

    #[test]
    fn initialize_single_language_targets_first_language() {
        let result = translations_reducer(
            &empty(),
            &init_with(json!({ "greeting": "hi" }), None),
            &codes(&["en", "fr"]),
            &Options::default(),
        );

        assert_eq!(result["greeting"], slots(&[Some("hi"), None]));
    }

    #[test]
    fn initialize_single_language_targets_default_language() {
        let options = OptionsPatch::builder().default_language("fr").build();
        let result = translations_reducer(
            &empty(),
            &init_with(json!({ "greeting": "salut" }), Some(options)),
            &codes(&["en", "fr"]),
            &Options::default(),
        );

        assert_eq!(result["greeting"], slots(&[None, Some("salut")]));
    }

    #[test]
    fn initialize_multi_language_merges_directly() {
        let mut state = Translations::new();
        state.insert("kept".to_string(), slots(&[Some("k"), None]));

        let result = translations_reducer(
            &Arc::new(state),
            &init_with(json!({ "nav": { "home": ["Home", "Accueil"] } }), None),
            &codes(&["en", "fr"]),
            &Options::default(),
        );

        assert_eq!(result["nav.home"], slots(&[Some("Home"), Some("Accueil")]));
        assert_eq!(result["kept"], slots(&[Some("k"), None]));
    }

    #[test]
    fn initialize_without_translation_passes_through() {
        let state = empty();
        let action = initialize(
            InitializePayload::builder()
                .languages(vec!["en".into()])
                .build(),
        );
        let result = translations_reducer(&state, &action, &codes(&["en"]), &Options::default());
        assert!(Arc::ptr_eq(&state, &result));
    }

    #[test]
    fn add_translation_replaces_whole_sequences() {
        let mut state = Translations::new();
        state.insert("title".to_string(), slots(&[Some("Old"), Some("Vieux")]));

        let result = translations_reducer(
            &Arc::new(state),
            &add_translation(json!({ "title": ["New", null] })),
            &codes(&["en", "fr"]),
            &Options::default(),
        );

        assert_eq!(result["title"], slots(&[Some("New"), None]));
    }

    #[test]
    fn add_translation_for_language_preserves_other_slots() {
        let mut state = Translations::new();
        state.insert("title".to_string(), slots(&[None, Some("titrefr")]));

        let result = translations_reducer(
            &Arc::new(state),
            &add_translation_for_language(json!({ "title": "Title" }), "en"),
            &codes(&["en", "fr"]),
            &Options::default(),
        );

        assert_eq!(result["title"], slots(&[Some("Title"), Some("titrefr")]));
    }

    #[test]
    fn add_translation_for_unknown_language_is_noop() {
        let state = empty();
        let result = translations_reducer(
            &state,
            &add_translation_for_language(json!({ "title": "Title" }), "zz"),
            &codes(&["en", "fr"]),
            &Options::default(),
        );
        assert!(result.is_empty());
        assert!(Arc::ptr_eq(&state, &result));
    }

    /// Turns `{ "en": {..}, "fr": {..} }` into a multi-language payload.
    fn by_language_transform() -> TranslationTransform {
        TranslationTransform::new(|payload, language_codes| {
            let mut merged = serde_json::Map::new();
            for (index, code) in language_codes.iter().enumerate() {
                let Some(Value::Object(entries)) = payload.get(code) else {
                    continue;
                };
                for (key, value) in entries {
                    let slot = merged
                        .entry(key.clone())
                        .or_insert_with(|| Value::Array(vec![Value::Null; language_codes.len()]));
                    if let Value::Array(slots) = slot {
                        slots[index] = value.clone();
                    }
                }
            }
            Value::Object(merged)
        })
    }

    #[test]
    fn add_translation_applies_action_transform_before_flatten() {
        let action = add_translation_with_options(
            json!({ "en": { "hi": "Hi" }, "fr": { "hi": "Salut" } }),
            TranslationOptions::builder()
                .translation_transform(by_language_transform())
                .build(),
        );

        let result = translations_reducer(
            &empty(),
            &action,
            &codes(&["en", "fr"]),
            &Options::default(),
        );

        assert_eq!(result["hi"], slots(&[Some("Hi"), Some("Salut")]));
    }

    #[test]
    fn add_translation_applies_options_transform_after_flatten() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let options = Options {
            transform_order: TransformOrder::AfterFlatten,
            translation_transform: Some(TranslationTransform::new(move |payload, codes| {
                recorder.lock().push(payload.clone());
                let Value::Object(map) = payload else {
                    return Value::Null;
                };
                let mapped = map
                    .iter()
                    .map(|(key, value)| {
                        let mut slots = vec![Value::Null; codes.len()];
                        slots[0] = value.clone();
                        (key.clone(), Value::Array(slots))
                    })
                    .collect();
                Value::Object(mapped)
            })),
            ..Options::default()
        };

        let result = translations_reducer(
            &empty(),
            &add_translation(json!({ "nav": { "home": "Home" } })),
            &codes(&["en", "fr"]),
            &options,
        );

        assert_eq!(seen.lock().as_slice(), &[json!({ "nav.home": "Home" })]);
        assert_eq!(result["nav.home"], slots(&[Some("Home"), None]));
    }

    #[test]
    fn set_active_language_passes_through() {
        let state = empty();
        let result = translations_reducer(
            &state,
            &set_active_language("fr"),
            &codes(&["en", "fr"]),
            &Options::default(),
        );
        assert!(Arc::ptr_eq(&state, &result));
    }
}
