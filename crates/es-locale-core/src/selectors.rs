//! Derived data over a [`LocaleState`] snapshot.
//!
//! The plain getters borrow from the snapshot. [`Selectors`] owns the
//! memoized projections; create one per store so independent stores never
//! share caches.

use crate::memo::Memo;
use crate::options::Options;
use crate::state::{Language, LanguageTranslations, LocaleState, Translations};
use crate::translate::Translator;
use crate::utils::{index_for_language_code, translations_equal};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn get_languages(state: &LocaleState) -> &[Language] {
    &state.languages
}

pub fn get_active_language(state: &LocaleState) -> Option<&Language> {
    state.languages.iter().find(|lang| lang.active)
}

pub fn get_language_codes(state: &LocaleState) -> Vec<String> {
    state.language_codes()
}

pub fn get_translations(state: &LocaleState) -> &Translations {
    &state.translations
}

pub fn get_options(state: &LocaleState) -> &Options {
    &state.options
}

/// Every key's value in `slot`, skipping absent values and keys whose
/// sequence is shorter than `slot`.
pub fn project_slot(translations: &Translations, slot: usize) -> LanguageTranslations {
    translations
        .iter()
        .filter_map(|(key, slots)| {
            let value = slots.get(slot)?.clone()?;
            Some((key.clone(), value))
        })
        .collect()
}

#[derive(Clone)]
struct SlotInput {
    slot: Option<usize>,
    translations: Arc<Translations>,
}

fn slot_inputs_equal(left: &SlotInput, right: &SlotInput) -> bool {
    left.slot == right.slot && translations_equal(&left.translations, &right.translations)
}

#[derive(Clone)]
struct LanguagesInput {
    language_codes: Vec<String>,
    translations: Arc<Translations>,
}

fn languages_inputs_equal(left: &LanguagesInput, right: &LanguagesInput) -> bool {
    left.language_codes == right.language_codes
        && translations_equal(&left.translations, &right.translations)
}

/// Projections by language code for one (languages, translations) input.
#[derive(Default)]
struct LanguageProjections {
    by_code: Mutex<FxHashMap<String, Arc<LanguageTranslations>>>,
}

pub struct Selectors {
    active: Memo<SlotInput, LanguageTranslations>,
    specific: Memo<LanguagesInput, LanguageProjections>,
    language_projections: AtomicUsize,
}

impl Selectors {
    pub fn new() -> Self {
        Self {
            active: Memo::new(slot_inputs_equal),
            specific: Memo::new(languages_inputs_equal),
            language_projections: AtomicUsize::new(0),
        }
    }

    /// Translations for the active language; empty when no language is
    /// active.
    pub fn translations_for_active_language(&self, state: &LocaleState) -> Arc<LanguageTranslations> {
        let input = SlotInput {
            slot: state.languages.iter().position(|lang| lang.active),
            translations: Arc::clone(&state.translations),
        };
        self.active.get_or_compute(&input, |input| match input.slot {
            Some(slot) => project_slot(&input.translations, slot),
            None => LanguageTranslations::new(),
        })
    }

    /// Translations for an arbitrary language code; empty for unknown codes.
    pub fn translations_for_language(
        &self,
        state: &LocaleState,
        language_code: &str,
    ) -> Arc<LanguageTranslations> {
        let input = LanguagesInput {
            language_codes: state.language_codes(),
            translations: Arc::clone(&state.translations),
        };
        let projections = self
            .specific
            .get_or_compute(&input, |_| LanguageProjections::default());

        let mut by_code = projections.by_code.lock();
        if let Some(projection) = by_code.get(language_code) {
            return Arc::clone(projection);
        }

        let projection = Arc::new(
            match index_for_language_code(&input.language_codes, language_code) {
                Some(slot) => project_slot(&input.translations, slot),
                None => LanguageTranslations::new(),
            },
        );
        self.language_projections.fetch_add(1, Ordering::Relaxed);
        by_code.insert(language_code.to_string(), Arc::clone(&projection));
        projection
    }

    /// Builds the translate function for `state`.
    pub fn translator<'a>(&'a self, state: &'a LocaleState) -> Translator<'a> {
        Translator::new(self, state, self.translations_for_active_language(state))
    }

    /// How many times the active-language projection was computed.
    pub fn active_recomputations(&self) -> usize {
        self.active.recomputations()
    }

    /// How many per-code projections were computed.
    pub fn language_recomputations(&self) -> usize {
        self.language_projections.load(Ordering::Relaxed)
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Selectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selectors")
            .field("active", &self.active)
            .field("specific", &self.specific)
            .finish()
    }
}
