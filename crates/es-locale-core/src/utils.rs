//! Pure helpers shared by the reducers and selectors.

use crate::state::{LocaleState, Translations};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A flattened leaf: a scalar is a single-language value, a sequence holds
/// one slot per language.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FlatValue {
    Single(Option<String>),
    Multi(Vec<Option<String>>),
}

pub type FlatTranslations = IndexMap<String, FlatValue>;

/// Flattens a nested translation payload into dot-path keys.
///
/// Sequences are leaves. `null` is the absent marker, other non-string
/// scalars are stringified and empty nested objects contribute nothing.
/// Anything but an object flattens to nothing.
pub fn flatten(payload: &Value) -> FlatTranslations {
    let mut flat = FlatTranslations::new();
    match payload {
        Value::Object(map) => flatten_into(&mut flat, None, map),
        Value::Null => {},
        other => tracing::debug!(
            "Ignoring translation payload that is not an object: {}",
            other
        ),
    }
    flat
}

fn flatten_into(flat: &mut FlatTranslations, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(flat, Some(&path), nested),
            Value::Array(items) => {
                flat.insert(path, FlatValue::Multi(items.iter().map(leaf_text).collect()));
            },
            scalar => {
                flat.insert(path, FlatValue::Single(leaf_text(scalar)));
            },
        }
    }
}

fn leaf_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Converts flattened translations back into an object of dot-path keys.
pub fn flat_to_value(flat: &FlatTranslations) -> Value {
    let map = flat
        .iter()
        .map(|(key, value)| {
            let value = match value {
                FlatValue::Single(text) => text_value(text),
                FlatValue::Multi(slots) => Value::Array(slots.iter().map(text_value).collect()),
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(map)
}

fn text_value(text: &Option<String>) -> Value {
    text.clone().map_or(Value::Null, Value::String)
}

/// Looks up a dot-delimited key path in a nested payload.
///
/// Literal keys containing dots win over nested traversal.
pub fn lookup_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    let Value::Object(map) = payload else {
        return None;
    };
    if let Some(value) = map.get(path) {
        return Some(value);
    }
    let (head, rest) = path.split_once('.')?;
    lookup_path(map.get(head)?, rest)
}

/// Whether a payload carries one language or one slot per language.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TranslationShape {
    SingleLanguage,
    MultiLanguage,
}

impl TranslationShape {
    /// A payload is multi-language as soon as one flattened value is a
    /// sequence, including a single-element sequence. Scalars alone make it
    /// single-language.
    pub fn detect(flat: &FlatTranslations) -> Self {
        if flat.values().any(|value| matches!(value, FlatValue::Multi(_))) {
            TranslationShape::MultiLanguage
        } else {
            TranslationShape::SingleLanguage
        }
    }
}

pub fn index_for_language_code(language_codes: &[String], code: &str) -> Option<usize> {
    language_codes.iter().position(|candidate| candidate == code)
}

/// Takes a multi-language payload as-is. Scalars mixed into it occupy the
/// first slot only.
pub fn multi_language_translations(flat: FlatTranslations) -> Translations {
    flat.into_iter()
        .map(|(key, value)| {
            let slots = match value {
                FlatValue::Multi(slots) => slots,
                FlatValue::Single(text) => vec![text],
            };
            (key, slots)
        })
        .collect()
}

/// Expands a single-language payload into full-width slot sequences.
///
/// Each key's slot for `language` takes the new value; every other slot is
/// copied from `existing`, or left absent for new keys. An unknown
/// `language` yields an empty contribution.
pub fn single_to_multi_language(
    language: &str,
    language_codes: &[String],
    flat: &FlatTranslations,
    existing: &Translations,
) -> Translations {
    let Some(language_index) = index_for_language_code(language_codes, language) else {
        tracing::debug!(
            "Language '{}' is not registered, dropping {} translation(s)",
            language,
            flat.len()
        );
        return Translations::new();
    };

    let mut translations = Translations::with_capacity(flat.len());
    for (key, value) in flat {
        let text = match value {
            FlatValue::Single(text) => text.clone(),
            FlatValue::Multi(_) => {
                tracing::warn!(
                    "Skipping '{}': sequences are not valid in a single-language payload",
                    key
                );
                continue;
            },
        };
        let existing_slots = existing.get(key);
        let slots = (0..language_codes.len())
            .map(|index| {
                if index == language_index {
                    text.clone()
                } else {
                    existing_slots
                        .and_then(|slots| slots.get(index).cloned())
                        .flatten()
                }
            })
            .collect();
        translations.insert(key.clone(), slots);
    }
    translations
}

/// Upserts `contribution` into `state`, replacing whole slot sequences per
/// key. An empty contribution returns `state` itself.
pub fn merge_translations(state: &Arc<Translations>, contribution: Translations) -> Arc<Translations> {
    if contribution.is_empty() {
        return Arc::clone(state);
    }
    let mut merged = Translations::clone(state);
    merged.extend(contribution);
    Arc::new(merged)
}

/// Equality by serialized content with keys compared regardless of order,
/// rather than by identity.
pub fn structurally_equal<T: Serialize + ?Sized>(left: &T, right: &T) -> bool {
    match (serde_json::to_value(left), serde_json::to_value(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

/// Equality of two shared translation maps, short-circuiting on identity.
pub fn translations_equal(left: &Arc<Translations>, right: &Arc<Translations>) -> bool {
    Arc::ptr_eq(left, right) || structurally_equal(left.as_ref(), right.as_ref())
}

/// Whether anything observable changed between two snapshots.
pub fn state_did_change(previous: &LocaleState, next: &LocaleState) -> bool {
    previous.languages != next.languages
        || !translations_equal(&previous.translations, &next.translations)
        || !structurally_equal(&previous.options, &next.options)
}
