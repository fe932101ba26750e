use crate::error::StoreError;
use es_locale_core::action::add_translation_for_language;
use es_locale_core::reducer::reduce;
use es_locale_core::utils::state_did_change;
use es_locale_core::{
    Element, Language, LocaleAction, LocaleState, PlaceholderData, Selectors, TranslateOptions,
    TranslateResult, TranslationKey,
};
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

type Listener = Arc<dyn Fn(&LocaleState) + Send + Sync>;

/// Handle returned by [`LocaleStore::subscribe`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ListenerId(u64);

/// The default-language content of a translation, as found in rendered
/// children.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DefaultTranslation {
    Text(String),
    /// Rendered to text through the configured static markup renderer.
    Element(Element),
}

impl From<&str> for DefaultTranslation {
    fn from(text: &str) -> Self {
        DefaultTranslation::Text(text.to_string())
    }
}

impl From<String> for DefaultTranslation {
    fn from(text: String) -> Self {
        DefaultTranslation::Text(text)
    }
}

impl From<Element> for DefaultTranslation {
    fn from(element: Element) -> Self {
        DefaultTranslation::Element(element)
    }
}

pub struct LocaleStore {
    state: RwLock<Arc<LocaleState>>,
    selectors: Selectors,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl Default for LocaleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleStore")
            .field("state", &self.state.read())
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}

impl LocaleStore {
    pub fn new() -> Self {
        Self::with_state(LocaleState::default())
    }

    pub fn with_state(state: LocaleState) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
            selectors: Selectors::new(),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    /// Rebuilds a store from the persisted layout produced by
    /// [`LocaleStore::to_json`]. Callables in the options are not part of
    /// that layout and come back as their defaults.
    pub fn from_json(value: Value) -> Result<Self, StoreError> {
        let state: LocaleState = serde_json::from_value(value)?;
        tracing::debug!(
            "Hydrated locale state with {} language(s) and {} key(s)",
            state.languages.len(),
            state.translations.len()
        );
        Ok(Self::with_state(state))
    }

    pub fn to_json(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self.state().as_ref())?)
    }

    /// The current snapshot. Later dispatches do not affect it.
    pub fn state(&self) -> Arc<LocaleState> {
        Arc::clone(&self.state.read())
    }

    pub fn with_state_ref<F, R>(&self, reader: F) -> R
    where
        F: FnOnce(&LocaleState) -> R,
    {
        reader(&self.state.read())
    }

    /// Applies `action` and returns whether the state changed.
    ///
    /// The reduced snapshot is always stored, so options that have no
    /// persisted form (renderers, transforms, callbacks) still take effect.
    /// Subscribers are notified after the new snapshot is in place, and only
    /// when the state changed structurally. On error nothing changes.
    pub fn dispatch(&self, action: &LocaleAction) -> Result<bool, StoreError> {
        let (next, changed) = {
            let mut state = self.state.write();
            let next = reduce(&state, action)?;
            let changed = state_did_change(&state, &next);
            let next = Arc::new(next);
            *state = Arc::clone(&next);
            (next, changed)
        };
        if !changed {
            tracing::debug!("{} left the locale state unchanged", action.kind());
            return Ok(false);
        }

        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&next);
        }
        Ok(true)
    }

    /// Dispatches each action in turn, stopping at the first error.
    pub fn dispatch_all<'a, I>(&self, actions: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = &'a LocaleAction>,
    {
        for action in actions {
            self.dispatch(action)?;
        }
        Ok(())
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&LocaleState) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn languages(&self) -> Vec<Language> {
        self.state.read().languages.clone()
    }

    pub fn active_language(&self) -> Option<Language> {
        self.state
            .read()
            .languages
            .iter()
            .find(|lang| lang.active)
            .cloned()
    }

    pub fn translate(&self, key: impl Into<TranslationKey>) -> TranslateResult {
        let state = self.state();
        self.selectors.translator(&state).translate(key)
    }

    pub fn translate_with(
        &self,
        key: impl Into<TranslationKey>,
        data: &PlaceholderData,
        overrides: &TranslateOptions,
    ) -> TranslateResult {
        let state = self.state();
        self.selectors
            .translator(&state)
            .translate_with(key, data, overrides)
    }

    pub fn translate_value(
        &self,
        key: &Value,
        data: &PlaceholderData,
        overrides: &TranslateOptions,
    ) -> Result<TranslateResult, StoreError> {
        let state = self.state();
        Ok(self
            .selectors
            .translator(&state)
            .translate_value(key, data, overrides)?)
    }

    /// Translates a single key into plain text.
    pub fn text(&self, key: &str) -> String {
        let state = self.state();
        self.selectors.translator(&state).text(key)
    }

    /// Registers `default` as the default language's translation for `key`
    /// and returns whether an action was dispatched.
    ///
    /// Nothing is dispatched when `ignore_translate_children` is set, when
    /// no default language is configured, when an element default cannot be
    /// rendered, or when the stored value is already identical.
    pub fn register_default_translation(
        &self,
        key: &str,
        default: impl Into<DefaultTranslation>,
    ) -> Result<bool, StoreError> {
        self.register_default_translation_with(key, default, &TranslateOptions::default())
    }

    pub fn register_default_translation_with(
        &self,
        key: &str,
        default: impl Into<DefaultTranslation>,
        overrides: &TranslateOptions,
    ) -> Result<bool, StoreError> {
        let state = self.state();
        let options = state.options.with_overrides(overrides);

        if options.ignore_translate_children {
            return Ok(false);
        }
        let Some(default_language) = options.default_language.as_deref() else {
            tracing::debug!("No default language, not registering a default for '{}'", key);
            return Ok(false);
        };

        let text = match default.into() {
            DefaultTranslation::Text(text) => text,
            DefaultTranslation::Element(element) => {
                match options.render_to_static_markup.render(&element) {
                    Some(text) => text,
                    None => {
                        tracing::warn!(
                            "Cannot register the default translation for '{}': \
                             no static markup renderer is configured",
                            key
                        );
                        return Ok(false);
                    },
                }
            },
        };

        let existing = self
            .selectors
            .translations_for_language(&state, default_language);
        if existing.get(key) == Some(&text) {
            return Ok(false);
        }

        let mut translation = Map::new();
        translation.insert(key.to_string(), Value::String(text));
        self.dispatch(&add_translation_for_language(
            Value::Object(translation),
            default_language,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use es_locale_core::action::{InitializePayload, initialize, set_active_language};

    fn store() -> LocaleStore {
        let store = LocaleStore::new();
        store
            .dispatch(&initialize(
                InitializePayload::builder()
                    .languages(vec!["en".into(), "fr".into()])
                    .build(),
            ))
            .unwrap();
        store
    }

    #[test]
    fn snapshots_are_immutable() {
        let store = store();
        let before = store.state();
        store.dispatch(&set_active_language("fr")).unwrap();

        assert!(before.languages[0].active);
        assert!(store.state().languages[1].active);
    }

    #[test]
    fn unsubscribe_unknown_listener() {
        let store = store();
        let id = store.subscribe(|_| {});
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn default_translation_conversions() {
        assert_eq!(
            DefaultTranslation::from("Hi"),
            DefaultTranslation::Text("Hi".to_string())
        );
        let element = Element::new(1_u8);
        assert_eq!(
            DefaultTranslation::from(element.clone()),
            DefaultTranslation::Element(element)
        );
    }
}
