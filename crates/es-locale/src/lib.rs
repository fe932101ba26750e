#![doc = include_str!("../README.md")]

pub use es_locale_core::{
    Element, Fragment, Language, LanguageInput, LanguageTranslations, LocaleAction, LocaleError,
    LocaleResult, LocaleState, MissingTranslationHandler, Options, OptionsPatch, PlaceholderData,
    PlaceholderValue, RenderToStaticMarkup, Selectors, TransformOrder, TranslateOptions,
    TranslateResult, Translated, TranslationKey, TranslationTransform, Translations, Translator,
    action, placeholders, reduce, reducer, selectors, templater, utils,
};

#[cfg(feature = "store")]
pub use es_locale_store::{DefaultTranslation, ListenerId, LocaleStore, StoreError};

#[cfg(feature = "toml")]
pub use es_locale_toml::{LocaleConfig, LocaleConfigError};

#[doc(hidden)]
pub use es_locale_core as __core;

#[doc(hidden)]
pub use serde_json;

/// Builds a store from `locale.toml` in `manifest_dir` and loads the
/// translation assets it configures.
#[cfg(all(feature = "store", feature = "toml"))]
pub fn store_from_manifest_dir(
    manifest_dir: &std::path::Path,
) -> Result<LocaleStore, LocaleSetupError> {
    let config = LocaleConfig::from_manifest_dir(manifest_dir)?;
    let store = LocaleStore::new();
    store.dispatch_all(&config.actions(manifest_dir)?)?;
    Ok(store)
}

/// Failure while building a store from configuration.
#[cfg(all(feature = "store", feature = "toml"))]
#[derive(Debug, thiserror::Error)]
pub enum LocaleSetupError {
    #[error(transparent)]
    Config(#[from] LocaleConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
