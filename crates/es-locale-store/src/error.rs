use es_locale_core::LocaleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The reducer or the translate function rejected the input.
    #[error(transparent)]
    Locale(#[from] LocaleError),
    /// The persisted state could not be serialized or deserialized.
    #[error("Failed to hydrate locale state: {0}")]
    Hydration(#[from] serde_json::Error),
}
