use thiserror::Error;

/// Errors surfaced synchronously by reducers and the translate function.
///
/// Missing translations and unknown language codes are not errors; they
/// degrade to documented default behavior instead.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LocaleError {
    /// `translate` was invoked with a key that is neither a string nor a
    /// sequence of strings.
    #[error("Invalid key passed to translate: expected a string or an array of strings, found {found}")]
    InvalidKey {
        /// Short description of the rejected value.
        found: String,
    },

    /// An initialize option failed validation.
    #[error("Initialize option '{option}' is invalid: {reason}")]
    InvalidOption {
        /// Name of the offending option, as it appears in the persisted layout.
        option: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl LocaleError {
    pub(crate) fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        LocaleError::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

pub type LocaleResult<T> = Result<T, LocaleError>;
