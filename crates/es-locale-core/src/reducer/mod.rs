//! The root reducer and its three sub-reducers.
//!
//! `languages` runs first; its output provides the language codes the
//! `translations` and `options` reducers need to align slots, including on
//! the initialize action that registers the languages.

pub mod languages;
pub mod options;
pub mod translations;

pub use languages::languages_reducer;
pub use options::options_reducer;
pub use translations::translations_reducer;

use crate::action::LocaleAction;
use crate::error::LocaleResult;
use crate::state::LocaleState;

/// Computes the next state. On error the input state is left untouched and
/// no partial update is produced.
pub fn reduce(state: &LocaleState, action: &LocaleAction) -> LocaleResult<LocaleState> {
    tracing::debug!("Reducing {}", action.kind());

    let languages = languages_reducer(&state.languages, action);
    let language_codes: Vec<String> = languages.iter().map(|lang| lang.code.clone()).collect();
    let translations =
        translations_reducer(&state.translations, action, &language_codes, &state.options);
    let options = options_reducer(&state.options, action, &language_codes)?;

    Ok(LocaleState {
        languages,
        translations,
        options,
    })
}

/// Folds a sequence of actions over `state`, stopping at the first error.
pub fn reduce_all<'a, I>(state: &LocaleState, actions: I) -> LocaleResult<LocaleState>
where
    I: IntoIterator<Item = &'a LocaleAction>,
{
    actions
        .into_iter()
        .try_fold(state.clone(), |state, action| reduce(&state, action))
}
