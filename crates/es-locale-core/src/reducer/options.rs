use crate::action::LocaleAction;
use crate::error::LocaleResult;
use crate::options::{Options, validate_options};

pub fn options_reducer(
    state: &Options,
    action: &LocaleAction,
    language_codes: &[String],
) -> LocaleResult<Options> {
    let LocaleAction::Initialize(payload) = action else {
        return Ok(state.clone());
    };

    let patch = payload.options.clone().unwrap_or_default();
    validate_options(&patch)?;

    let mut options = state.merge(&patch);
    options.default_language = patch
        .default_language
        .or_else(|| language_codes.first().cloned());
    Ok(options)
}
