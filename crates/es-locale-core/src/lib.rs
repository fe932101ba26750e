#![doc = include_str!("../README.md")]

pub mod action;
pub mod element;
pub mod error;
pub mod markup;
pub mod memo;
pub mod options;
pub mod reducer;
pub mod selectors;
pub mod state;
pub mod templater;
pub mod translate;
pub mod utils;

pub use action::LocaleAction;
pub use element::{Element, Fragment, PlaceholderData, PlaceholderValue, Translated};
pub use error::{LocaleError, LocaleResult};
pub use options::{
    MissingTranslationHandler, Options, OptionsPatch, RenderToStaticMarkup, TransformOrder,
    TranslateOptions, TranslationTransform,
};
pub use reducer::reduce;
pub use selectors::Selectors;
pub use state::{Language, LanguageInput, LanguageTranslations, LocaleState, Translations};
pub use translate::{TranslateResult, TranslationKey, Translator};
