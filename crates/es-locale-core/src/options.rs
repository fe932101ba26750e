//! Persisted options, the options patch carried by initialize actions and
//! per-call translate overrides.

use crate::element::{Element, Translated};
use crate::error::{LocaleError, LocaleResult};
use crate::templater;
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_MISSING_TRANSLATION_TEMPLATE: &str =
    "Missing translationId: ${ translationId } for language: ${ languageCode }";

/// Placeholders a missing-translation message may reference.
pub const MISSING_TRANSLATION_PLACEHOLDERS: [&str; 3] =
    ["translationId", "languageCode", "defaultTranslation"];

/// Context handed to the missing-translation handler.
#[derive(Clone, Copy, Debug)]
pub struct MissingTranslation<'a> {
    pub translation_id: &'a str,
    /// `None` when there is neither an active language nor an override.
    pub language_code: Option<&'a str>,
    /// The default language's localized value, or a notice when the default
    /// language lacks the key too.
    pub default_translation: &'a Translated,
}

type MissingTranslationFn = dyn Fn(&MissingTranslation<'_>) -> String + Send + Sync;

/// Produces the text used in place of a missing translation. The returned
/// text is templated with `translationId`, `languageCode` and
/// `defaultTranslation` afterwards.
#[derive(Clone)]
pub enum MissingTranslationHandler {
    Template(String),
    Callback(Arc<MissingTranslationFn>),
}

impl MissingTranslationHandler {
    pub fn template(template: impl Into<String>) -> Self {
        MissingTranslationHandler::Template(template.into())
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&MissingTranslation<'_>) -> String + Send + Sync + 'static,
    {
        MissingTranslationHandler::Callback(Arc::new(f))
    }

    pub fn resolve(&self, missing: &MissingTranslation<'_>) -> String {
        match self {
            MissingTranslationHandler::Template(template) => template.clone(),
            MissingTranslationHandler::Callback(f) => f(missing),
        }
    }

    pub fn as_template(&self) -> Option<&str> {
        match self {
            MissingTranslationHandler::Template(template) => Some(template),
            MissingTranslationHandler::Callback(_) => None,
        }
    }
}

impl Default for MissingTranslationHandler {
    fn default() -> Self {
        MissingTranslationHandler::Template(DEFAULT_MISSING_TRANSLATION_TEMPLATE.to_string())
    }
}

impl fmt::Debug for MissingTranslationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingTranslationHandler::Template(template) => {
                f.debug_tuple("Template").field(template).finish()
            },
            MissingTranslationHandler::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

type RenderFn = dyn Fn(&Element) -> String + Send + Sync;

/// Renders an element to static text when default translations are
/// registered from rendered children. `Disabled` turns the feature off.
#[derive(Clone, Default)]
pub enum RenderToStaticMarkup {
    #[default]
    Disabled,
    Renderer(Arc<RenderFn>),
}

impl RenderToStaticMarkup {
    pub fn renderer<F>(f: F) -> Self
    where
        F: Fn(&Element) -> String + Send + Sync + 'static,
    {
        RenderToStaticMarkup::Renderer(Arc::new(f))
    }

    pub fn render(&self, element: &Element) -> Option<String> {
        match self {
            RenderToStaticMarkup::Disabled => None,
            RenderToStaticMarkup::Renderer(f) => Some(f(element)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, RenderToStaticMarkup::Renderer(_))
    }
}

impl fmt::Debug for RenderToStaticMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderToStaticMarkup::Disabled => f.write_str("Disabled"),
            RenderToStaticMarkup::Renderer(_) => f.write_str("Renderer(..)"),
        }
    }
}

type TransformFn = dyn Fn(&Value, &[String]) -> Value + Send + Sync;

/// Reshapes an incoming add-translation payload into a multi-language
/// payload. Receives the payload and the current language codes.
#[derive(Clone)]
pub struct TranslationTransform(Arc<TransformFn>);

impl TranslationTransform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[String]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, payload: &Value, language_codes: &[String]) -> Value {
        (self.0)(payload, language_codes)
    }
}

impl fmt::Debug for TranslationTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TranslationTransform(..)")
    }
}

/// Whether a translation transform sees the raw nested payload or the
/// flattened dot-path payload.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TransformOrder {
    #[default]
    BeforeFlatten,
    AfterFlatten,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(from = "PersistedOptions", into = "PersistedOptions")]
pub struct Options {
    pub default_language: Option<String>,
    /// Return markup-looking translations as raw markup instead of text.
    pub render_inner_html: bool,
    pub render_to_static_markup: RenderToStaticMarkup,
    pub on_missing_translation: MissingTranslationHandler,
    pub translation_transform: Option<TranslationTransform>,
    pub transform_order: TransformOrder,
    /// Do not register rendered children as default-language translations.
    pub ignore_translate_children: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_language: None,
            render_inner_html: false,
            render_to_static_markup: RenderToStaticMarkup::Disabled,
            on_missing_translation: MissingTranslationHandler::default(),
            translation_transform: None,
            transform_order: TransformOrder::BeforeFlatten,
            ignore_translate_children: false,
        }
    }
}

impl Options {
    /// Shallow merge: every option set in `patch` replaces the current one.
    pub fn merge(&self, patch: &OptionsPatch) -> Options {
        Options {
            default_language: patch
                .default_language
                .clone()
                .or_else(|| self.default_language.clone()),
            render_inner_html: patch.render_inner_html.unwrap_or(self.render_inner_html),
            render_to_static_markup: patch
                .render_to_static_markup
                .clone()
                .unwrap_or_else(|| self.render_to_static_markup.clone()),
            on_missing_translation: patch
                .on_missing_translation
                .clone()
                .unwrap_or_else(|| self.on_missing_translation.clone()),
            translation_transform: patch
                .translation_transform
                .clone()
                .or_else(|| self.translation_transform.clone()),
            transform_order: patch.transform_order.unwrap_or(self.transform_order),
            ignore_translate_children: patch
                .ignore_translate_children
                .unwrap_or(self.ignore_translate_children),
        }
    }

    /// Applies per-call overrides; the call-level value wins.
    pub fn with_overrides(&self, overrides: &TranslateOptions) -> Options {
        let mut merged = self.clone();
        if let Some(render_inner_html) = overrides.render_inner_html {
            merged.render_inner_html = render_inner_html;
        }
        if let Some(handler) = &overrides.on_missing_translation {
            merged.on_missing_translation = handler.clone();
        }
        if let Some(ignore) = overrides.ignore_translate_children {
            merged.ignore_translate_children = ignore;
        }
        merged
    }
}

/// Options supplied with an initialize action. Unset fields keep their
/// current value.
#[derive(Builder, Clone, Debug, Default)]
pub struct OptionsPatch {
    #[builder(into)]
    pub default_language: Option<String>,
    pub render_inner_html: Option<bool>,
    pub render_to_static_markup: Option<RenderToStaticMarkup>,
    pub on_missing_translation: Option<MissingTranslationHandler>,
    pub translation_transform: Option<TranslationTransform>,
    pub transform_order: Option<TransformOrder>,
    pub ignore_translate_children: Option<bool>,
}

impl OptionsPatch {
    /// Decodes options from a dynamic payload using the persisted field names.
    ///
    /// Callables cannot travel as data, so `renderToStaticMarkup` only
    /// accepts `false` and `onMissingTranslation` only accepts a template.
    pub fn from_json(value: &Value) -> LocaleResult<OptionsPatch> {
        let Value::Object(map) = value else {
            return Err(LocaleError::invalid_option(
                "options",
                format!("expected an object, found {}", describe(value)),
            ));
        };

        let mut patch = OptionsPatch::default();
        for (key, value) in map {
            match key.as_str() {
                "defaultLanguage" => {
                    patch.default_language = Some(expect_string("defaultLanguage", value)?);
                },
                "renderInnerHtml" => {
                    patch.render_inner_html = Some(expect_bool("renderInnerHtml", value)?);
                },
                "ignoreTranslateChildren" => {
                    patch.ignore_translate_children =
                        Some(expect_bool("ignoreTranslateChildren", value)?);
                },
                "renderToStaticMarkup" => match value {
                    Value::Bool(false) => {
                        patch.render_to_static_markup = Some(RenderToStaticMarkup::Disabled);
                    },
                    other => {
                        return Err(LocaleError::invalid_option(
                            "renderToStaticMarkup",
                            format!("must be false or a renderer function, found {}", describe(other)),
                        ));
                    },
                },
                "onMissingTranslation" | "missingTranslation" => {
                    let template = value.as_str().ok_or_else(|| {
                        LocaleError::invalid_option(
                            "onMissingTranslation",
                            format!("must be a function or a template, found {}", describe(value)),
                        )
                    })?;
                    patch.on_missing_translation =
                        Some(MissingTranslationHandler::template(template));
                },
                "transformOrder" => {
                    let raw = expect_string("transformOrder", value)?;
                    let order = raw.parse::<TransformOrder>().map_err(|_| {
                        LocaleError::invalid_option(
                            "transformOrder",
                            format!("unknown transform order '{}'", raw),
                        )
                    })?;
                    patch.transform_order = Some(order);
                },
                other => tracing::debug!("Ignoring unrecognized initialize option '{}'", other),
            }
        }

        validate_options(&patch)?;
        Ok(patch)
    }
}

/// Validates the recognized options of an initialize patch.
pub fn validate_options(patch: &OptionsPatch) -> LocaleResult<()> {
    if let Some(default_language) = &patch.default_language
        && default_language.trim().is_empty()
    {
        return Err(LocaleError::invalid_option(
            "defaultLanguage",
            "must be a non-empty language code",
        ));
    }

    if let Some(template) = patch
        .on_missing_translation
        .as_ref()
        .and_then(MissingTranslationHandler::as_template)
    {
        validate_missing_translation_template(template)?;
    }

    Ok(())
}

fn validate_missing_translation_template(template: &str) -> LocaleResult<()> {
    if templater::has_unterminated_placeholder(template) {
        return Err(LocaleError::invalid_option(
            "onMissingTranslation",
            format!("template '{}' contains an unterminated placeholder", template),
        ));
    }

    if let Some(unknown) = templater::placeholder_names(template)
        .find(|name| !MISSING_TRANSLATION_PLACEHOLDERS.contains(name))
    {
        return Err(LocaleError::invalid_option(
            "onMissingTranslation",
            format!(
                "template references unknown placeholder '{}', expected one of {:?}",
                unknown, MISSING_TRANSLATION_PLACEHOLDERS
            ),
        ));
    }

    Ok(())
}

fn expect_string(option: &'static str, value: &Value) -> LocaleResult<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        LocaleError::invalid_option(option, format!("expected a string, found {}", describe(value)))
    })
}

fn expect_bool(option: &'static str, value: &Value) -> LocaleResult<bool> {
    value.as_bool().ok_or_else(|| {
        LocaleError::invalid_option(option, format!("expected a boolean, found {}", describe(value)))
    })
}

pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Per-call overrides for `translate`.
#[derive(Builder, Clone, Debug, Default)]
pub struct TranslateOptions {
    /// Translate into this language instead of the active one.
    #[builder(into)]
    pub language: Option<String>,
    pub render_inner_html: Option<bool>,
    pub on_missing_translation: Option<MissingTranslationHandler>,
    pub ignore_translate_children: Option<bool>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_language: Option<String>,
    #[serde(default)]
    render_inner_html: bool,
    #[serde(default)]
    ignore_translate_children: bool,
    #[serde(default)]
    transform_order: TransformOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    missing_translation: Option<String>,
}

impl From<Options> for PersistedOptions {
    fn from(options: Options) -> Self {
        Self {
            default_language: options.default_language,
            render_inner_html: options.render_inner_html,
            ignore_translate_children: options.ignore_translate_children,
            transform_order: options.transform_order,
            missing_translation: options
                .on_missing_translation
                .as_template()
                .map(str::to_string),
        }
    }
}

impl From<PersistedOptions> for Options {
    fn from(persisted: PersistedOptions) -> Self {
        Options {
            default_language: persisted.default_language,
            render_inner_html: persisted.render_inner_html,
            ignore_translate_children: persisted.ignore_translate_children,
            transform_order: persisted.transform_order,
            on_missing_translation: persisted
                .missing_translation
                .map(MissingTranslationHandler::Template)
                .unwrap_or_default(),
            ..Options::default()
        }
    }
}
