#![doc = include_str!("../README.md")]

use es_locale_core::action::{
    InitializePayload, add_translation, add_translation_for_language, initialize,
};
use es_locale_core::options::validate_options;
use es_locale_core::{
    LanguageInput, LocaleAction, LocaleError, MissingTranslationHandler, OptionsPatch,
    RenderToStaticMarkup, TransformOrder,
};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

/// File name looked up in a manifest directory.
pub const CONFIG_FILE_NAME: &str = "locale.toml";

/// Multi-language asset loaded before the per-language files.
pub const MULTI_LANGUAGE_ASSET: &str = "translations.json";

#[derive(Debug, Error)]
pub enum LocaleConfigError {
    /// Configuration file not found.
    #[error("locale.toml configuration file not found")]
    NotFound,
    /// Failed to read the configuration file or a translation asset.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A translation asset is not valid JSON.
    #[error("Failed to parse translation asset '{}': {source}", .path.display())]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A configured language code is not a valid language identifier.
    #[error("Invalid language identifier '{name}' in locale.toml")]
    InvalidLanguageIdentifier {
        /// The invalid identifier.
        name: String,
        /// The parsing error produced by `unic-langid`.
        #[source]
        source: LanguageIdentifierError,
    },
    /// An option is set to a value the locale state cannot accept.
    #[error("Option '{option}' is invalid: {reason}")]
    InvalidOption { option: String, reason: String },
}

/// The configuration for `es-locale`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocaleConfig {
    /// Supported languages, in slot order. Each entry is a code or a
    /// `{ name, code }` table.
    pub languages: Vec<LanguageInput>,
    /// Defaults to the first language.
    #[serde(default)]
    pub default_language: Option<String>,
    /// Language active after initialization. Defaults to the default language.
    #[serde(default)]
    pub active_language: Option<String>,
    #[serde(default)]
    pub render_inner_html: Option<bool>,
    /// Renderers cannot be configured from a file, so only `false` is
    /// accepted.
    #[serde(default)]
    pub render_to_static_markup: bool,
    #[serde(default)]
    pub ignore_translate_children: Option<bool>,
    /// Missing-translation message template.
    ///
    /// ```toml
    /// missing_translation = "[${ languageCode }] ${ translationId }"
    /// ```
    #[serde(default)]
    pub missing_translation: Option<String>,
    #[serde(default)]
    pub transform_order: Option<TransformOrder>,
    /// Directory holding `translations.json` and `{code}.json` assets,
    /// relative to the manifest directory.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

impl LocaleConfig {
    /// Reads and validates the configuration from a path.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LocaleConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LocaleConfigError::NotFound);
        }

        let content = fs::read_to_string(path)?;
        let config: LocaleConfig = toml::from_str(&content)?;
        config.validate()?;

        tracing::info!(
            "Loaded {} with {} language(s) from {}",
            CONFIG_FILE_NAME,
            config.languages.len(),
            path.display()
        );
        Ok(config)
    }

    /// Reads the configuration from the manifest directory.
    pub fn read_from_manifest_dir() -> Result<Self, LocaleConfigError> {
        let manifest_dir =
            env::var("CARGO_MANIFEST_DIR").map_err(|_| LocaleConfigError::NotFound)?;
        Self::from_manifest_dir(Path::new(&manifest_dir))
    }

    /// Reads the configuration from `locale.toml` inside `manifest_dir`.
    pub fn from_manifest_dir(manifest_dir: &Path) -> Result<Self, LocaleConfigError> {
        Self::read_from_path(manifest_dir.join(CONFIG_FILE_NAME))
    }

    /// Returns the configured language codes in slot order.
    pub fn language_codes(&self) -> Vec<&str> {
        self.languages.iter().map(LanguageInput::code).collect()
    }

    /// Returns the configured languages as `LanguageIdentifier`s.
    pub fn language_identifiers(&self) -> Result<Vec<LanguageIdentifier>, LocaleConfigError> {
        self.languages
            .iter()
            .map(|language| parse_language(language.code()))
            .collect()
    }

    /// Checks language codes and options before any action is built.
    pub fn validate(&self) -> Result<(), LocaleConfigError> {
        if self.languages.is_empty() {
            return Err(invalid_option("languages", "at least one language is required"));
        }

        self.language_identifiers()?;

        let codes = self.language_codes();
        for (option, code) in [
            ("default_language", &self.default_language),
            ("active_language", &self.active_language),
        ] {
            if let Some(code) = code
                && !codes.contains(&code.as_str())
            {
                return Err(invalid_option(
                    option,
                    format!("'{}' is not one of the configured languages {:?}", code, codes),
                ));
            }
        }

        if self.render_to_static_markup {
            return Err(invalid_option(
                "render_to_static_markup",
                "a renderer cannot be configured from locale.toml, set it to false",
            ));
        }

        validate_options(&self.options_patch()).map_err(|err| match err {
            LocaleError::InvalidOption { option, reason } => invalid_option(option, reason),
            other => invalid_option("options", other.to_string()),
        })
    }

    /// The initialize options described by this configuration.
    pub fn options_patch(&self) -> OptionsPatch {
        OptionsPatch::builder()
            .maybe_default_language(self.default_language.clone())
            .maybe_render_inner_html(self.render_inner_html)
            .render_to_static_markup(RenderToStaticMarkup::Disabled)
            .maybe_on_missing_translation(
                self.missing_translation
                    .as_deref()
                    .map(MissingTranslationHandler::template),
            )
            .maybe_transform_order(self.transform_order)
            .maybe_ignore_translate_children(self.ignore_translate_children)
            .build()
    }

    /// The initialize action registering the configured languages and
    /// options.
    pub fn initialize_action(&self) -> LocaleAction {
        initialize(
            InitializePayload::builder()
                .languages(self.languages.clone())
                .options(self.options_patch())
                .maybe_active_language(self.active_language.clone())
                .build(),
        )
    }

    /// Returns the path to the assets directory from a base directory, if
    /// one is configured.
    pub fn assets_dir_from_base(&self, base_dir: &Path) -> Option<PathBuf> {
        self.assets_dir.as_ref().map(|assets_dir| base_dir.join(assets_dir))
    }

    /// Loads translation assets into actions: the multi-language
    /// `translations.json` first, then one `{code}.json` per configured
    /// language. Missing files are skipped.
    pub fn translation_actions(&self, base_dir: &Path) -> Result<Vec<LocaleAction>, LocaleConfigError> {
        let Some(assets_dir) = self.assets_dir_from_base(base_dir) else {
            return Ok(Vec::new());
        };

        let mut actions = Vec::new();

        let multi_path = assets_dir.join(MULTI_LANGUAGE_ASSET);
        if multi_path.is_file() {
            actions.push(add_translation(read_json(&multi_path)?));
        }

        for code in self.language_codes() {
            let path = assets_dir.join(format!("{code}.json"));
            if !path.is_file() {
                tracing::debug!("No translation asset for '{}' at {}", code, path.display());
                continue;
            }
            actions.push(add_translation_for_language(read_json(&path)?, code));
        }

        Ok(actions)
    }

    /// The initialize action followed by every translation asset action.
    pub fn actions(&self, base_dir: &Path) -> Result<Vec<LocaleAction>, LocaleConfigError> {
        let mut actions = vec![self.initialize_action()];
        actions.extend(self.translation_actions(base_dir)?);
        Ok(actions)
    }
}

fn parse_language(code: &str) -> Result<LanguageIdentifier, LocaleConfigError> {
    code.parse::<LanguageIdentifier>()
        .map_err(|source| LocaleConfigError::InvalidLanguageIdentifier {
            name: code.to_string(),
            source,
        })
}

fn read_json(path: &Path) -> Result<Value, LocaleConfigError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| LocaleConfigError::JsonError {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid_option(option: &str, reason: impl Into<String>) -> LocaleConfigError {
    LocaleConfigError::InvalidOption {
        option: option.to_string(),
        reason: reason.into(),
    }
}
