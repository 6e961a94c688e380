//! Configuration for the translator

use crate::{Result, TranslateError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Token replaced by the locale identifier in [`TranslatorConfig::file_pattern`].
pub const LOCALE_TOKEN: &str = "{locale}";

/// Where locale files live and which locale is used by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Directory containing locale files
    pub locale_dir: PathBuf,

    /// File name pattern relative to `locale_dir` (default: "{locale}.json")
    pub file_pattern: String,

    /// Locale used when a call does not name one (default: "en")
    pub default_locale: String,
}

impl TranslatorConfig {
    /// Create a configuration for a locale directory.
    pub fn new(locale_dir: impl Into<PathBuf>) -> Self {
        Self {
            locale_dir: locale_dir.into(),
            file_pattern: format!("{}.json", LOCALE_TOKEN),
            default_locale: "en".to_string(),
        }
    }

    /// Set the file name pattern, e.g. `"{locale}/messages.yaml"`.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    /// Set the default locale.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Build a configuration from environment variables.
    ///
    /// - `ARMATURE_LOCALE_DIR` (default: `locales`)
    /// - `ARMATURE_LOCALE_PATTERN` (default: `{locale}.json`)
    /// - `ARMATURE_DEFAULT_LOCALE` (default: `en`)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("ARMATURE_LOCALE_DIR") {
            config.locale_dir = PathBuf::from(dir);
        }
        if let Ok(pattern) = env::var("ARMATURE_LOCALE_PATTERN") {
            config.file_pattern = pattern;
        }
        if let Ok(locale) = env::var("ARMATURE_DEFAULT_LOCALE") {
            config.default_locale = locale;
        }

        config
    }

    /// Check the directory and pattern.
    pub fn validate(&self) -> Result<()> {
        if !self.locale_dir.exists() {
            return Err(TranslateError::Config(format!(
                "Locales folder does not exist: {}",
                self.locale_dir.display()
            )));
        }
        if !self.locale_dir.is_dir() {
            return Err(TranslateError::Config(format!(
                "{} must be a folder",
                self.locale_dir.display()
            )));
        }
        if !self.file_pattern.contains(LOCALE_TOKEN) {
            return Err(TranslateError::Config(format!(
                "File pattern {:?} has no {} token",
                self.file_pattern, LOCALE_TOKEN
            )));
        }
        Ok(())
    }

    /// Path of a locale's file.
    pub fn locale_path(&self, locale: &str) -> PathBuf {
        self.locale_dir
            .join(self.file_pattern.replace(LOCALE_TOKEN, locale))
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new("locales")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = TranslatorConfig::new("i18n")
            .with_pattern("{locale}/strings.yaml")
            .with_default_locale("fr-CA");

        assert_eq!(config.locale_dir, PathBuf::from("i18n"));
        assert_eq!(config.default_locale, "fr-CA");
        assert_eq!(
            config.locale_path("de"),
            PathBuf::from("i18n").join("de/strings.yaml")
        );
    }

    #[test]
    fn test_default_config() {
        let config = TranslatorConfig::default();

        assert_eq!(config.locale_dir, PathBuf::from("locales"));
        assert_eq!(config.file_pattern, "{locale}.json");
        assert_eq!(config.default_locale, "en");
    }

    #[test]
    fn test_validate_missing_dir() {
        let config = TranslatorConfig::new("/definitely/not/a/locale/dir");
        assert!(matches!(config.validate(), Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_validate_pattern_token() {
        let dir = tempfile::tempdir().unwrap();
        let config = TranslatorConfig::new(dir.path()).with_pattern("strings.json");
        assert!(matches!(config.validate(), Err(TranslateError::Config(_))));

        let config = config.with_pattern("{locale}.yml");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_not_a_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = TranslatorConfig::new(file.path());
        assert!(matches!(config.validate(), Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TranslatorConfig =
            serde_json::from_str(r#"{"locale_dir": "strings", "default_locale": "pt"}"#).unwrap();
        assert_eq!(config.locale_dir, PathBuf::from("strings"));
        assert_eq!(config.file_pattern, "{locale}.json");
        assert_eq!(config.default_locale, "pt");
    }
}
