//! Error types for translation operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring, loading, or translating.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Invalid construction input (bad locale directory or file pattern)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The formatted locale file path does not exist
    #[error("Locale file {} does not exist", .path.display())]
    LocaleFileMissing { locale: String, path: PathBuf },

    /// The formatted locale file path exists but is not a regular file
    #[error("Locale path {} is not a file", .path.display())]
    NotAFile { locale: String, path: PathBuf },

    /// Every loader ran and none registered the locale
    #[error("No loader accepted {} for locale {locale}", .path.display())]
    NoLoaderMatched { locale: String, path: PathBuf },

    /// A loader accepted the file but could not turn it into a tree
    #[error("Failed to parse locale file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Parsed data is not a nested mapping at the top level
    #[error("Locale data must be a mapping at the top level, found {0}")]
    InvalidTree(&'static str),

    /// A dotted key does not resolve in the locale's tree
    #[error("Translation key not found: {key} for locale {locale}")]
    KeyNotFound { key: String, locale: String },

    /// A dotted key resolves to something other than a string
    #[error("The value of {key} must be a string, not {kind}")]
    NotAString { key: String, kind: &'static str },

    /// A `{` without a closing `}`
    #[error("Expected '}}' but got end of input, expression begins at column {column}")]
    UnterminatedPlaceholder { column: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error
    #[cfg(feature = "yaml")]
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TranslateError {
    /// Whether this error belongs to the locale loading stage.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            TranslateError::LocaleFileMissing { .. }
                | TranslateError::NotAFile { .. }
                | TranslateError::NoLoaderMatched { .. }
                | TranslateError::Parse { .. }
                | TranslateError::InvalidTree(_)
        )
    }
}
