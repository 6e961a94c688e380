//! Translation Lookup and Template Expansion for Armature
//!
//! Resolves dotted keys such as `menu.file.open` against per-locale data
//! trees and expands `{placeholder}` expressions in the result:
//!
//! - **Lazy locale loading**: locale files are found through a
//!   `{locale}` file pattern and parsed on first use by pluggable loaders
//!   (YAML and JSON built in)
//! - **Placeholders**: `{name}`, `{name|filter}` and `{name|filter:argument}`,
//!   with case-insensitive argument names
//! - **Filters**: `pluralize`, `yesno`, `datetime`, `cut`, `join`, case
//!   transforms and more, plus your own
//! - **Diagnostics**: missing arguments and unknown filters are reported
//!   alongside the result instead of failing the translation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use armature_translate::{Args, Translator, TranslatorConfig};
//!
//! let translator = Translator::new(
//!     TranslatorConfig::new("locales/")
//!         .with_pattern("{locale}.yaml")
//!         .with_default_locale("en"),
//! )?;
//!
//! // locales/en.yaml:
//! //   inbox:
//! //     summary: "{user|title}, you have {n} {n|pluralize:message,messages}"
//! let args = Args::new().with("user", "ana").with("n", 2);
//! let msg = translator.t("inbox.summary", &args)?;
//! // "Ana, you have 2 messages"
//!
//! // Another locale
//! let msg = translator.translate("inbox.summary", Some("fr"), &args)?;
//! ```
//!
//! # Custom Filters
//!
//! ```rust,ignore
//! use armature_translate::Value;
//!
//! translator.add_filter("currency", |value: &Value, code: Option<&str>| {
//!     Some(format!("{} {}", value, code.unwrap_or("USD")))
//! });
//! ```

mod args;
mod config;
mod error;
pub mod expand;
pub mod filters;
mod loader;
mod translator;
mod tree;
mod value;

pub use args::Args;
pub use config::{LOCALE_TOKEN, TranslatorConfig};
pub use error::TranslateError;
pub use expand::{Diagnostic, Expansion, Placeholder, expand};
pub use filters::{FilterFn, FilterRegistry};
pub use loader::{LoaderFn, LoaderRegistry, json_loader, yaml_loader};
pub use translator::Translator;
pub use tree::LocaleTree;
pub use value::{Temporal, Value};

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Args, Diagnostic, Expansion, LocaleTree, Result, TranslateError, Translator,
        TranslatorConfig, Value,
    };
}
