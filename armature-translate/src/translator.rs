//! Translation engine
//!
//! Resolves dotted keys against lazily loaded locale trees and expands the
//! resulting message.

use crate::expand::expand_with;
use crate::{
    Args, Expansion, FilterRegistry, LoaderRegistry, LocaleTree, Result, TranslateError,
    TranslatorConfig, Value,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Main translation interface.
///
/// Owns its locale cache and its filter and loader registries. Clones share
/// all three. Locks are only held while a map is read or changed, never
/// while a loader or filter runs, so loaders and filters may call back into
/// the translator.
pub struct Translator {
    config: TranslatorConfig,
    locales: Arc<RwLock<HashMap<String, Arc<LocaleTree>>>>,
    filters: Arc<RwLock<FilterRegistry>>,
    loaders: Arc<RwLock<LoaderRegistry>>,
}

impl Translator {
    /// Create a translator with the built-in filters and loaders.
    ///
    /// Fails if the locale directory is missing or is not a directory.
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        Self::with_registries(
            config,
            FilterRegistry::with_builtins(),
            LoaderRegistry::with_builtins(),
        )
    }

    /// Create a translator with explicit registries.
    pub fn with_registries(
        config: TranslatorConfig,
        filters: FilterRegistry,
        loaders: LoaderRegistry,
    ) -> Result<Self> {
        config.validate()?;
        debug!(
            locale_dir = %config.locale_dir.display(),
            pattern = %config.file_pattern,
            default_locale = %config.default_locale,
            "Created translator"
        );

        Ok(Self {
            config,
            locales: Arc::new(RwLock::new(HashMap::new())),
            filters: Arc::new(RwLock::new(filters)),
            loaders: Arc::new(RwLock::new(loaders)),
        })
    }

    /// Create a translator configured from `ARMATURE_LOCALE_*` variables.
    pub fn from_env() -> Result<Self> {
        Self::new(TranslatorConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Get the default locale.
    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    // ========================================================================
    // Translation
    // ========================================================================

    /// Translate a key.
    ///
    /// `locale` defaults to the configured default locale. Warnings raised
    /// while expanding are logged and dropped; use
    /// [`Translator::translate_with_diagnostics`] to inspect them.
    pub fn translate(&self, key: &str, locale: Option<&str>, args: &Args) -> Result<String> {
        self.translate_with_diagnostics(key, locale, args)
            .map(|expansion| expansion.text)
    }

    /// Translate a key in the default locale.
    pub fn t(&self, key: &str, args: &Args) -> Result<String> {
        self.translate(key, None, args)
    }

    /// Translate a key, returning the expansion warnings alongside the text.
    pub fn translate_with_diagnostics(
        &self,
        key: &str,
        locale: Option<&str>,
        args: &Args,
    ) -> Result<Expansion> {
        let locale = locale.unwrap_or(&self.config.default_locale);
        let tree = self.load(locale)?;
        let message = tree.resolve(key, locale)?;

        if !message.contains('{') {
            return Ok(Expansion::plain(message));
        }

        expand_with(message, args, |name| self.filters.read().get(name))
    }

    // ========================================================================
    // Locale Cache
    // ========================================================================

    /// Load a locale from disk unless it is already cached.
    pub fn ensure_loaded(&self, locale: &str) -> Result<()> {
        self.load(locale).map(|_| ())
    }

    fn load(&self, locale: &str) -> Result<Arc<LocaleTree>> {
        if let Some(tree) = self.locales.read().get(locale) {
            return Ok(Arc::clone(tree));
        }

        let path = self.config.locale_path(locale);
        if !path.exists() {
            return Err(TranslateError::LocaleFileMissing {
                locale: locale.to_string(),
                path,
            });
        }
        if !path.is_file() {
            return Err(TranslateError::NotAFile {
                locale: locale.to_string(),
                path,
            });
        }

        self.run_loaders(&path, locale)?;

        self.locales
            .read()
            .get(locale)
            .cloned()
            .ok_or_else(|| TranslateError::NoLoaderMatched {
                locale: locale.to_string(),
                path,
            })
    }

    fn run_loaders(&self, path: &Path, locale: &str) -> Result<()> {
        let loaders = self.loaders.read().snapshot();

        for (name, loader) in &loaders {
            debug!(loader = %name, locale, path = %path.display(), "Offering locale file to loader");
            loader(path, locale, self)?;
        }

        Ok(())
    }

    /// Register a tree for a locale, replacing any cached one.
    ///
    /// Translations already in progress keep using the tree they started
    /// with.
    pub fn add_locale(&self, locale: impl Into<String>, tree: LocaleTree) {
        let locale = locale.into();
        debug!(locale = %locale, keys = tree.keys().len(), "Registered locale");
        self.locales.write().insert(locale, Arc::new(tree));
    }

    /// Drop a cached locale. Returns `true` if it was cached.
    pub fn remove_locale(&self, locale: &str) -> bool {
        self.locales.write().remove(locale).is_some()
    }

    /// Check if a locale is cached.
    pub fn locale_loaded(&self, locale: &str) -> bool {
        self.locales.read().contains_key(locale)
    }

    /// Cached locale identifiers, sorted.
    pub fn loaded_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.locales.read().keys().cloned().collect();
        locales.sort();
        locales
    }

    // ========================================================================
    // Registries
    // ========================================================================

    /// Register a filter, replacing any filter with the same name.
    pub fn add_filter<F>(&self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Value, Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(filter = %name, "Registered filter");
        self.filters.write().add(name, filter);
    }

    /// Remove a filter. Returns `true` if it was registered.
    pub fn remove_filter(&self, name: &str) -> bool {
        self.filters.write().remove(name)
    }

    /// Check if a filter is registered.
    pub fn filter_exists(&self, name: &str) -> bool {
        self.filters.read().exists(name)
    }

    /// Register a loader; see [`LoaderRegistry::add`] for ordering.
    pub fn add_loader<F>(&self, name: impl Into<String>, loader: F)
    where
        F: Fn(&Path, &str, &Translator) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(loader = %name, "Registered loader");
        self.loaders.write().add(name, loader);
    }

    /// Remove a loader. Returns `true` if it was registered.
    pub fn remove_loader(&self, name: &str) -> bool {
        self.loaders.write().remove(name)
    }

    /// Check if a loader is registered.
    pub fn loader_exists(&self, name: &str) -> bool {
        self.loaders.read().exists(name)
    }
}

impl Clone for Translator {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            locales: Arc::clone(&self.locales),
            filters: Arc::clone(&self.filters),
            loaders: Arc::clone(&self.loaders),
        }
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("config", &self.config)
            .field("locales", &self.loaded_locales())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_translator() -> (TempDir, Translator) {
        let dir = tempfile::tempdir().unwrap();
        let translator = Translator::new(TranslatorConfig::new(dir.path())).unwrap();

        translator.add_locale(
            "en",
            LocaleTree::new()
                .with("hello", "Hello!")
                .with("greeting", "Hello, {name}!")
                .with("cart.items", "{n} {n|pluralize:item,items}"),
        );
        translator.add_locale(
            "fr",
            LocaleTree::new()
                .with("hello", "Bonjour!")
                .with("greeting", "Bonjour, {name}!"),
        );

        (dir, translator)
    }

    #[test]
    fn test_simple_translation() {
        let (_dir, translator) = create_test_translator();

        assert_eq!(translator.t("hello", &Args::new()).unwrap(), "Hello!");
        assert_eq!(
            translator.translate("hello", Some("fr"), &Args::new()).unwrap(),
            "Bonjour!"
        );
    }

    #[test]
    fn test_translation_with_args() {
        let (_dir, translator) = create_test_translator();
        let args = Args::new().with("name", "Alice");

        assert_eq!(translator.t("greeting", &args).unwrap(), "Hello, Alice!");
        assert_eq!(
            translator.translate("greeting", Some("fr"), &args).unwrap(),
            "Bonjour, Alice!"
        );
    }

    #[test]
    fn test_plural_translation() {
        let (_dir, translator) = create_test_translator();

        let one = Args::new().with("n", 1);
        let many = Args::new().with("n", 5);
        assert_eq!(translator.t("cart.items", &one).unwrap(), "1 item");
        assert_eq!(translator.t("cart.items", &many).unwrap(), "5 items");
    }

    #[test]
    fn test_missing_key() {
        let (_dir, translator) = create_test_translator();

        assert!(matches!(
            translator.t("unknown.key", &Args::new()),
            Err(TranslateError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_non_string_key() {
        let (_dir, translator) = create_test_translator();

        assert!(matches!(
            translator.t("cart", &Args::new()),
            Err(TranslateError::NotAString { kind: "mapping", .. })
        ));
    }

    #[test]
    fn test_missing_locale_file() {
        let (_dir, translator) = create_test_translator();

        let err = translator
            .translate("hello", Some("de"), &Args::new())
            .unwrap_err();
        assert!(matches!(err, TranslateError::LocaleFileMissing { .. }));
        assert!(!translator.locale_loaded("de"));
    }

    #[test]
    fn test_diagnostics_returned() {
        let (_dir, translator) = create_test_translator();

        let expansion = translator
            .translate_with_diagnostics("greeting", None, &Args::new())
            .unwrap();
        assert_eq!(expansion.text, "Hello, !");
        assert_eq!(expansion.diagnostics.len(), 1);
    }

    #[test]
    fn test_locale_registry() {
        let (_dir, translator) = create_test_translator();

        assert_eq!(translator.loaded_locales(), vec!["en", "fr"]);
        assert!(translator.remove_locale("fr"));
        assert!(!translator.remove_locale("fr"));
        assert!(!translator.locale_loaded("fr"));
    }

    #[test]
    fn test_custom_filter() {
        let (_dir, translator) = create_test_translator();
        translator.add_locale("en", LocaleTree::new().with("shout", "{word|exclaim:3}"));

        translator.add_filter("exclaim", |value: &Value, arg: Option<&str>| {
            let times = arg.and_then(|a| a.parse().ok()).unwrap_or(1);
            Some(format!("{}{}", value, "!".repeat(times)))
        });
        assert!(translator.filter_exists("exclaim"));

        let args = Args::new().with("word", "hey");
        assert_eq!(translator.t("shout", &args).unwrap(), "hey!!!");

        assert!(translator.remove_filter("exclaim"));
        assert_eq!(translator.t("shout", &args).unwrap(), "hey");
    }

    #[test]
    fn test_clone_shares_state() {
        let (_dir, translator) = create_test_translator();
        let other = translator.clone();

        other.add_locale("es", LocaleTree::new().with("hello", "¡Hola!"));
        assert!(translator.locale_loaded("es"));
    }
}
