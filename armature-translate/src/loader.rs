//! Locale file loaders
//!
//! Every registered loader is offered each locale file, in registration
//! order. A loader that does not recognise the file returns `Ok(())`
//! without doing anything; one that does parses it and registers the tree
//! through [`Translator::add_locale`].

use crate::{LocaleTree, Result, TranslateError, Translator};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Signature shared by every loader.
pub type LoaderFn = Arc<dyn Fn(&Path, &str, &Translator) -> Result<()> + Send + Sync>;

/// Ordered collection of named loaders.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: Vec<(String, LoaderFn)>,
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("loaders", &self.names())
            .finish()
    }
}

impl LoaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the YAML and JSON loaders, in that order.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.add("yaml", yaml_loader);
        registry.add("json", json_loader);
        registry
    }

    /// Register a loader.
    ///
    /// A new name goes to the end of the trial order; an existing name keeps
    /// its position and has its function replaced.
    pub fn add<F>(&mut self, name: impl Into<String>, loader: F)
    where
        F: Fn(&Path, &str, &Translator) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let loader: LoaderFn = Arc::new(loader);

        match self.loaders.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = loader,
            None => self.loaders.push((name, loader)),
        }
    }

    /// Remove a loader. Returns `true` if it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.loaders.len();
        self.loaders.retain(|(existing, _)| existing != name);
        self.loaders.len() != before
    }

    /// Check if a loader is registered.
    pub fn exists(&self, name: &str) -> bool {
        self.loaders.iter().any(|(existing, _)| existing == name)
    }

    /// Loader names in trial order.
    pub fn names(&self) -> Vec<&str> {
        self.loaders.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Copy of the loaders in trial order, for running without holding a
    /// borrow of the registry.
    pub fn snapshot(&self) -> Vec<(String, LoaderFn)> {
        self.loaders.clone()
    }

    /// Number of registered loaders.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Check if no loaders are registered.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

fn parse_error(path: &Path, err: TranslateError) -> TranslateError {
    TranslateError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Loads `.yaml` and `.yml` files.
#[cfg(feature = "yaml")]
pub fn yaml_loader(path: &Path, locale: &str, translator: &Translator) -> Result<()> {
    if !has_extension(path, &["yaml", "yml"]) {
        return Ok(());
    }

    let content = fs::read_to_string(path)?;
    let tree = LocaleTree::from_yaml_str(&content).map_err(|e| parse_error(path, e))?;
    debug!(locale, path = %path.display(), "Parsed YAML locale file");
    translator.add_locale(locale, tree);
    Ok(())
}

/// Loads `.yaml` and `.yml` files (no-op without the `yaml` feature).
#[cfg(not(feature = "yaml"))]
pub fn yaml_loader(path: &Path, locale: &str, _translator: &Translator) -> Result<()> {
    if has_extension(path, &["yaml", "yml"]) {
        debug!(locale, path = %path.display(), "YAML support not compiled in, skipping");
    }
    Ok(())
}

/// Loads `.json` files.
pub fn json_loader(path: &Path, locale: &str, translator: &Translator) -> Result<()> {
    if !has_extension(path, &["json"]) {
        return Ok(());
    }

    let content = fs::read_to_string(path)?;
    let tree = LocaleTree::from_json_str(&content).map_err(|e| parse_error(path, e))?;
    debug!(locale, path = %path.display(), "Parsed JSON locale file");
    translator.add_locale(locale, tree);
    Ok(())
}
