//! Translation catalog.
//!
//! Locale bundles are JSON documents; nested objects are flattened to dotted
//! keys (`BASIC.FORM.NAME`) and arrays to indexed keys (`BASIC.FORM.TYPES.1`).
//! The process-wide catalog is set once at startup and is read-only afterwards.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde_json::Value;

use crate::ports::Translator;

const BUNDLED: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en.json")),
    ("nl", include_str!("../locales/nl.json")),
];

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid bundle for locale {locale}: {source}")]
    InvalidBundle {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("bundle for locale {0} must be a JSON object")]
    NotAnObject(String),
    #[error("no bundle loaded for locale {0}")]
    UnknownLocale(String),
    #[error("cannot read locale directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("translation catalog already initialized")]
    AlreadyInitialized,
}

/// Flat key → label maps per locale, with an active and a fallback locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: String,
    fallback_locale: String,
    bundles: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// Empty catalog; every lookup returns the key.
    #[must_use]
    pub fn new(locale: impl Into<String>, fallback_locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            fallback_locale: fallback_locale.into(),
            bundles: HashMap::new(),
        }
    }

    /// Catalog holding the bundles shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled file is not a valid JSON object.
    pub fn bundled(
        locale: impl Into<String>,
        fallback_locale: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(locale, fallback_locale);
        for (locale, raw) in BUNDLED {
            catalog.add_bundle_json(locale, raw)?;
        }
        Ok(catalog)
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    /// Locales that have at least one bundle, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<_> = self.bundles.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Merge a JSON bundle into `locale`. Later keys override earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON object.
    pub fn add_bundle_json(&mut self, locale: &str, raw: &str) -> Result<(), CatalogError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|source| CatalogError::InvalidBundle {
                locale: locale.to_string(),
                source,
            })?;
        if !value.is_object() {
            return Err(CatalogError::NotAnObject(locale.to_string()));
        }
        let entries = self.bundles.entry(locale.to_string()).or_default();
        flatten(String::new(), value, entries);
        Ok(())
    }

    /// Merge every `<locale>.json` file found in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or one of its bundles cannot be read.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, CatalogError> {
        let io_err = |source| CatalogError::Io {
            path: dir.display().to_string(),
            source,
        };
        let mut loaded = 0;
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let raw = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;
            self.add_bundle_json(locale, &raw)?;
            tracing::debug!(locale, path = %path.display(), "loaded locale bundle");
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Check that both the active and the fallback locale have a bundle.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownLocale`] naming the first missing one.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for locale in [&self.locale, &self.fallback_locale] {
            if !self.bundles.contains_key(locale) {
                return Err(CatalogError::UnknownLocale(locale.clone()));
            }
        }
        Ok(())
    }

    /// Label for `key` in the active locale, then the fallback locale, then
    /// the key itself.
    #[must_use]
    pub fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        [&self.locale, &self.fallback_locale]
            .into_iter()
            .filter_map(|locale| self.bundles.get(locale))
            .find_map(|bundle| bundle.get(key))
            .map_or(key, String::as_str)
    }
}

impl Translator for Catalog {
    fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        Catalog::lookup(self, key)
    }
}

fn flatten(prefix: String, value: Value, out: &mut HashMap<String, String>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(join(&key), value, out);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.into_iter().enumerate() {
                flatten(join(&index.to_string()), value, out);
            }
        }
        Value::String(label) => {
            out.insert(prefix, label);
        }
        Value::Null => {}
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Install the process-wide catalog.
///
/// # Errors
///
/// Returns [`CatalogError::AlreadyInitialized`] on a second call, or after the
/// catalog was already read through [`global`].
pub fn init(catalog: Catalog) -> Result<(), CatalogError> {
    CATALOG
        .set(catalog)
        .map_err(|_| CatalogError::AlreadyInitialized)
}

/// The process-wide catalog. Falls back to the bundled English catalog when
/// [`init`] was never called.
pub fn global() -> &'static Catalog {
    CATALOG.get_or_init(|| {
        Catalog::bundled(DEFAULT_LOCALE, DEFAULT_LOCALE).unwrap_or_else(|err| {
            tracing::error!(error = %err, "bundled locales are invalid, labels will show keys");
            Catalog::new(DEFAULT_LOCALE, DEFAULT_LOCALE)
        })
    })
}
