//! Configuration surface for locale resolution and message lookup.
//!
//! Settings are read once at startup (typically deserialized from the
//! host application's configuration file) and treated as immutable
//! thereafter. Every field has a default, so an empty configuration
//! section yields a working setup.

use serde::Deserialize;
use std::time::Duration;

/// Top-level settings for the locale subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct I18nSettings {
    /// Whether the host should install the locale machinery at all.
    ///
    /// Carried as data; acting on it is the host's wiring decision.
    pub enabled: bool,
    /// Tag of the locale used when resolution produces no usable
    /// candidate. Never checked against `supported_locales`.
    pub default_locale: String,
    /// Tags accepted by the support gate. Empty means all locales are
    /// accepted.
    pub supported_locales: Vec<String>,
    /// Request header consulted first during resolution.
    pub header_name: String,
    /// Query/form parameter consulted when the header yields nothing.
    pub param_name: String,
    /// Settings forwarded to the message-catalog collaborator.
    pub catalog: CatalogSettings,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_locale: "zh-CN".to_owned(),
            supported_locales: Vec::new(),
            header_name: "Accept-Language".to_owned(),
            param_name: "lang".to_owned(),
            catalog: CatalogSettings::default(),
        }
    }
}

/// Settings for the message-catalog collaborator.
///
/// `base_names`, `encoding`, and the cache TTL describe how the host's
/// catalog locates and refreshes its resources; the in-memory
/// [`FluentCatalog`](crate::catalog::FluentCatalog) has no storage and
/// ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CatalogSettings {
    /// Resource base names, in lookup order.
    pub base_names: Vec<String>,
    /// Character encoding of the catalog resources.
    pub encoding: String,
    /// How long the catalog may cache loaded resources, in seconds.
    pub cache_ttl_secs: u64,
    /// Whether a catalog miss with no explicit default echoes the code
    /// instead of producing an empty string.
    pub use_code_as_default_message: bool,
}

impl CatalogSettings {
    /// The cache TTL as a [`Duration`].
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_names: vec!["i18n/errors".to_owned(), "i18n/messages".to_owned()],
            encoding: "UTF-8".to_owned(),
            cache_ttl_secs: 1800,
            use_code_as_default_message: true,
        }
    }
}
