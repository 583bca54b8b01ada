//! Shared test doubles for the locale subsystem.
//!
//! Provides map-backed transport stubs, a small Fluent fixture catalog,
//! and a catalog double that fails every lookup.

#![allow(dead_code, reason = "each test crate uses a subset of these helpers")]

use polyglot::catalog::{CatalogError, FluentCatalog, MessageCatalog};
use polyglot::locale::LocaleTag;
use polyglot::service::MessageService;
use polyglot::settings::I18nSettings;
use polyglot::transport::{AttributeValue, RequestAttributes, RequestView, ResponseView};
use std::collections::HashMap;
use std::sync::Arc;

/// Parse a fixture locale tag, panicking on typos in the test itself.
pub fn tag(raw: &str) -> LocaleTag {
    raw.parse()
        .unwrap_or_else(|_| panic!("fixture locale `{raw}` must parse"))
}

/// Map-backed request stub. Header names are matched case-insensitively,
/// as HTTP requires.
#[derive(Debug, Default)]
pub struct StubRequest {
    headers: HashMap<String, String>,
    params: HashMap<String, String>,
    pub attributes: HashMap<&'static str, AttributeValue>,
}

impl StubRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_owned());
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_owned(), value.to_owned());
        self
    }
}

impl RequestView for StubRequest {
    fn header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_lowercase()).cloned()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.params.get(name).cloned()
    }
}

impl RequestAttributes for StubRequest {
    fn set_attribute(&mut self, key: &'static str, value: AttributeValue) {
        self.attributes.insert(key, value);
    }

    fn remove_attribute(&mut self, key: &'static str) {
        self.attributes.remove(key);
    }
}

/// Response stub recording every header set on it.
#[derive(Debug, Default)]
pub struct StubResponse {
    pub headers: Vec<(String, String)>,
}

impl StubResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(set_name, _)| set_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl ResponseView for StubResponse {
    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_owned(), value.to_owned()));
    }
}

/// Fixture catalog with English, Chinese, and Spanish resources.
pub fn demo_catalog() -> FluentCatalog {
    FluentCatalog::builder()
        .resource(
            "en",
            "greeting = Hello { $arg0 }\nfarewell = Goodbye\nuser-absent = No such user\n",
        )
        .resource("zh-CN", "greeting = 你好 { $arg0 }\nfarewell = 再见\n")
        .resource("es-ES", "farewell = Adiós\n")
        .build()
        .unwrap_or_else(|err| panic!("fixture catalog must build: {err}"))
}

/// A service over the fixture catalog and the given settings.
pub fn demo_service(settings: &I18nSettings) -> MessageService {
    MessageService::new(Arc::new(demo_catalog()), settings)
}

/// Catalog double whose lookups always fail with a non-missing error.
#[derive(Debug, Default)]
pub struct UnavailableCatalog;

impl MessageCatalog for UnavailableCatalog {
    fn lookup(
        &self,
        _code: &str,
        _args: &[&str],
        _locale: &LocaleTag,
    ) -> Result<String, CatalogError> {
        Err(CatalogError::Unavailable {
            reason: "backing store offline".to_owned(),
        })
    }
}
