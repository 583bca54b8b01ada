//! Seams to the HTTP transport hosting this crate.
//!
//! The crate never depends on a web framework; the host adapts its
//! request and response types to these traits. Read access drives
//! resolution, attribute access carries the resolved locale through the
//! request, and the response view announces the outcome to the client.

use crate::locale::LocaleTag;

/// Read-only view of an inbound request.
pub trait RequestView {
    /// Fetch a header value by name.
    fn header(&self, name: &str) -> Option<String>;

    /// Fetch a query or form parameter value by name.
    fn query_param(&self, name: &str) -> Option<String>;
}

/// Request-scoped attribute storage.
pub trait RequestAttributes {
    /// Store an attribute under `key`, replacing any previous value.
    fn set_attribute(&mut self, key: &'static str, value: AttributeValue);

    /// Remove the attribute stored under `key`, if any.
    fn remove_attribute(&mut self, key: &'static str);
}

/// Write access to the outbound response.
pub trait ResponseView {
    /// Set a response header, replacing any previous value.
    fn set_header(&mut self, name: &str, value: &str);
}

/// Values the locale machinery stashes into request attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// The structured identifier.
    Locale(LocaleTag),
    /// The identifier's canonical string form.
    Text(String),
}
