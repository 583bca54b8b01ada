//! Polyglot core library.
//!
//! Resolves, per inbound request, which locale should govern response
//! content, and serves translated message strings keyed by a stable
//! code with deterministic fallback. The crate is framework-agnostic:
//! the HTTP transport and the message catalog are collaborators behind
//! traits.

pub mod catalog;
pub mod context;
pub mod facade;
pub mod locale;
pub mod locale_parse;
pub mod resolver;
pub mod service;
pub mod settings;
pub mod transport;
