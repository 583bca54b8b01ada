//! Message resolution with layered fallback.
//!
//! [`MessageService`] resolves a message code against the catalog
//! collaborator and never lets a lookup failure escape to the request:
//! a miss falls back to the explicit default, then to the code itself
//! (when configured), then to an empty string; any other catalog failure
//! degrades to the default or the bare code. Locale selection prefers an
//! explicit argument, then the ambient request locale, then the platform
//! default.

use crate::catalog::MessageCatalog;
use crate::context;
use crate::locale::LocaleTag;
use crate::locale_parse::{normalize_locale_tag, parse_locale_tag};
use crate::settings::I18nSettings;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A multi-code resolvable: candidate codes tried in order, shared
/// positional arguments, and an optional default message.
#[derive(Debug, Clone, Default)]
pub struct MessageSpec {
    codes: Vec<String>,
    args: Vec<String>,
    default_message: Option<String>,
}

impl MessageSpec {
    /// Create a spec from candidate codes, most specific first.
    #[must_use]
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            args: Vec::new(),
            default_message: None,
        }
    }

    /// Attach positional arguments shared by every candidate code.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Attach the message used when no candidate code resolves.
    #[must_use]
    pub fn with_default(mut self, default_message: impl Into<String>) -> Self {
        self.default_message = Some(default_message.into());
        self
    }

    /// The candidate codes, in trial order.
    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}

/// Resolves message codes to translated text.
///
/// Immutable after construction and safe for unsynchronized concurrent
/// use; the catalog handle is shared.
#[derive(Clone)]
pub struct MessageService {
    catalog: Arc<dyn MessageCatalog>,
    default_locale: LocaleTag,
    supported_tags: Vec<String>,
    use_code_as_default: bool,
}

impl MessageService {
    /// Build a service over a catalog handle and the configuration
    /// surface.
    #[must_use]
    pub fn new(catalog: Arc<dyn MessageCatalog>, settings: &I18nSettings) -> Self {
        Self {
            catalog,
            default_locale: parse_locale_tag(&settings.default_locale),
            supported_tags: settings.supported_locales.clone(),
            use_code_as_default: settings.catalog.use_code_as_default_message,
        }
    }

    /// Resolve `code` in the ambient locale.
    #[must_use]
    pub fn message(&self, code: &str) -> String {
        self.message_in(code, &[], None, None)
    }

    /// Resolve `code` with positional arguments in the ambient locale.
    #[must_use]
    pub fn message_args(&self, code: &str, args: &[&str]) -> String {
        self.message_in(code, args, None, None)
    }

    /// Resolve `code`, substituting `default` when the catalog misses.
    #[must_use]
    pub fn message_or(&self, code: &str, args: &[&str], default: &str) -> String {
        self.message_in(code, args, Some(default), None)
    }

    /// Resolve `code` with the full layered contract.
    ///
    /// A blank code returns `default` (or empty) without consulting the
    /// catalog. A catalog miss falls back to `default`, then the code
    /// itself when code-echo is configured, then an empty string. Any
    /// other catalog failure degrades to `default` or the bare code;
    /// lookup never aborts request handling. When `locale` is absent the
    /// ambient request locale applies, then the platform default.
    #[must_use]
    pub fn message_in(
        &self,
        code: &str,
        args: &[&str],
        default: Option<&str>,
        locale: Option<&LocaleTag>,
    ) -> String {
        if code.trim().is_empty() {
            return default.unwrap_or_default().to_owned();
        }
        let effective = self.effective_locale(locale);
        match self.catalog.lookup(code, args, &effective) {
            Ok(text) => text,
            Err(err) if err.is_missing() => {
                tracing::debug!(code, locale = %effective, "no message for code");
                default.map_or_else(|| self.miss_fallback(code), ToOwned::to_owned)
            }
            Err(err) => {
                tracing::error!(code, locale = %effective, error = %err, "message catalog failure");
                default.map_or_else(|| code.to_owned(), ToOwned::to_owned)
            }
        }
    }

    /// Resolve a [`MessageSpec`]: first candidate code the catalog can
    /// produce wins, then the attached default message, then an empty
    /// string.
    #[must_use]
    pub fn resolve_spec(&self, spec: &MessageSpec, locale: Option<&LocaleTag>) -> String {
        let effective = self.effective_locale(locale);
        let args: Vec<&str> = spec.args.iter().map(String::as_str).collect();
        for code in &spec.codes {
            match self.catalog.lookup(code, &args, &effective) {
                Ok(text) => return text,
                Err(err) if err.is_missing() => {}
                Err(err) => {
                    tracing::error!(code, locale = %effective, error = %err, "message catalog failure");
                }
            }
        }
        spec.default_message.clone().unwrap_or_default()
    }

    /// Whether the catalog can produce a message for `code`.
    ///
    /// Blank codes are always absent. Never fails: an unavailable
    /// catalog reports `false`.
    #[must_use]
    pub fn has_message(&self, code: &str, locale: Option<&LocaleTag>) -> bool {
        if code.trim().is_empty() {
            return false;
        }
        let effective = self.effective_locale(locale);
        match self.catalog.lookup(code, &[], &effective) {
            Ok(_) => true,
            Err(err) => {
                if !err.is_missing() {
                    tracing::error!(code, locale = %effective, error = %err, "existence check failed");
                }
                false
            }
        }
    }

    /// Resolve many codes at once.
    ///
    /// Duplicates are dropped, first-seen order is preserved, and each
    /// code resolves independently with no arguments and no default.
    /// Empty input yields an empty mapping.
    #[must_use]
    pub fn messages(&self, codes: &[&str], locale: Option<&LocaleTag>) -> IndexMap<String, String> {
        let effective = self.effective_locale(locale);
        let mut resolved = IndexMap::new();
        for code in codes {
            if resolved.contains_key(*code) {
                continue;
            }
            let text = self.message_in(code, &[], None, Some(&effective));
            resolved.insert((*code).to_owned(), text);
        }
        resolved
    }

    /// The locales declared supported by configuration.
    ///
    /// Unparsable entries are dropped and duplicates removed, preserving
    /// configuration order. An empty configuration yields exactly the
    /// default locale.
    #[must_use]
    pub fn supported_locales(&self) -> Vec<LocaleTag> {
        if self.supported_tags.is_empty() {
            return vec![self.default_locale.clone()];
        }
        let mut declared = Vec::new();
        for raw in &self.supported_tags {
            let Some(parsed) = normalize_locale_tag(raw) else {
                continue;
            };
            if !declared.contains(&parsed) {
                declared.push(parsed);
            }
        }
        declared
    }

    /// The locale lookups run against when nothing explicit is given.
    #[must_use]
    pub fn current_locale(&self) -> LocaleTag {
        context::current_locale()
    }

    /// The configured default locale.
    #[must_use]
    pub const fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }

    fn miss_fallback(&self, code: &str) -> String {
        if self.use_code_as_default {
            code.to_owned()
        } else {
            String::new()
        }
    }

    fn effective_locale(&self, explicit: Option<&LocaleTag>) -> LocaleTag {
        explicit.cloned().unwrap_or_else(context::current_locale)
    }
}

impl fmt::Debug for MessageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageService")
            .field("default_locale", &self.default_locale)
            .field("supported_tags", &self.supported_tags)
            .field("use_code_as_default", &self.use_code_as_default)
            .finish_non_exhaustive()
    }
}
