//! Message catalog collaborator: trait, errors, and the Fluent adapter.
//!
//! The catalog maps `(code, args, locale)` to translated text. The error
//! type distinguishes a missing message from any other failure so the
//! service layer can apply its three-way fallback. [`FluentCatalog`] is
//! the in-memory implementation: one concurrent Fluent bundle per
//! declared locale, built once from FTL source strings. It performs no
//! file loading and no reloading; hosts with richer storage implement
//! [`MessageCatalog`] themselves.

use crate::locale::LocaleTag;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use indexmap::IndexMap;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Source of translated message text.
///
/// Implementations must be cheap and non-blocking: lookups run inline on
/// the hot request path.
pub trait MessageCatalog: Send + Sync {
    /// Resolve `code` with positional `args` in `locale`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Missing`] when the catalog has no message for the
    /// pair; any other variant for failures that are not a miss.
    fn lookup(&self, code: &str, args: &[&str], locale: &LocaleTag)
    -> Result<String, CatalogError>;
}

/// A lookup against the catalog failed.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The catalog has no message for the code/locale pair.
    #[error("no message for code `{code}` in locale `{locale}`")]
    Missing {
        /// The requested message code.
        code: String,
        /// The locale the lookup ran against.
        locale: LocaleTag,
    },
    /// The catalog could not serve the lookup at all.
    #[error("message catalog unavailable: {reason}")]
    Unavailable {
        /// Human-readable failure description.
        reason: String,
    },
}

impl CatalogError {
    /// Whether this error is the "message not found" condition.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Building an in-memory catalog from FTL sources failed.
///
/// Raised at startup, never on the request path.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogBuildError {
    /// A declared locale tag could not be parsed.
    #[error("invalid catalog locale `{tag}`")]
    #[diagnostic(code(polyglot::catalog::invalid_locale))]
    InvalidLocale {
        /// The rejected tag.
        tag: String,
    },
    /// An FTL source failed to parse.
    #[error("failed to parse Fluent resource for `{locale}`: {summary}")]
    #[diagnostic(code(polyglot::catalog::parse))]
    Parse {
        /// The locale the resource was declared for.
        locale: LocaleTag,
        /// Joined parser error descriptions.
        summary: String,
    },
    /// A resource redefined messages already present for the locale.
    #[error("conflicting message definitions for `{locale}`: {summary}")]
    #[diagnostic(code(polyglot::catalog::conflict))]
    Conflict {
        /// The locale the resource was declared for.
        locale: LocaleTag,
        /// Joined conflict descriptions.
        summary: String,
    },
}

/// In-memory Fluent-backed catalog.
///
/// Lookup tries the exact locale first, then any declared locale sharing
/// the language subtag. Positional argument *i* is exposed to patterns
/// as `$argN`, so `greeting = Hello { $arg0 }` formats the first
/// argument.
///
/// # Examples
///
/// ```rust
/// use polyglot::catalog::{FluentCatalog, MessageCatalog};
///
/// let catalog = FluentCatalog::builder()
///     .resource("en", "greeting = Hello { $arg0 }\n")
///     .build()?;
/// let locale = "en-GB".parse()?;
/// let text = catalog.lookup("greeting", &["World"], &locale)?;
/// assert_eq!(text, "Hello World");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct FluentCatalog {
    bundles: IndexMap<LocaleTag, FluentBundle<FluentResource>>,
}

impl FluentCatalog {
    /// Start building a catalog from FTL sources.
    #[must_use]
    pub fn builder() -> FluentCatalogBuilder {
        FluentCatalogBuilder::default()
    }

    /// The locales this catalog declares, in declaration order.
    #[must_use]
    pub fn locales(&self) -> Vec<LocaleTag> {
        self.bundles.keys().cloned().collect()
    }

    fn bundle_for(&self, locale: &LocaleTag) -> Option<&FluentBundle<FluentResource>> {
        self.bundles.get(locale).or_else(|| {
            self.bundles
                .iter()
                .find(|(declared, _)| declared.language() == locale.language())
                .map(|(_, bundle)| bundle)
        })
    }
}

impl fmt::Debug for FluentCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentCatalog")
            .field("locales", &self.locales())
            .finish()
    }
}

impl MessageCatalog for FluentCatalog {
    fn lookup(
        &self,
        code: &str,
        args: &[&str],
        locale: &LocaleTag,
    ) -> Result<String, CatalogError> {
        let bundle = self
            .bundle_for(locale)
            .ok_or_else(|| missing(code, locale))?;
        let message = bundle
            .get_message(code)
            .ok_or_else(|| missing(code, locale))?;
        let pattern = message.value().ok_or_else(|| missing(code, locale))?;

        let fluent_args = positional_args(args);
        let mut errors = Vec::new();
        let rendered = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            tracing::debug!(code, locale = %locale, ?errors, "fluent formatting reported errors");
        }
        Ok(rendered.into_owned())
    }
}

fn missing(code: &str, locale: &LocaleTag) -> CatalogError {
    CatalogError::Missing {
        code: code.to_owned(),
        locale: locale.clone(),
    }
}

fn positional_args<'source>(args: &[&'source str]) -> Option<FluentArgs<'source>> {
    if args.is_empty() {
        return None;
    }
    let mut fluent_args = FluentArgs::new();
    for (index, value) in args.iter().enumerate() {
        fluent_args.set(format!("arg{index}"), FluentValue::from(*value));
    }
    Some(fluent_args)
}

/// Accumulates `(locale, FTL source)` pairs for [`FluentCatalog`].
#[derive(Debug, Default)]
pub struct FluentCatalogBuilder {
    resources: Vec<(String, String)>,
}

impl FluentCatalogBuilder {
    /// Declare an FTL resource for `tag`. Multiple resources may share a
    /// tag; they are merged into one bundle.
    #[must_use]
    pub fn resource(mut self, tag: impl Into<String>, source: impl Into<String>) -> Self {
        self.resources.push((tag.into(), source.into()));
        self
    }

    /// Parse every declared resource and assemble the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogBuildError`] when a tag or FTL source is
    /// invalid, or when resources for one locale redefine a message.
    pub fn build(self) -> Result<FluentCatalog, CatalogBuildError> {
        let mut bundles = IndexMap::new();
        for (tag, source) in self.resources {
            let locale: LocaleTag = tag
                .parse()
                .map_err(|_| CatalogBuildError::InvalidLocale { tag: tag.clone() })?;
            insert_resource(&mut bundles, locale, source)?;
        }
        Ok(FluentCatalog { bundles })
    }
}

fn insert_resource(
    bundles: &mut IndexMap<LocaleTag, FluentBundle<FluentResource>>,
    locale: LocaleTag,
    source: String,
) -> Result<(), CatalogBuildError> {
    let resource = FluentResource::try_new(source).map_err(|(_, errors)| {
        CatalogBuildError::Parse {
            locale: locale.clone(),
            summary: join_errors(&errors),
        }
    })?;
    let bundle = bundles.entry(locale.clone()).or_insert_with(|| {
        let mut fresh = FluentBundle::new_concurrent(vec![locale.language_identifier().clone()]);
        fresh.set_use_isolating(false);
        fresh
    });
    bundle
        .add_resource(resource)
        .map_err(|errors| CatalogBuildError::Conflict {
            locale,
            summary: join_errors(&errors),
        })
}

fn join_errors<E: fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
