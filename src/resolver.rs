//! Per-request locale resolution with source precedence and support gating.
//!
//! Resolution is a pure function of the request and the policy the
//! resolver was built with: the configured header wins over the
//! configured parameter, the produced candidate must pass the
//! operator-declared support set, and anything else resolves to the
//! configured default locale. The default itself is never gated; the
//! operator is trusted to declare a consistent one.

use crate::locale::LocaleTag;
use crate::locale_parse::parse_locale_tag;
use crate::settings::I18nSettings;
use crate::transport::{RequestView, ResponseView};
use std::collections::HashSet;

/// Operator-declared allow-list of locale tags.
///
/// Empty means every locale is accepted. Membership is case-insensitive
/// and matches either the full tag or the language-only prefix, so a set
/// containing `zh-cn` permits `zh-CN` and a set containing `en` permits
/// `en-GB`.
#[derive(Debug, Clone, Default)]
pub struct SupportSet {
    tags: HashSet<String>,
}

impl SupportSet {
    /// Build a support set from raw tag strings, lowering and trimming
    /// each entry and dropping blanks.
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| tag.as_ref().trim().to_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }

    /// `true` when no tags are declared (all locales accepted).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether `locale` passes the gate.
    #[must_use]
    pub fn permits(&self, locale: &LocaleTag) -> bool {
        self.tags.is_empty()
            || self.tags.contains(&locale.lowercase_tag())
            || self.tags.contains(locale.language())
    }
}

/// Immutable resolution configuration compiled once from settings.
#[derive(Debug, Clone)]
pub struct ResolutionPolicy {
    header_name: String,
    param_name: String,
    support: SupportSet,
    default_locale: LocaleTag,
}

impl ResolutionPolicy {
    /// Compile a policy from the configuration surface.
    ///
    /// The default-locale tag is parsed with the total parser, so a
    /// malformed configuration value degrades to the platform default
    /// rather than failing startup.
    #[must_use]
    pub fn from_settings(settings: &I18nSettings) -> Self {
        Self {
            header_name: settings.header_name.clone(),
            param_name: settings.param_name.clone(),
            support: SupportSet::new(&settings.supported_locales),
            default_locale: parse_locale_tag(&settings.default_locale),
        }
    }

    /// The request header consulted first.
    #[must_use]
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// The query/form parameter consulted second.
    #[must_use]
    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    /// The support gate.
    #[must_use]
    pub const fn support(&self) -> &SupportSet {
        &self.support
    }

    /// The locale used when resolution produces no usable candidate.
    #[must_use]
    pub const fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }
}

/// Resolves the effective locale for one request.
///
/// Holds no mutable state and is safe for unsynchronized concurrent use.
#[derive(Debug, Clone)]
pub struct RequestLocaleResolver {
    policy: ResolutionPolicy,
}

impl RequestLocaleResolver {
    /// Create a resolver over a compiled policy.
    #[must_use]
    pub const fn new(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    /// The policy this resolver applies.
    #[must_use]
    pub const fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    /// Resolve the effective locale for `request`.
    ///
    /// Precedence: configured header (the one place a weighted
    /// `Accept-Language` list is expected), then configured parameter,
    /// then the default locale. A candidate outside the support set also
    /// resolves to the default. Total and deterministic.
    #[must_use]
    pub fn resolve(&self, request: &impl RequestView) -> LocaleTag {
        match self.candidate(request) {
            Some(locale) if self.policy.support.permits(&locale) => locale,
            Some(locale) => {
                tracing::debug!(%locale, "locale not in support set; using default");
                self.policy.default_locale.clone()
            }
            None => self.policy.default_locale.clone(),
        }
    }

    /// Announce `locale` on the response when it passes the support set.
    ///
    /// Passive counterpart for hosts that manage their own request
    /// lifecycle: no ambient state is touched.
    pub fn announce(&self, response: &mut impl ResponseView, locale: &LocaleTag) {
        if self.policy.support.permits(locale) {
            response.set_header(&self.policy.header_name, &locale.to_string());
        }
    }

    fn candidate(&self, request: &impl RequestView) -> Option<LocaleTag> {
        read_source(&self.policy.header_name, |name| request.header(name))
            .or_else(|| read_source(&self.policy.param_name, |name| request.query_param(name)))
            .map(|raw| parse_locale_tag(&raw))
    }
}

/// Read a named value, treating a blank name or blank value as absent.
fn read_source(name: &str, read: impl FnOnce(&str) -> Option<String>) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }
    read(name).filter(|value| !value.trim().is_empty())
}
