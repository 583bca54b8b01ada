//! Locale identifier value type and platform-default detection.
//!
//! [`LocaleTag`] is the immutable language-and-optional-region value used
//! throughout the crate. It wraps a validated [`LanguageIdentifier`] so the
//! canonical rendering (lowercase language, uppercase region, dash-joined)
//! and case-insensitive comparisons come from one place.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use unic_langid::LanguageIdentifier;
use unic_langid::subtags::Region;

/// System locale provider for the current host.
pub trait SystemLocale {
    /// Return the system locale string when available.
    fn system_locale(&self) -> Option<String>;
}

/// System locale provider backed by `sys-locale`.
#[derive(Debug, Default, Copy, Clone)]
pub struct SysLocale;

impl SystemLocale for SysLocale {
    fn system_locale(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// A locale tag could not be parsed into a [`LocaleTag`].
#[derive(Debug, Clone, Error)]
#[error("invalid locale tag `{tag}`")]
pub struct InvalidLocaleTag {
    /// The rejected input.
    pub tag: String,
}

/// An immutable language (and optional region) identifier.
///
/// The canonical text form joins a lowercase language subtag and an
/// uppercase region subtag with a dash, for example `en` or `zh-CN`.
/// Construction canonicalizes case, so two tags that differ only in case
/// compare equal.
///
/// # Examples
///
/// ```rust
/// use polyglot::locale::LocaleTag;
///
/// let tag: LocaleTag = "zh-cn".parse()?;
/// assert_eq!(tag.to_string(), "zh-CN");
/// assert_eq!(tag.language(), "zh");
/// assert_eq!(tag.region(), Some("CN"));
/// # Ok::<(), polyglot::locale::InvalidLocaleTag>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleTag(LanguageIdentifier);

impl LocaleTag {
    /// The lowercase language subtag.
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    /// The uppercase region subtag when present.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.0.region.as_ref().map(Region::as_str)
    }

    /// The full tag lowered for support-list membership checks.
    #[must_use]
    pub fn lowercase_tag(&self) -> String {
        self.to_string().to_lowercase()
    }

    /// Case-insensitive comparison against a raw tag string.
    #[must_use]
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.to_string().eq_ignore_ascii_case(tag.trim())
    }

    /// Borrow the validated identifier, for collaborators that speak
    /// `unic-langid` directly (such as Fluent bundles).
    #[must_use]
    pub const fn language_identifier(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// Last-resort value when the host reports no usable locale.
    fn fallback_english() -> Self {
        Self("en".parse().unwrap_or_default())
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LocaleTag {
    type Err = InvalidLocaleTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageIdentifier::from_str(s)
            .map(Self)
            .map_err(|_| InvalidLocaleTag { tag: s.to_owned() })
    }
}

impl From<LanguageIdentifier> for LocaleTag {
    fn from(inner: LanguageIdentifier) -> Self {
        Self(inner)
    }
}

/// Normalize a host locale string (for example `en_US.UTF-8`) into a tag.
///
/// Strips encoding suffixes and variant sections, replaces underscores with
/// dashes, and validates the result.
fn normalize_host_tag(raw: &str) -> Option<LocaleTag> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped = trimmed.split(['.', '@']).next().unwrap_or_default().trim();
    if stripped.is_empty() {
        return None;
    }
    let candidate = stripped.replace('_', "-");
    candidate.parse().ok()
}

/// Detect the platform default locale through an explicit provider.
///
/// Falls back to `en` when the host reports nothing usable.
#[must_use]
pub fn detect_platform_default(system: &impl SystemLocale) -> LocaleTag {
    system
        .system_locale()
        .as_deref()
        .and_then(normalize_host_tag)
        .unwrap_or_else(LocaleTag::fallback_english)
}

static PLATFORM_DEFAULT: OnceLock<LocaleTag> = OnceLock::new();

/// The process-wide platform default locale.
///
/// Detected once from the host on first use and cached for the process
/// lifetime.
#[must_use]
pub fn platform_default() -> LocaleTag {
    PLATFORM_DEFAULT
        .get_or_init(|| detect_platform_default(&SysLocale))
        .clone()
}
