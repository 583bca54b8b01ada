//! Permissive parsing of locale-bearing text into [`LocaleTag`] values.
//!
//! Inbound locale strings arrive in heterogeneous shapes: bare tags
//! (`en`), underscore-separated tags (`zh_CN`), and weighted
//! `Accept-Language` lists (`zh-CN,zh;q=0.9,en;q=0.8`). The parser takes
//! the first candidate, discards any quality weight, normalizes
//! separators, and builds an identifier. It never fails: malformed input
//! resolves to the platform default (or a caller-supplied fallback) and
//! is reported at debug level only.

use crate::locale::{LocaleTag, platform_default};

/// Extract the first candidate from a possibly weighted, possibly
/// list-valued locale string.
fn first_candidate(raw: &str) -> &str {
    let trimmed = raw.trim();
    let before_list = trimmed.split(',').next().unwrap_or_default().trim();
    before_list.split(';').next().unwrap_or_default().trim()
}

/// Shape check for the `language` / `language-REGION` fast path.
///
/// A bare tag must already be two lowercase letters; a two-part tag is
/// re-cased to `lower-UPPER` before matching, so `EN-us` is well formed
/// while `EN` alone is not. The check informs logging only; it never
/// gates construction.
fn is_well_formed(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let language = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (None, _) => language.len() == 2 && language.bytes().all(|b| b.is_ascii_lowercase()),
        (Some(region), None) => {
            language.len() == 2
                && language.bytes().all(|b| b.is_ascii_alphabetic())
                && region.len() == 2
                && region.bytes().all(|b| b.is_ascii_alphabetic())
        }
        (Some(_), Some(_)) => false,
    }
}

/// Normalize a raw locale string into a [`LocaleTag`], when possible.
///
/// Takes the first candidate of a weighted list, strips the quality
/// weight, replaces underscores with dashes, and attempts the permissive
/// parse. Tags outside the two-letter `language-REGION` shape still
/// construct an identifier as long as their subtags are structurally
/// valid (`xyz`, `zh-Hans-CN`); the shape check is logged, not enforced.
///
/// # Examples
///
/// ```rust
/// use polyglot::locale_parse::normalize_locale_tag;
///
/// let tag = normalize_locale_tag("zh_CN");
/// assert_eq!(tag.map(|t| t.to_string()), Some("zh-CN".to_owned()));
/// assert!(normalize_locale_tag("  ").is_none());
/// ```
#[must_use]
pub fn normalize_locale_tag(raw: &str) -> Option<LocaleTag> {
    let candidate = first_candidate(raw).replace('_', "-");
    if candidate.is_empty() {
        return None;
    }
    if !is_well_formed(&candidate) {
        tracing::debug!(
            raw,
            candidate = %candidate,
            "locale tag outside the language-REGION shape; parsing permissively"
        );
    }
    candidate.parse().map_or_else(
        |_| {
            tracing::debug!(raw, candidate = %candidate, "unparsable locale tag");
            None
        },
        Some,
    )
}

/// Parse a raw locale string, falling back to the platform default.
///
/// Total: every input produces a valid identifier and nothing is raised
/// to the caller.
///
/// # Examples
///
/// ```rust
/// use polyglot::locale_parse::parse_locale_tag;
///
/// // First candidate of a weighted list wins; the weight is discarded.
/// let tag = parse_locale_tag("zh-CN,zh;q=0.9,en;q=0.8");
/// assert_eq!(tag.to_string(), "zh-CN");
///
/// // Underscore and dash forms round-trip to the same identifier.
/// assert_eq!(parse_locale_tag("zh_CN"), parse_locale_tag("zh-CN"));
/// ```
#[must_use]
pub fn parse_locale_tag(raw: &str) -> LocaleTag {
    normalize_locale_tag(raw).unwrap_or_else(platform_default)
}

/// Parse a raw locale string, substituting `fallback` on failure.
///
/// Blank input also yields the fallback.
#[must_use]
pub fn parse_locale_tag_or(raw: &str, fallback: &LocaleTag) -> LocaleTag {
    normalize_locale_tag(raw).unwrap_or_else(|| fallback.clone())
}
