//! Tests for request locale resolution and support gating.

mod support;

use anyhow::{Result, ensure};
use polyglot::locale::platform_default;
use polyglot::resolver::{RequestLocaleResolver, ResolutionPolicy};
use polyglot::settings::I18nSettings;
use rstest::rstest;
use support::{StubRequest, StubResponse};

fn resolver(default_locale: &str, supported: &[&str]) -> RequestLocaleResolver {
    let settings = I18nSettings {
        default_locale: default_locale.to_owned(),
        supported_locales: supported.iter().map(|&raw| raw.to_owned()).collect(),
        ..I18nSettings::default()
    };
    RequestLocaleResolver::new(ResolutionPolicy::from_settings(&settings))
}

#[rstest]
fn header_wins_over_parameter() -> Result<()> {
    let request = StubRequest::new()
        .with_header("Accept-Language", "en-US")
        .with_param("lang", "fr-FR");
    let resolved = resolver("zh-CN", &[]).resolve(&request);
    ensure!(
        resolved.to_string() == "en-US",
        "expected the header to win, got {resolved}"
    );
    Ok(())
}

#[rstest]
fn parameter_applies_when_header_is_absent() -> Result<()> {
    let request = StubRequest::new().with_param("lang", "fr-FR");
    let resolved = resolver("zh-CN", &[]).resolve(&request);
    ensure!(
        resolved.to_string() == "fr-FR",
        "expected the parameter to apply, got {resolved}"
    );
    Ok(())
}

#[rstest]
fn blank_header_falls_through_to_parameter() -> Result<()> {
    let request = StubRequest::new()
        .with_header("Accept-Language", "   ")
        .with_param("lang", "es-ES");
    let resolved = resolver("zh-CN", &[]).resolve(&request);
    ensure!(
        resolved.to_string() == "es-ES",
        "expected a blank header to be unusable, got {resolved}"
    );
    Ok(())
}

#[rstest]
fn weighted_header_list_uses_the_first_candidate() -> Result<()> {
    let request = StubRequest::new().with_header("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8");
    let resolved = resolver("en", &[]).resolve(&request);
    ensure!(
        resolved.to_string() == "zh-CN",
        "expected the first weighted candidate, got {resolved}"
    );
    Ok(())
}

#[rstest]
fn unsupported_candidate_resolves_to_the_default() -> Result<()> {
    let request = StubRequest::new().with_header("Accept-Language", "fr-FR");
    let resolved = resolver("zh-CN", &["en", "zh-cn"]).resolve(&request);
    ensure!(
        resolved.to_string() == "zh-CN",
        "expected the unsupported candidate to be redirected, got {resolved}"
    );
    Ok(())
}

#[rstest]
fn language_prefix_passes_the_gate() -> Result<()> {
    let request = StubRequest::new().with_header("Accept-Language", "en-GB");
    let resolved = resolver("zh-CN", &["en"]).resolve(&request);
    ensure!(
        resolved.to_string() == "en-GB",
        "expected the language prefix to permit the candidate, got {resolved}"
    );
    Ok(())
}

#[rstest]
fn no_sources_resolve_to_the_default() -> Result<()> {
    let request = StubRequest::new();
    let resolved = resolver("zh-CN", &["en"]).resolve(&request);
    ensure!(
        resolved.to_string() == "zh-CN",
        "expected the default locale, got {resolved}"
    );
    Ok(())
}

#[rstest]
fn garbage_header_degrades_to_the_platform_default() -> Result<()> {
    // With an open support set, a header that cannot be parsed still
    // produces a candidate: the parser's platform-default fallback.
    let request = StubRequest::new().with_header("Accept-Language", "!!!");
    let resolved = resolver("zh-CN", &[]).resolve(&request);
    ensure!(
        resolved == platform_default(),
        "expected the parser fallback to flow through, got {resolved}"
    );
    Ok(())
}

#[rstest]
fn resolution_is_idempotent() -> Result<()> {
    let gate = resolver("zh-CN", &["en", "zh-cn"]);
    let request = StubRequest::new().with_header("Accept-Language", "en-US");
    let first = gate.resolve(&request);
    let second = gate.resolve(&request);
    ensure!(
        first == second,
        "identical inputs must resolve identically: {first} vs {second}"
    );
    Ok(())
}

#[rstest]
fn announce_sets_the_configured_header_for_supported_locales() -> Result<()> {
    let gate = resolver("zh-CN", &["en", "zh-cn"]);
    let mut response = StubResponse::new();
    gate.announce(&mut response, &support::tag("en-US"));
    ensure!(
        response.header("Accept-Language") == Some("en-US"),
        "expected the locale to be announced, got {:?}",
        response.headers
    );
    Ok(())
}

#[rstest]
fn announce_stays_silent_for_unsupported_locales() -> Result<()> {
    let gate = resolver("zh-CN", &["en", "zh-cn"]);
    let mut response = StubResponse::new();
    gate.announce(&mut response, &support::tag("fr-FR"));
    ensure!(
        response.headers.is_empty(),
        "expected no announcement, got {:?}",
        response.headers
    );
    Ok(())
}
