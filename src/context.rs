//! Ambient per-request locale state and its lifecycle wrapper.
//!
//! The "current locale" lives in thread-local storage and is only ever
//! bound through [`LocaleScope`], whose drop restores the previous value
//! on every exit path. [`RequestLocaleContext`] pairs a resolver with
//! that guard: it binds the resolved locale before the request body
//! runs, stashes it into request attributes, announces it on the
//! response, and guarantees teardown exactly once whether the body
//! returns or panics. Nothing bound on one worker is visible to another.

use crate::locale::{LocaleTag, platform_default};
use crate::resolver::RequestLocaleResolver;
use crate::transport::{AttributeValue, RequestAttributes, RequestView, ResponseView};
use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

thread_local! {
    static CURRENT_LOCALE: RefCell<Option<LocaleTag>> = const { RefCell::new(None) };
}

/// Request attribute key holding the structured [`LocaleTag`].
pub const LOCALE_ATTRIBUTE: &str = "locale";

/// Request attribute key holding the locale's canonical string form.
pub const LANG_ATTRIBUTE: &str = "lang";

/// Response header announcing the resolved locale to the client.
pub const CONTENT_LANGUAGE_HEADER: &str = "Content-Language";

/// The ambient locale bound on this worker, when one is bound.
#[must_use]
pub fn try_current_locale() -> Option<LocaleTag> {
    CURRENT_LOCALE.with_borrow(Clone::clone)
}

/// The ambient locale bound on this worker, or the platform default.
#[must_use]
pub fn current_locale() -> LocaleTag {
    try_current_locale().unwrap_or_else(platform_default)
}

/// Scoped binding of the ambient locale.
///
/// Entering installs the locale on the current worker and remembers what
/// was bound before; dropping restores it, so scopes nest and the
/// binding cannot leak past the guard even when the stack unwinds.
#[derive(Debug)]
pub struct LocaleScope {
    previous: Option<LocaleTag>,
}

impl LocaleScope {
    /// Bind `locale` as the ambient value until the guard drops.
    #[must_use = "the binding is removed as soon as the guard drops"]
    pub fn enter(locale: LocaleTag) -> Self {
        let previous = CURRENT_LOCALE.with_borrow_mut(|slot| slot.replace(locale));
        Self { previous }
    }
}

impl Drop for LocaleScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_LOCALE.with_borrow_mut(|slot| *slot = previous);
    }
}

/// Request lifecycle wrapper pairing resolution with scoped binding.
#[derive(Debug, Clone)]
pub struct RequestLocaleContext {
    resolver: RequestLocaleResolver,
}

impl RequestLocaleContext {
    /// Create a context over `resolver`.
    #[must_use]
    pub const fn new(resolver: RequestLocaleResolver) -> Self {
        Self { resolver }
    }

    /// The resolver this context consults on request entry.
    #[must_use]
    pub const fn resolver(&self) -> &RequestLocaleResolver {
        &self.resolver
    }

    /// Run `body` with the resolved locale bound for the request.
    ///
    /// On entry: resolves the locale, binds it as the ambient value,
    /// stashes it under [`LOCALE_ATTRIBUTE`] and [`LANG_ATTRIBUTE`], and
    /// sets the [`CONTENT_LANGUAGE_HEADER`] response header. On exit:
    /// removes both attributes and restores the previous ambient value,
    /// exactly once, whether `body` returned normally or panicked. A
    /// panic from `body` is re-raised after teardown.
    pub fn run_scoped<Req, Res, T>(
        &self,
        request: &mut Req,
        response: &mut Res,
        body: impl FnOnce(&mut Req) -> T,
    ) -> T
    where
        Req: RequestView + RequestAttributes,
        Res: ResponseView,
    {
        let locale = self.resolver.resolve(request);
        let rendered = locale.to_string();
        tracing::debug!(locale = %rendered, "binding request locale");

        let _scope = LocaleScope::enter(locale.clone());
        request.set_attribute(LOCALE_ATTRIBUTE, AttributeValue::Locale(locale));
        request.set_attribute(LANG_ATTRIBUTE, AttributeValue::Text(rendered.clone()));
        response.set_header(CONTENT_LANGUAGE_HEADER, &rendered);

        let outcome = catch_unwind(AssertUnwindSafe(|| body(&mut *request)));
        request.remove_attribute(LOCALE_ATTRIBUTE);
        request.remove_attribute(LANG_ATTRIBUTE);
        match outcome {
            Ok(value) => value,
            Err(panic) => resume_unwind(panic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tag(raw: &str) -> LocaleTag {
        raw.parse()
            .unwrap_or_else(|_| panic!("fixture locale `{raw}` must parse"))
    }

    #[rstest]
    fn scope_binds_and_restores() {
        assert_eq!(try_current_locale(), None);
        {
            let _scope = LocaleScope::enter(tag("es-ES"));
            assert_eq!(try_current_locale(), Some(tag("es-ES")));
        }
        assert_eq!(try_current_locale(), None);
    }

    #[rstest]
    fn nested_scopes_restore_the_outer_binding() {
        let _outer = LocaleScope::enter(tag("en"));
        {
            let _inner = LocaleScope::enter(tag("zh-CN"));
            assert_eq!(try_current_locale(), Some(tag("zh-CN")));
        }
        assert_eq!(try_current_locale(), Some(tag("en")));
    }

    #[rstest]
    fn current_locale_defaults_when_unbound() {
        assert_eq!(try_current_locale(), None);
        assert_eq!(current_locale(), platform_default());
    }
}
