//! Process-wide facade over [`MessageService`].
//!
//! Call sites that cannot receive the service by constructor injection
//! reach it here. The host binds the instance once during startup
//! wiring; afterwards every accessor is a thin pass-through. Using the
//! facade before binding is a wiring defect and fails fast — the one
//! condition in this subsystem that is allowed to escape loudly.

use crate::locale::LocaleTag;
use crate::service::MessageService;
use indexmap::IndexMap;
use std::sync::{Arc, OnceLock, RwLock};

static SERVICE: OnceLock<RwLock<Option<Arc<MessageService>>>> = OnceLock::new();

fn storage() -> &'static RwLock<Option<Arc<MessageService>>> {
    SERVICE.get_or_init(|| RwLock::new(None))
}

/// Bind the process-wide service instance.
///
/// The first bind wins; a second bind is ignored with a warning, so the
/// instance observed by callers never changes for the life of the
/// process.
pub fn bind(service: Arc<MessageService>) {
    let lock = storage();
    let mut guard = lock
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if guard.is_some() {
        tracing::warn!("message service already bound; keeping the existing instance");
        return;
    }
    *guard = Some(service);
}

/// The bound service, when one has been bound.
#[must_use]
pub fn try_service() -> Option<Arc<MessageService>> {
    let lock = storage();
    let guard = lock
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.clone()
}

/// The bound service.
///
/// # Panics
///
/// Panics when no service has been bound; every later call would
/// silently misbehave otherwise, so this is raised immediately.
#[must_use]
pub fn service() -> Arc<MessageService> {
    try_service().unwrap_or_else(|| {
        panic!("message service not bound; call polyglot::facade::bind during startup wiring")
    })
}

/// Scoped helper that restores the previous binding when dropped.
#[derive(Debug)]
pub struct FacadeGuard {
    previous: Option<Arc<MessageService>>,
}

impl Drop for FacadeGuard {
    fn drop(&mut self) {
        let lock = storage();
        let mut guard = lock
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = self.previous.take();
    }
}

/// Override the bound service within a test scope.
#[must_use]
pub fn rebind_for_tests(service: Arc<MessageService>) -> FacadeGuard {
    let lock = storage();
    let mut guard = lock
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let previous = guard.replace(service);
    FacadeGuard { previous }
}

// Compile-time assertions that the public setters keep their signatures.
const _: fn(Arc<MessageService>) = bind;
const _: fn(Arc<MessageService>) -> FacadeGuard = rebind_for_tests;

/// Resolve `code` in the ambient locale.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn get(code: &str) -> String {
    service().message(code)
}

/// Resolve `code` with positional arguments in the ambient locale.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn get_args(code: &str, args: &[&str]) -> String {
    service().message_args(code, args)
}

/// Resolve `code` in an explicit locale.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn get_in(code: &str, locale: &LocaleTag) -> String {
    service().message_in(code, &[], None, Some(locale))
}

/// Resolve `code`, substituting `default` when the catalog misses.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn get_or(code: &str, default: &str) -> String {
    service().message_in(code, &[], Some(default), None)
}

/// Short alias for [`get`], for dense call sites.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn t(code: &str) -> String {
    get(code)
}

/// Whether the catalog can produce a message for `code`.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn exists(code: &str) -> bool {
    service().has_message(code, None)
}

/// Whether the catalog can produce a message for `code` in `locale`.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn exists_in(code: &str, locale: &LocaleTag) -> bool {
    service().has_message(code, Some(locale))
}

/// Resolve many codes in the ambient locale.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn batch(codes: &[&str]) -> IndexMap<String, String> {
    service().messages(codes, None)
}

/// Resolve many codes in an explicit locale.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn batch_in(codes: &[&str], locale: &LocaleTag) -> IndexMap<String, String> {
    service().messages(codes, Some(locale))
}

/// The locale lookups currently run against.
///
/// # Panics
///
/// Panics when no service has been bound.
#[must_use]
pub fn current_locale() -> LocaleTag {
    service().current_locale()
}
