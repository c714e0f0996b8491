//! Process-wide diagnostics.
//!
//! This crate never installs a logger of its own: the host application installs a `tracing`
//! subscriber once at process start and tears it down at process exit, and everything here
//! routes through that dispatcher. The only state owned by this module is the set of
//! deprecation ids that have already fired, so each deprecation warns once per process no
//! matter how many render calls repeat it.

use std::collections::BTreeSet;
use std::sync::{Mutex, OnceLock};

/// Diagnostic levels, mapped onto the host's `tracing` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    /// A warning about an input form that still works but is scheduled for removal.
    Deprecation,
}

pub fn emit(severity: Severity, message: &str) {
    match severity {
        Severity::Debug => tracing::debug!(target: "remora", "{message}"),
        Severity::Info => tracing::info!(target: "remora", "{message}"),
        Severity::Warning => tracing::warn!(target: "remora", "{message}"),
        Severity::Deprecation => tracing::warn!(target: "remora", deprecated = true, "{message}"),
    }
}

fn fired() -> &'static Mutex<BTreeSet<&'static str>> {
    static FIRED: OnceLock<Mutex<BTreeSet<&'static str>>> = OnceLock::new();
    FIRED.get_or_init(|| Mutex::new(BTreeSet::new()))
}

/// Emits a `Deprecation` diagnostic once per process for a given `id`.
///
/// Returns whether the diagnostic actually fired (first call for this id).
pub fn warn_deprecated(id: &'static str, message: &str) -> bool {
    let mut fired = fired().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if !fired.insert(id) {
        return false;
    }
    emit(Severity::Deprecation, message);
    true
}
