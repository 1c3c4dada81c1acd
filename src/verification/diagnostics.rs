use super::dns::LookupError;
use std::fmt;

#[cfg(test)]
use mockall::automock;

/// Which of the three verification lookups a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Mx,
    Spf,
    Dmarc,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Mx => "mx",
            LookupKind::Spf => "spf",
            LookupKind::Dmarc => "dmarc",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for lookup failures the verifier absorbs.
///
/// Injected into [`DomainVerifier`](super::DomainVerifier) so callers decide
/// where diagnostics go.
#[cfg_attr(test, automock)]
pub trait Diagnostics: Send + Sync {
    fn lookup_failed(&self, kind: LookupKind, error: &LookupError);
}

/// Emits lookup failures as `tracing` events.
///
/// Absent records are routine and logged at `debug`; anything else is a
/// resolver problem and logged at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn lookup_failed(&self, kind: LookupKind, error: &LookupError) {
        match error {
            LookupError::NoRecords { name } => {
                tracing::debug!(lookup = %kind, name = %name, "No records found");
            }
            LookupError::Failed { name, reason } => {
                tracing::warn!(lookup = %kind, name = %name, reason = %reason, "DNS lookup failed");
            }
        }
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn lookup_failed(&self, _kind: LookupKind, _error: &LookupError) {}
}
