/// # Domain Verification
///
/// Checks a domain's mail-authentication posture with three DNS lookups:
/// 1. MX records on the domain
/// 2. TXT records on the domain, looking for an SPF policy (`v=spf1`)
/// 3. TXT records on `_dmarc.<domain>`, looking for a DMARC policy (`v=DMARC1`)
///
/// # Examples
/// ```no_run
/// use domain_verifier::verification::{DomainVerifier, ResolverSettings, SystemResolver};
///
/// # async fn example() {
/// let verifier = DomainVerifier::with_tracing(SystemResolver::new(ResolverSettings::default()));
/// let result = verifier.verify("example.com").await;
/// println!("SPF: {}", result.spf_record);
/// # }
/// ```
pub mod verifier;

/// Resolver abstraction and its `trust-dns` implementation.
pub mod dns;

/// Injected sink for lookup failures.
pub mod diagnostics;

pub use diagnostics::{Diagnostics, LookupKind, SilentDiagnostics, TracingDiagnostics};
pub use dns::{DnsLookup, LookupError, ResolverSettings, SystemResolver};
pub use verifier::DomainVerifier;
