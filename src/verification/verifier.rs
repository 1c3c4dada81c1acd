use super::diagnostics::{Diagnostics, LookupKind, TracingDiagnostics};
use super::dns::DnsLookup;
use crate::models::VerificationResult;
use std::sync::Arc;

pub const SPF_PREFIX: &str = "v=spf1";
pub const DMARC_PREFIX: &str = "v=DMARC1";
pub const DMARC_LABEL: &str = "_dmarc";

/// Checks a domain for MX, SPF and DMARC records.
///
/// Holds no mutable state; clone it freely or share it behind `web::Data`.
#[derive(Clone)]
pub struct DomainVerifier {
    resolver: Arc<dyn DnsLookup>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl DomainVerifier {
    pub fn new<R, D>(resolver: R, diagnostics: D) -> Self
    where
        R: DnsLookup + 'static,
        D: Diagnostics + 'static,
    {
        Self {
            resolver: Arc::new(resolver),
            diagnostics: Arc::new(diagnostics),
        }
    }

    /// Verifier reporting lookup failures through `tracing`.
    pub fn with_tracing<R>(resolver: R) -> Self
    where
        R: DnsLookup + 'static,
    {
        Self::new(resolver, TracingDiagnostics)
    }

    /// Runs the MX, SPF and DMARC lookups for `domain` one after another.
    ///
    /// Never fails: a lookup error is handed to the diagnostics sink and the
    /// affected fields stay `false`/empty. `domain` is echoed back verbatim.
    pub async fn verify(&self, domain: &str) -> VerificationResult {
        let mut result = VerificationResult::empty(domain);

        match self.resolver.mx_lookup(domain).await {
            Ok(exchanges) => result.has_mx = !exchanges.is_empty(),
            Err(e) => self.diagnostics.lookup_failed(LookupKind::Mx, &e),
        }

        match self.resolver.txt_lookup(domain).await {
            Ok(records) => {
                if let Some(spf) = first_with_prefix(records, SPF_PREFIX) {
                    result.has_spf = true;
                    result.spf_record = spf;
                }
            }
            Err(e) => self.diagnostics.lookup_failed(LookupKind::Spf, &e),
        }

        match self.resolver.txt_lookup(&dmarc_name(domain)).await {
            Ok(records) => {
                if let Some(dmarc) = first_with_prefix(records, DMARC_PREFIX) {
                    result.has_dmarc = true;
                    result.dmarc_record = dmarc;
                }
            }
            Err(e) => self.diagnostics.lookup_failed(LookupKind::Dmarc, &e),
        }

        tracing::debug!(
            domain = %result.domain,
            has_mx = result.has_mx,
            has_spf = result.has_spf,
            has_dmarc = result.has_dmarc,
            "Domain verified"
        );

        result
    }
}

/// Name at which a domain publishes its DMARC policy.
pub fn dmarc_name(domain: &str) -> String {
    format!("{}.{}", DMARC_LABEL, domain)
}

/// First record, in answer order, that starts with `prefix` (case-sensitive).
fn first_with_prefix(records: Vec<String>, prefix: &str) -> Option<String> {
    records.into_iter().find(|record| record.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::diagnostics::{MockDiagnostics, SilentDiagnostics};
    use crate::verification::dns::{LookupError, MockDnsLookup};
    use std::sync::Mutex;

    fn no_records(name: &str) -> LookupError {
        LookupError::NoRecords {
            name: name.to_string(),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// Diagnostics sink that keeps every report for later inspection.
    #[derive(Default, Clone)]
    struct RecordingDiagnostics {
        seen: Arc<Mutex<Vec<(LookupKind, LookupError)>>>,
    }

    impl Diagnostics for RecordingDiagnostics {
        fn lookup_failed(&self, kind: LookupKind, error: &LookupError) {
            self.seen.lock().unwrap().push((kind, error.clone()));
        }
    }

    /// Resolver whose zone contents are fixed per test.
    fn scripted_resolver(
        mx: Result<Vec<String>, LookupError>,
        domain_txt: Result<Vec<String>, LookupError>,
        dmarc_txt: Result<Vec<String>, LookupError>,
    ) -> MockDnsLookup {
        let mut resolver = MockDnsLookup::new();
        resolver
            .expect_mx_lookup()
            .returning(move |_| mx.clone());
        resolver
            .expect_txt_lookup()
            .withf(|name| name.starts_with("_dmarc."))
            .returning(move |_| dmarc_txt.clone());
        resolver
            .expect_txt_lookup()
            .withf(|name| !name.starts_with("_dmarc."))
            .returning(move |_| domain_txt.clone());
        resolver
    }

    #[tokio::test]
    async fn test_nonexistent_domain_yields_all_false() {
        let resolver = scripted_resolver(
            Err(no_records("nope.invalid")),
            Err(no_records("nope.invalid")),
            Err(no_records("_dmarc.nope.invalid")),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("nope.invalid").await;

        assert_eq!(result, VerificationResult::empty("nope.invalid"));
        assert_eq!(result.spf_record, "");
        assert_eq!(result.dmarc_record, "");
    }

    #[tokio::test]
    async fn test_fully_configured_domain() {
        let resolver = scripted_resolver(
            Ok(strings(&["mx1.example.com.", "mx2.example.com."])),
            Ok(strings(&["v=spf1 include:example.com ~all"])),
            Ok(strings(&["v=DMARC1; p=reject; rua=mailto:dmarc@example.com"])),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("example.com").await;

        assert_eq!(result.domain, "example.com");
        assert!(result.has_mx);
        assert!(result.has_spf);
        assert!(result.has_dmarc);
        assert_eq!(result.spf_record, "v=spf1 include:example.com ~all");
        assert_eq!(
            result.dmarc_record,
            "v=DMARC1; p=reject; rua=mailto:dmarc@example.com"
        );
    }

    #[tokio::test]
    async fn test_empty_mx_answer_is_not_mx() {
        let resolver = scripted_resolver(Ok(Vec::new()), Ok(Vec::new()), Ok(Vec::new()));
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("example.com").await;

        assert!(!result.has_mx);
        assert!(!result.has_spf);
        assert!(!result.has_dmarc);
    }

    #[tokio::test]
    async fn test_first_spf_record_wins_regardless_of_position() {
        let resolver = scripted_resolver(
            Ok(strings(&["mx.example.com."])),
            Ok(strings(&[
                "google-site-verification=abc123",
                "other=record",
                "v=spf1 include:_spf.example.com ~all",
                "v=spf1 -all",
            ])),
            Err(no_records("_dmarc.example.com")),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("example.com").await;

        assert!(result.has_spf);
        assert_eq!(result.spf_record, "v=spf1 include:_spf.example.com ~all");
    }

    #[tokio::test]
    async fn test_spf_before_other_records() {
        let resolver = scripted_resolver(
            Ok(Vec::new()),
            Ok(strings(&["v=spf1 mx -all", "other=record"])),
            Ok(Vec::new()),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("example.com").await;

        assert_eq!(result.spf_record, "v=spf1 mx -all");
    }

    #[tokio::test]
    async fn test_prefix_match_is_case_sensitive_and_anchored() {
        let resolver = scripted_resolver(
            Ok(Vec::new()),
            Ok(strings(&["V=SPF1 -all", " v=spf1 -all", "note: v=spf1"])),
            Ok(strings(&["v=dmarc1; p=none", "x v=DMARC1"])),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("example.com").await;

        assert!(!result.has_spf);
        assert!(!result.has_dmarc);
        assert_eq!(result.spf_record, "");
        assert_eq!(result.dmarc_record, "");
    }

    #[tokio::test]
    async fn test_dmarc_queries_prefixed_name() {
        let mut resolver = MockDnsLookup::new();
        resolver
            .expect_mx_lookup()
            .withf(|name| name == "example.org")
            .times(1)
            .returning(|_| Ok(Vec::new()));
        resolver
            .expect_txt_lookup()
            .withf(|name| name == "example.org")
            .times(1)
            .returning(|_| Ok(Vec::new()));
        resolver
            .expect_txt_lookup()
            .withf(|name| name == "_dmarc.example.org")
            .times(1)
            .returning(|_| Ok(strings(&["v=DMARC1; p=quarantine"])));
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("example.org").await;

        assert!(result.has_dmarc);
        assert_eq!(result.dmarc_record, "v=DMARC1; p=quarantine");
    }

    #[tokio::test]
    async fn test_dmarc_record_on_apex_is_ignored() {
        let resolver = scripted_resolver(
            Ok(Vec::new()),
            Ok(strings(&["v=DMARC1; p=reject"])),
            Err(no_records("_dmarc.example.com")),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("example.com").await;

        assert!(!result.has_dmarc);
        assert!(!result.has_spf);
    }

    #[tokio::test]
    async fn test_failures_do_not_short_circuit() {
        let resolver = scripted_resolver(
            Err(LookupError::Failed {
                name: "example.com".to_string(),
                reason: "request timed out".to_string(),
            }),
            Err(LookupError::Failed {
                name: "example.com".to_string(),
                reason: "request timed out".to_string(),
            }),
            Ok(strings(&["v=DMARC1; p=none"])),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = verifier.verify("example.com").await;

        assert!(!result.has_mx);
        assert!(!result.has_spf);
        assert!(result.has_dmarc);
        assert_eq!(result.dmarc_record, "v=DMARC1; p=none");
    }

    #[tokio::test]
    async fn test_each_failure_reported_once_with_its_kind() {
        let timeout = LookupError::Failed {
            name: "example.com".to_string(),
            reason: "request timed out".to_string(),
        };
        let resolver = scripted_resolver(
            Err(timeout.clone()),
            Ok(strings(&["v=spf1 -all"])),
            Err(no_records("_dmarc.example.com")),
        );
        let diagnostics = RecordingDiagnostics::default();
        let verifier = DomainVerifier::new(resolver, diagnostics.clone());

        verifier.verify("example.com").await;

        let seen = diagnostics.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (LookupKind::Mx, timeout),
                (LookupKind::Dmarc, no_records("_dmarc.example.com")),
            ]
        );
    }

    #[tokio::test]
    async fn test_successful_lookups_report_nothing() {
        let resolver = scripted_resolver(
            Ok(strings(&["mx.example.com."])),
            Ok(Vec::new()),
            Ok(Vec::new()),
        );
        let mut diagnostics = MockDiagnostics::new();
        diagnostics.expect_lookup_failed().never();
        let verifier = DomainVerifier::new(resolver, diagnostics);

        let result = verifier.verify("example.com").await;

        assert!(result.has_mx);
    }

    #[tokio::test]
    async fn test_spf_failure_reported_with_spf_kind() {
        let resolver = scripted_resolver(
            Ok(Vec::new()),
            Err(no_records("example.net")),
            Ok(Vec::new()),
        );
        let mut diagnostics = MockDiagnostics::new();
        diagnostics
            .expect_lookup_failed()
            .withf(|kind, error| {
                *kind == LookupKind::Spf && error.name() == "example.net"
            })
            .times(1)
            .return_const(());
        let verifier = DomainVerifier::new(resolver, diagnostics);

        verifier.verify("example.net").await;
    }

    #[tokio::test]
    async fn test_verify_is_idempotent() {
        let resolver = scripted_resolver(
            Ok(strings(&["mx.example.com."])),
            Ok(strings(&["other=record", "v=spf1 a mx ~all"])),
            Ok(strings(&["v=DMARC1; p=none"])),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let first = verifier.verify("example.com").await;
        let second = verifier.verify("example.com").await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_domain_echoed_verbatim() {
        let resolver = scripted_resolver(
            Err(no_records("Example.COM")),
            Err(no_records("Example.COM")),
            Err(no_records("_dmarc.Example.COM")),
        );
        let verifier = DomainVerifier::with_tracing(resolver);

        let result = verifier.verify("Example.COM").await;

        assert_eq!(result.domain, "Example.COM");
    }

    #[test]
    fn test_verify_from_blocking_context() {
        let resolver = scripted_resolver(
            Ok(strings(&["mx.example.com."])),
            Ok(Vec::new()),
            Ok(Vec::new()),
        );
        let verifier = DomainVerifier::new(resolver, SilentDiagnostics);

        let result = tokio_test::block_on(verifier.verify("example.com"));

        assert!(result.has_mx);
    }

    #[test]
    fn test_dmarc_name() {
        assert_eq!(dmarc_name("example.com"), "_dmarc.example.com");
        assert_eq!(dmarc_name("mail.example.co.uk"), "_dmarc.mail.example.co.uk");
    }

    #[test]
    fn test_first_with_prefix() {
        let records = strings(&["a=b", "v=spf1 first", "v=spf1 second"]);
        assert_eq!(
            first_with_prefix(records, SPF_PREFIX).as_deref(),
            Some("v=spf1 first")
        );
        assert_eq!(first_with_prefix(Vec::new(), SPF_PREFIX), None);
    }
}
