use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    system_conf,
};

#[cfg(test)]
use mockall::automock;

/// Why a lookup produced no usable answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// NXDOMAIN, or the name exists but carries no record of the queried type.
    #[error("no records found for {name}")]
    NoRecords { name: String },

    /// Timeout, transport or protocol failure, unparseable name.
    #[error("lookup for {name} failed: {reason}")]
    Failed { name: String, reason: String },
}

impl LookupError {
    pub fn name(&self) -> &str {
        match self {
            LookupError::NoRecords { name } | LookupError::Failed { name, .. } => name,
        }
    }

    fn from_resolve(name: &str, err: ResolveError) -> Self {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => LookupError::NoRecords {
                name: name.to_string(),
            },
            _ => LookupError::Failed {
                name: name.to_string(),
                reason: err.to_string(),
            },
        }
    }
}

/// The two record lookups domain verification needs.
///
/// Implementations must be shareable across request handlers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// Exchange host names of the MX records published at `name`.
    async fn mx_lookup(&self, name: &str) -> Result<Vec<String>, LookupError>;

    /// Text of every TXT record published at `name`, in answer order.
    async fn txt_lookup(&self, name: &str) -> Result<Vec<String>, LookupError>;
}

/// Resolver overrides. `None` keeps the value from the system configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverSettings {
    pub timeout: Option<Duration>,
    pub attempts: Option<usize>,
}

/// [`DnsLookup`] backed by the host's configured name servers.
#[derive(Clone)]
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
}

impl SystemResolver {
    /// Builds a resolver from `/etc/resolv.conf` (or the platform equivalent).
    ///
    /// Falls back to the library's default upstreams when the system
    /// configuration cannot be read.
    pub fn new(settings: ResolverSettings) -> Self {
        let (config, mut opts) = match system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read system resolver configuration, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };

        apply_settings(&mut opts, settings);

        tracing::debug!(
            nameservers = config.name_servers().len(),
            timeout = ?opts.timeout,
            attempts = opts.attempts,
            "DNS resolver configured"
        );

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

#[async_trait]
impl DnsLookup for SystemResolver {
    async fn mx_lookup(&self, name: &str) -> Result<Vec<String>, LookupError> {
        let lookup = self
            .resolver
            .mx_lookup(name)
            .await
            .map_err(|e| LookupError::from_resolve(name, e))?;

        Ok(lookup.iter().map(|mx| mx.exchange().to_utf8()).collect())
    }

    async fn txt_lookup(&self, name: &str) -> Result<Vec<String>, LookupError> {
        let lookup = self
            .resolver
            .txt_lookup(name)
            .await
            .map_err(|e| LookupError::from_resolve(name, e))?;

        Ok(lookup
            .iter()
            .map(|txt| join_character_strings(txt.txt_data()))
            .collect())
    }
}

/// Overlays configured overrides on the resolver options.
fn apply_settings(opts: &mut ResolverOpts, settings: ResolverSettings) {
    if let Some(timeout) = settings.timeout {
        opts.timeout = timeout;
    }
    if let Some(attempts) = settings.attempts {
        opts.attempts = attempts;
    }
}

/// A TXT record may be split into several character-strings; they are
/// presented as one string with no separator.
fn join_character_strings(parts: &[Box<[u8]>]) -> String {
    parts
        .iter()
        .map(|bytes| String::from_utf8_lossy(bytes))
        .collect()
}
