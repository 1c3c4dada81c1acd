use crate::verification::ResolverSettings;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime settings, read from the environment (and `.env` when present).
///
/// | Variable | Default |
/// |---|---|
/// | `HOST` | `0.0.0.0` |
/// | `PORT` | `8080` |
/// | `TEMPLATES_DIR` | `templates` |
/// | `STATIC_DIR` | `static` |
/// | `DNS_TIMEOUT_SECS` | resolver default |
/// | `DNS_ATTEMPTS` | resolver default |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    pub resolver: ResolverSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            resolver: ResolverSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(value) => parse("PORT", "a port number", value)?,
            None => defaults.port,
        };

        let timeout = get("DNS_TIMEOUT_SECS")
            .map(|value| parse::<u64>("DNS_TIMEOUT_SECS", "a whole number of seconds", value))
            .transpose()?
            .map(Duration::from_secs);

        let attempts = get("DNS_ATTEMPTS")
            .map(|value| parse::<usize>("DNS_ATTEMPTS", "a positive integer", value))
            .transpose()?;
        if let Some(0) = attempts {
            return Err(ConfigError::Invalid {
                var: "DNS_ATTEMPTS",
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            templates_dir: get("TEMPLATES_DIR").map(PathBuf::from).unwrap_or(defaults.templates_dir),
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            resolver: ResolverSettings { timeout, attempts },
        })
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    expected: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { var, expected, value })
}
