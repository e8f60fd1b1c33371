//! Client configuration

use crate::{Result, SbpError};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Mutual TLS material presented to the bank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Client certificate (PEM)
    pub client_cert_path: PathBuf,
    /// Private key matching the client certificate (PEM)
    pub client_key_path: PathBuf,
    /// CA bundle used to verify the server (PEM)
    pub ca_path: Option<PathBuf>,
}

impl TlsConfig {
    /// Create a new TLS config from the client certificate and key paths
    pub fn new(client_cert_path: impl Into<PathBuf>, client_key_path: impl Into<PathBuf>) -> Self {
        Self {
            client_cert_path: client_cert_path.into(),
            client_key_path: client_key_path.into(),
            ca_path: None,
        }
    }

    /// Set the CA bundle
    pub fn with_ca(mut self, ca_path: impl Into<PathBuf>) -> Self {
        self.ca_path = Some(ca_path.into());
        self
    }
}

/// Connection parameters for [`crate::SbpClient`]
///
/// Immutable once the client is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash
    pub base_url: String,
    /// Terminal identifier sent as `TermNo`
    pub term_no: String,
    /// Certificate alias sent in the `key-name` header
    pub cert_alias: String,
    /// PEM file holding the RSA signing key
    pub signing_key_path: PathBuf,
    /// Certificate matching the signing key. Not used at runtime.
    pub signing_cert_path: Option<PathBuf>,
    /// Mutual TLS material
    pub tls: Option<TlsConfig>,
    /// Skip server certificate verification. Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new client config
    pub fn new(
        base_url: impl Into<String>,
        term_no: impl Into<String>,
        cert_alias: impl Into<String>,
        signing_key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            term_no: term_no.into(),
            cert_alias: cert_alias.into(),
            signing_key_path: signing_key_path.into(),
            signing_cert_path: None,
            tls: None,
            accept_invalid_certs: false,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Build a config from `SBP_*` environment variables
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SbpError::config(format!("Missing environment variable {name}")))
        };
        let optional = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        let mut config = Self::new(
            required("SBP_BASE_URL")?,
            required("SBP_TERM_NO")?,
            required("SBP_CERT_ALIAS")?,
            required("SBP_SIGNING_KEY")?,
        );

        if let Some(path) = optional("SBP_SIGNING_CERT") {
            config = config.with_signing_cert(path);
        }

        match (optional("SBP_TLS_CERT"), optional("SBP_TLS_KEY")) {
            (Some(cert), Some(key)) => {
                let mut tls = TlsConfig::new(cert, key);
                if let Some(ca) = optional("SBP_TLS_CA") {
                    tls = tls.with_ca(ca);
                }
                config = config.with_tls(tls);
            }
            (None, None) => {}
            _ => {
                return Err(SbpError::config(
                    "SBP_TLS_CERT and SBP_TLS_KEY must be set together",
                ))
            }
        }

        if let Some(flag) = optional("SBP_ACCEPT_INVALID_CERTS") {
            config.accept_invalid_certs = parse_flag(&flag)?;
        }

        if let Some(secs) = optional("SBP_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| SbpError::config(format!("Invalid SBP_TIMEOUT_SECS: {secs}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(SbpError::config("Base URL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(SbpError::config(
                "Base URL must start with http:// or https://",
            ));
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| SbpError::config(format!("Invalid base URL: {e}")))?;

        if self.term_no.trim().is_empty() {
            return Err(SbpError::config("TermNo cannot be empty"));
        }

        if self.cert_alias.trim().is_empty() {
            return Err(SbpError::config("Certificate alias cannot be empty"));
        }

        Ok(())
    }

    /// Set the signing certificate path
    pub fn with_signing_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.signing_cert_path = Some(path.into());
        self
    }

    /// Set the mutual TLS material
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Disable server certificate verification.
    ///
    /// Only meant for test stands with self-signed certificates.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Remove the per-request timeout
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Full URL for a path suffix
    pub fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{}", self.base_url, suffix.trim_start_matches('/'))
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SbpError::config(format!("Invalid boolean flag: {other}"))),
    }
}
