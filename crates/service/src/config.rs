//! Configuration loading and validation for the service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{aead::KEY_LEN, EncryptionAlgorithm};

/// Secret key bytes read from the environment.
///
/// Never printed, not even in debug builds, and overwritten with zeroes on drop.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(from = "String")]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl From<String> for SecretBytes {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretBytes([REDACTED])")
    }
}

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HMAC-SHA256 key. **Required.**
    pub signing_key: SecretBytes,

    /// Value-encryption strategy: `base64` or `aes-256-gcm`.
    #[serde(default = "default_encryption_strategy")]
    pub encryption_strategy: EncryptionAlgorithm,

    /// AES-256-GCM key, exactly 32 bytes. Required for `aes-256-gcm`.
    #[serde(default)]
    pub encryption_key: Option<SecretBytes>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Requests per second allowed from a single client IP.
    #[serde(default = "default_rate_limit_per_second")]
    pub rate_limit_per_second: u32,

    /// Per-request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP collector endpoint. Spans are not exported when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_encryption_strategy() -> EncryptionAlgorithm {
    EncryptionAlgorithm::Base64
}
fn default_listen_port() -> u16 {
    8022
}
fn default_rate_limit_per_second() -> u32 {
    1000
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::default())
    }

    fn load(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.signing_key.expose().is_empty() {
            anyhow::bail!("SIGNING_KEY is required and must not be empty");
        }

        if self.encryption_strategy == EncryptionAlgorithm::Aes256Gcm {
            let len = self
                .encryption_key
                .as_ref()
                .map(|k| k.expose().len())
                .context("ENCRYPTION_KEY is required when ENCRYPTION_STRATEGY=aes-256-gcm")?;
            if len != KEY_LEN {
                anyhow::bail!("ENCRYPTION_KEY must be exactly {KEY_LEN} bytes, got {len}");
            }
        }

        if self.rate_limit_per_second == 0 {
            anyhow::bail!("RATE_LIMIT_PER_SECOND must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}
