use crate::models::{Charset, SignType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Errors raised while loading or validating a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to construct a client.
///
/// Loadable from TOML; omitted fields fall back to the gateway defaults.
///
/// ```toml
/// server_url = "https://openapi.tigerfintech.com/gateway"
/// tiger_id = "20150001"
/// private_key = "MIICdgIBADANBgkqhkiG9w0BAQEFAASC..."
/// tiger_public_key = "MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCB..."
/// read_timeout_ms = 20000
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: String,
    /// Client identity sent as `tiger_id`.
    pub tiger_id: String,
    /// RSA private key, PEM or bare base64 DER.
    pub private_key: String,
    /// Gateway public key. When absent, response signatures are not checked.
    #[serde(default)]
    pub tiger_public_key: Option<String>,
    #[serde(default)]
    pub sign_type: SignType,
    #[serde(default)]
    pub charset: Charset,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_read_timeout_ms() -> u64 {
    15_000
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("tiger_id", &self.tiger_id)
            .field("private_key", &"<redacted>")
            .field("tiger_public_key", &self.tiger_public_key)
            .field("sign_type", &self.sign_type)
            .field("charset", &self.charset)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("read_timeout_ms", &self.read_timeout_ms)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        server_url: impl Into<String>,
        tiger_id: impl Into<String>,
        private_key: impl Into<String>,
        tiger_public_key: Option<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            tiger_id: tiger_id.into(),
            private_key: private_key.into(),
            tiger_public_key,
            sign_type: SignType::default(),
            charset: Charset::default(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded client config");
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::Invalid("server_url is empty".to_string()));
        }
        if self.tiger_id.trim().is_empty() {
            return Err(ConfigError::Invalid("tiger_id is empty".to_string()));
        }
        if self.private_key.trim().is_empty() {
            return Err(ConfigError::Invalid("private_key is empty".to_string()));
        }
        Ok(())
    }

    /// The gateway public key, with an empty string treated as absent.
    pub fn public_key(&self) -> Option<&str> {
        self.tiger_public_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
