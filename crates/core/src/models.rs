use chrono::Local;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Wire field names
// ---------------------------------------------------------------------------

pub const METHOD: &str = "method";
pub const VERSION: &str = "version";
pub const TIGER_ID: &str = "tiger_id";
pub const SIGN_TYPE: &str = "sign_type";
pub const CHARSET: &str = "charset";
pub const TIMESTAMP: &str = "timestamp";
pub const BIZ_CONTENT: &str = "biz_content";
pub const SIGN: &str = "sign";

/// Content type of every request body sent to the gateway.
pub const CONTENT_TYPE_JSON: &str = "application/json;charset=UTF-8";

/// API version used when a request does not set one.
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Format of the `timestamp` field (local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Signature metadata
// ---------------------------------------------------------------------------

/// Signature algorithm announced in the `sign_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignType {
    /// RSA PKCS#1 v1.5 over SHA-1.
    #[default]
    #[serde(rename = "RSA")]
    Rsa,
    /// RSA PKCS#1 v1.5 over SHA-256.
    #[serde(rename = "RSA2")]
    Rsa2,
}

impl SignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Rsa => "RSA",
            SignType::Rsa2 => "RSA2",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RSA" => Ok(SignType::Rsa),
            "RSA2" => Ok(SignType::Rsa2),
            other => Err(format!("Unsupported sign type: {}", other)),
        }
    }
}

/// Character encoding of signed content, announced in the `charset` field.
///
/// Only UTF-8 is supported; Rust strings are already UTF-8 so encoding
/// signed content is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    #[serde(rename = "UTF-8")]
    Utf8,
}

impl Charset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
        }
    }

    /// Encode text into the bytes that get signed.
    pub fn encode<'a>(&self, content: &'a str) -> &'a [u8] {
        match self {
            Charset::Utf8 => content.as_bytes(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UTF-8" => Ok(Charset::Utf8),
            other => Err(format!("Unsupported charset: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound request
// ---------------------------------------------------------------------------

/// A single API call as the caller describes it.
///
/// The business payload is carried as opaque JSON text and is signed
/// verbatim; nothing here interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub method: String,
    pub version: String,
    /// Stamped at construction, `YYYY-MM-DD HH:MM:SS` local time.
    pub timestamp: String,
    pub biz_content: Option<String>,
}

impl OutboundRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            version: DEFAULT_API_VERSION.to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            biz_content: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Serialize a business payload into the `biz_content` slot.
    pub fn with_biz_content<T: Serialize>(mut self, payload: &T) -> Result<Self, serde_json::Error> {
        self.biz_content = Some(serde_json::to_string(payload)?);
        Ok(self)
    }

    /// Use already-serialized payload text as-is.
    pub fn with_raw_biz_content(mut self, payload: impl Into<String>) -> Self {
        self.biz_content = Some(payload.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Inbound response
// ---------------------------------------------------------------------------

/// Response envelope returned by the gateway.
///
/// A non-zero `code` is the server reporting a business failure; it is
/// still a well-formed response and is handed back to the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InboundResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub sign: Option<String>,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl InboundResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Decode the opaque payload into a caller-chosen type.
    ///
    /// Returns `Ok(None)` when the response carries no payload.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.data {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some),
        }
    }
}
