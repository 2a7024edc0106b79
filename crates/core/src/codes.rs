use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-side result codes. Every failed `execute` carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiCode {
    /// The request had no method name; nothing was sent.
    MethodNameError,
    /// The gateway did not answer within the configured timeouts.
    ReadTimeOut,
    /// Transport, parse, signing, or any other unclassified failure.
    ClientApiError,
    /// The response signature did not verify against the gateway key.
    SignCheckFailed,
}

impl ApiCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiCode::MethodNameError => "METHOD_NAME_ERROR",
            ApiCode::ReadTimeOut => "READ_TIME_OUT",
            ApiCode::ClientApiError => "CLIENT_API_ERROR",
            ApiCode::SignCheckFailed => "SIGN_CHECK_FAILED",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ApiCode::MethodNameError => "method name is empty",
            ApiCode::ReadTimeOut => "read time out",
            ApiCode::ClientApiError => "client api error",
            ApiCode::SignCheckFailed => "response sign check failed",
        }
    }
}

impl fmt::Display for ApiCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: ApiCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ApiCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    pub fn with_message(code: ApiCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ApiCode> for ApiError {
    fn from(code: ApiCode) -> Self {
        ApiError::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_names_are_stable() {
        assert_eq!(ApiCode::MethodNameError.as_str(), "METHOD_NAME_ERROR");
        assert_eq!(ApiCode::ReadTimeOut.as_str(), "READ_TIME_OUT");
        assert_eq!(ApiCode::ClientApiError.as_str(), "CLIENT_API_ERROR");
        assert_eq!(ApiCode::SignCheckFailed.as_str(), "SIGN_CHECK_FAILED");
        assert_eq!(
            serde_json::to_string(&ApiCode::SignCheckFailed).unwrap(),
            "\"SIGN_CHECK_FAILED\""
        );
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::with_message(ApiCode::ClientApiError, "connection refused");
        assert_eq!(err.to_string(), "CLIENT_API_ERROR: connection refused");

        let err: ApiError = ApiCode::ReadTimeOut.into();
        assert_eq!(err.message, "read time out");
    }
}
