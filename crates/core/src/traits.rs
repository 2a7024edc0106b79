use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Transport Trait
// ---------------------------------------------------------------------------

/// Errors that can occur during a single HTTP round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP error: {0}")]
    Http(String),
}

/// The seam to the HTTP layer.
///
/// Any client satisfying this contract is interchangeable: one POST, one
/// response, no retries. Connect and read timeouts are configuration the
/// implementation receives when it is built and must enforce, reporting
/// expiry as [`TransportError::Timeout`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `url`.
    ///
    /// Returns `Ok(None)` when the gateway answers with an empty body.
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<Option<Vec<u8>>, TransportError>;
}
