use crate::credential::Credential;
use crate::envelope::{self, BuildError};
use crate::http::HttpTransport;
use std::path::Path;
use std::sync::Arc;
use tigerapi_core::*;
use tigerapi_signing::{verify, SignatureError};
use tracing::{debug, error};

/// Errors that can occur while constructing a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Key(#[from] SignatureError),
    #[error("Transport setup failed: {0}")]
    Transport(#[from] TransportError),
}

/// Signed-request client for the gateway.
///
/// Each [`execute`](TigerClient::execute) runs build, send, parse and verify
/// in sequence on the caller's task and keeps nothing between calls, so one
/// client can be shared across tasks freely.
pub struct TigerClient {
    credential: Arc<Credential>,
    transport: Arc<dyn Transport>,
}

impl TigerClient {
    /// Build a client with the reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let credential = Credential::from_config(&config)?;
        let transport = HttpTransport::new(config.connect_timeout(), config.read_timeout())?;
        Ok(Self::with_transport(Arc::new(credential), Arc::new(transport)))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_file(path)?)
    }

    pub fn with_transport(credential: Arc<Credential>, transport: Arc<dyn Transport>) -> Self {
        Self {
            credential,
            transport,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Perform one signed call.
    ///
    /// `Ok(None)` means the gateway answered with an empty body. A response
    /// is only returned once its signature has been checked, or when
    /// checking is skipped because no gateway key is configured or the
    /// response is unsigned.
    pub async fn execute(&self, request: &OutboundRequest) -> Result<Option<InboundResponse>, ApiError> {
        let result = self.run(request).await;
        if let Err(e) = &result {
            error!(method = %request.method, code = %e.code, "Client execute failed: {}", e.message);
        }
        result
    }

    async fn run(&self, request: &OutboundRequest) -> Result<Option<InboundResponse>, ApiError> {
        // BUILD
        let signed = envelope::build(request, &self.credential).map_err(|e| match e {
            BuildError::InvalidRequest(_) => ApiError::new(ApiCode::MethodNameError),
            BuildError::Signing(e) => ApiError::with_message(ApiCode::ClientApiError, e.to_string()),
        })?;
        let body = signed
            .to_json()
            .map_err(|e| ApiError::with_message(ApiCode::ClientApiError, e.to_string()))?;

        // SEND
        debug!(method = %request.method, url = %self.credential.server_url(), "Posting signed request");
        let raw = match self
            .transport
            .post(self.credential.server_url(), CONTENT_TYPE_JSON, body)
            .await
        {
            Ok(Some(raw)) if !raw.iter().all(u8::is_ascii_whitespace) => raw,
            Ok(_) => {
                debug!(method = %request.method, "Empty response body");
                return Ok(None);
            }
            Err(TransportError::Timeout) => return Err(ApiError::new(ApiCode::ReadTimeOut)),
            Err(TransportError::Http(msg)) => {
                return Err(ApiError::with_message(ApiCode::ClientApiError, msg))
            }
        };

        // PARSE
        let response: InboundResponse = serde_json::from_slice(&raw).map_err(|e| {
            ApiError::with_message(ApiCode::ClientApiError, format!("Malformed response: {}", e))
        })?;

        // VERIFY
        self.check_sign(request, &response)?;
        Ok(Some(response))
    }

    /// The gateway signs the timestamp of the request it is answering, not
    /// the response body, so the check binds the answer to the call but not
    /// to its payload.
    fn check_sign(&self, request: &OutboundRequest, response: &InboundResponse) -> Result<(), ApiError> {
        let Some(public_key) = self.credential.tiger_public_key() else {
            debug!("No gateway public key configured, skipping sign check");
            return Ok(());
        };
        let Some(sign) = response.sign.as_deref() else {
            debug!("Response is unsigned, skipping sign check");
            return Ok(());
        };

        if verify(
            &request.timestamp,
            sign,
            public_key,
            self.credential.sign_type(),
            self.credential.charset(),
        ) {
            Ok(())
        } else {
            Err(ApiError::new(ApiCode::SignCheckFailed))
        }
    }
}
