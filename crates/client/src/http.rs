use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tigerapi_core::{Transport, TransportError};
use tracing::debug;

/// reqwest-backed [`Transport`].
///
/// Exactly one POST per call. The connect timeout lives on the underlying
/// client; the read timeout is applied to each request.
pub struct HttpTransport {
    client: reqwest::Client,
    read_timeout: Duration,
}

impl HttpTransport {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            read_timeout,
        })
    }

    /// Use a client the caller has already configured (root store, proxy,
    /// trust policy). Its own connect timeout applies.
    pub fn with_client(client: reqwest::Client, read_timeout: Duration) -> Self {
        Self {
            client,
            read_timeout,
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<Option<Vec<u8>>, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .timeout(self.read_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http(format!("Gateway returned HTTP {}", status)));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        debug!(status = %status, len = bytes.len(), "Gateway responded");

        if bytes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(bytes.to_vec()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tigerapi_core::CONTENT_TYPE_JSON;
    use tokio::net::TcpListener;

    fn transport(read_timeout_ms: u64) -> HttpTransport {
        HttpTransport::new(Duration::from_secs(2), Duration::from_millis(read_timeout_ms)).unwrap()
    }

    #[tokio::test]
    async fn test_posts_body_and_returns_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/gateway")
            .match_header("content-type", CONTENT_TYPE_JSON)
            .match_body(r#"{"method":"orders"}"#)
            .with_status(200)
            .with_body(r#"{"code":0}"#)
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/gateway", server.url());
        let body = transport(2000)
            .post(&url, CONTENT_TYPE_JSON, r#"{"method":"orders"}"#.to_string())
            .await
            .unwrap();

        assert_eq!(body.as_deref(), Some(&br#"{"code":0}"#[..]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_body_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .create_async()
            .await;

        let body = transport(2000)
            .post(&server.url(), CONTENT_TYPE_JSON, "{}".to_string())
            .await
            .unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let result = transport(2000)
            .post(&server.url(), CONTENT_TYPE_JSON, "{}".to_string())
            .await;
        match result {
            Err(TransportError::Http(msg)) => assert!(msg.contains("502")),
            other => panic!("Expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering.
        let _server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let result = transport(200)
            .post(&format!("http://{}/", addr), CONTENT_TYPE_JSON, "{}".to_string())
            .await;
        assert_eq!(result, Err(TransportError::Timeout));
    }

    #[tokio::test]
    async fn test_refused_connection_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = transport(2000)
            .post(&format!("http://{}/", addr), CONTENT_TYPE_JSON, "{}".to_string())
            .await;
        assert!(matches!(result, Err(TransportError::Http(_))));
    }
}
