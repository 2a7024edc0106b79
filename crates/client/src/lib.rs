//! Signed-request client for the Tiger OpenAPI gateway.
//!
//! A call is a JSON envelope of fixed protocol fields plus an opaque
//! `biz_content` payload, signed with the client's RSA key. Responses may be
//! signed by the gateway and are checked against its public key when one is
//! configured.
//!
//! No process-wide TLS or crypto policy is touched here. To customize trust
//! (root certificates, legacy algorithms), build a `reqwest::Client`
//! yourself and hand it to [`HttpTransport::with_client`] before
//! constructing the [`TigerClient`].

pub mod client;
pub mod credential;
pub mod envelope;
pub mod http;

pub use client::{ClientError, TigerClient};
pub use credential::Credential;
pub use envelope::{build, BuildError, Envelope, SignedEnvelope};
pub use http::HttpTransport;
