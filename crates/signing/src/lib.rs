//! Request signing and response verification.
//!
//! The gateway authenticates a call by an RSA signature over the canonical
//! form of its parameters, and may sign its answers with its own key.
//! Signer and verifier must agree on the canonical text byte for byte.

pub mod canonical;
pub mod keys;
pub mod signature;

pub use canonical::canonicalize;
pub use keys::{parse_private_key, parse_public_key};
pub use rsa::{RsaPrivateKey, RsaPublicKey};
pub use signature::{sign, sign_with_key_text, verify, verify_with_key_text};

/// Errors raised by key handling and signing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Key error: {0}")]
    Key(String),
    #[error("Signing error: {0}")]
    Signing(String),
    #[error("Key encoding error: {0}")]
    Encoding(String),
}

#[cfg(test)]
pub(crate) mod test_keys {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use std::sync::OnceLock;

    static PRIMARY: OnceLock<RsaPrivateKey> = OnceLock::new();
    static OTHER: OnceLock<RsaPrivateKey> = OnceLock::new();

    fn generate() -> RsaPrivateKey {
        RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap()
    }

    pub fn private_key() -> &'static RsaPrivateKey {
        PRIMARY.get_or_init(generate)
    }

    pub fn other_private_key() -> &'static RsaPrivateKey {
        OTHER.get_or_init(generate)
    }

    /// Primary keypair as bare base64 DER (PKCS#8 private, SPKI public).
    pub fn encoded_pair() -> (String, String) {
        let private = private_key();
        let public = RsaPublicKey::from(private);
        (
            STANDARD.encode(private.to_pkcs8_der().unwrap().as_bytes()),
            STANDARD.encode(public.to_public_key_der().unwrap().as_bytes()),
        )
    }
}
