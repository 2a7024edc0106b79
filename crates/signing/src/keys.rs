use crate::SignatureError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Parse an RSA private key.
///
/// Accepts PEM (`PRIVATE KEY` or `RSA PRIVATE KEY`) or the bare base64 DER
/// body of either, which is how gateway consoles usually hand keys out.
pub fn parse_private_key(text: &str) -> Result<RsaPrivateKey, SignatureError> {
    let text = text.trim();
    if text.starts_with("-----BEGIN") {
        return if text.contains("RSA PRIVATE KEY") {
            RsaPrivateKey::from_pkcs1_pem(text).map_err(|e| SignatureError::Key(e.to_string()))
        } else {
            RsaPrivateKey::from_pkcs8_pem(text).map_err(|e| SignatureError::Key(e.to_string()))
        };
    }

    let der = decode_der(text)?;
    RsaPrivateKey::from_pkcs8_der(&der)
        .or_else(|_| RsaPrivateKey::from_pkcs1_der(&der))
        .map_err(|e| SignatureError::Key(format!("Unrecognized private key: {}", e)))
}

/// Parse an RSA public key.
///
/// Accepts PEM (`PUBLIC KEY` or `RSA PUBLIC KEY`) or the bare base64 DER
/// body of either.
pub fn parse_public_key(text: &str) -> Result<RsaPublicKey, SignatureError> {
    let text = text.trim();
    if text.starts_with("-----BEGIN") {
        return if text.contains("RSA PUBLIC KEY") {
            RsaPublicKey::from_pkcs1_pem(text).map_err(|e| SignatureError::Key(e.to_string()))
        } else {
            RsaPublicKey::from_public_key_pem(text).map_err(|e| SignatureError::Key(e.to_string()))
        };
    }

    let der = decode_der(text)?;
    RsaPublicKey::from_public_key_der(&der)
        .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
        .map_err(|e| SignatureError::Key(format!("Unrecognized public key: {}", e)))
}

fn decode_der(text: &str) -> Result<Vec<u8>, SignatureError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(SignatureError::Key("Key is empty".to_string()));
    }
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| SignatureError::Encoding(e.to_string()))
}
