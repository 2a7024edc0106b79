use crate::keys::{parse_private_key, parse_public_key};
use crate::SignatureError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tigerapi_core::{Charset, SignType};

/// Hash `content` and pick the matching PKCS#1 v1.5 scheme.
fn digest(content: &str, sign_type: SignType, charset: Charset) -> (Vec<u8>, Pkcs1v15Sign) {
    let bytes = charset.encode(content);
    match sign_type {
        SignType::Rsa => (Sha1::digest(bytes).to_vec(), Pkcs1v15Sign::new::<Sha1>()),
        SignType::Rsa2 => (Sha256::digest(bytes).to_vec(), Pkcs1v15Sign::new::<Sha256>()),
    }
}

/// Sign `content` and return the signature as standard base64.
pub fn sign(
    content: &str,
    key: &RsaPrivateKey,
    sign_type: SignType,
    charset: Charset,
) -> Result<String, SignatureError> {
    let (hashed, scheme) = digest(content, sign_type, charset);
    let signature = key
        .sign(scheme, &hashed)
        .map_err(|e| SignatureError::Signing(e.to_string()))?;
    Ok(STANDARD.encode(signature))
}

/// Check a base64 signature over `content`.
///
/// Never fails: a malformed signature is simply a mismatch.
pub fn verify(
    content: &str,
    signature: &str,
    key: &RsaPublicKey,
    sign_type: SignType,
    charset: Charset,
) -> bool {
    let Ok(raw) = STANDARD.decode(signature.trim().as_bytes()) else {
        return false;
    };
    let (hashed, scheme) = digest(content, sign_type, charset);
    key.verify(scheme, &hashed, &raw).is_ok()
}

/// Sign with a key given as text. A key that will not parse is a signing
/// failure.
pub fn sign_with_key_text(
    content: &str,
    private_key: &str,
    sign_type: SignType,
    charset: Charset,
) -> Result<String, SignatureError> {
    let key = parse_private_key(private_key)
        .map_err(|e| SignatureError::Signing(format!("Malformed private key: {}", e)))?;
    sign(content, &key, sign_type, charset)
}

/// Verify with a key given as text. Only an unparsable key is an error.
pub fn verify_with_key_text(
    content: &str,
    signature: &str,
    public_key: &str,
    sign_type: SignType,
    charset: Charset,
) -> Result<bool, SignatureError> {
    let key = parse_public_key(public_key)?;
    Ok(verify(content, signature, &key, sign_type, charset))
}
