use std::fmt;
use tigerapi_core::{Charset, ClientConfig, SignType};
use tigerapi_signing::{parse_private_key, parse_public_key, RsaPrivateKey, RsaPublicKey, SignatureError};

/// Validated, parsed identity of one client.
///
/// Immutable once built; share it behind an `Arc` between clients and
/// tasks. Keys are parsed here so a bad key fails at construction rather
/// than on the first call.
#[derive(Clone)]
pub struct Credential {
    server_url: String,
    tiger_id: String,
    private_key: RsaPrivateKey,
    tiger_public_key: Option<RsaPublicKey>,
    sign_type: SignType,
    charset: Charset,
}

impl Credential {
    pub fn from_config(config: &ClientConfig) -> Result<Self, SignatureError> {
        let private_key = parse_private_key(&config.private_key)?;
        let tiger_public_key = config.public_key().map(parse_public_key).transpose()?;

        Ok(Self {
            server_url: config.server_url.clone(),
            tiger_id: config.tiger_id.clone(),
            private_key,
            tiger_public_key,
            sign_type: config.sign_type,
            charset: config.charset,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn tiger_id(&self) -> &str {
        &self.tiger_id
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// Gateway key used to check response signatures, if configured.
    pub fn tiger_public_key(&self) -> Option<&RsaPublicKey> {
        self.tiger_public_key.as_ref()
    }

    pub fn sign_type(&self) -> SignType {
        self.sign_type
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("server_url", &self.server_url)
            .field("tiger_id", &self.tiger_id)
            .field("private_key", &"<redacted>")
            .field("tiger_public_key", &self.tiger_public_key.is_some())
            .field("sign_type", &self.sign_type)
            .field("charset", &self.charset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_keys;

    #[test]
    fn test_from_config() {
        let config = test_keys::config("https://openapi.example.com/gateway", true);
        let credential = Credential::from_config(&config).unwrap();
        assert_eq!(credential.tiger_id(), "20150001");
        assert_eq!(credential.tiger_public_key(), Some(&test_keys::gateway_public_key()));
        assert_eq!(credential.sign_type(), SignType::Rsa);
    }

    #[test]
    fn test_public_key_optional() {
        let config = test_keys::config("https://openapi.example.com/gateway", false);
        let credential = Credential::from_config(&config).unwrap();
        assert!(credential.tiger_public_key().is_none());
    }

    #[test]
    fn test_bad_keys_fail_early() {
        let mut config = test_keys::config("https://openapi.example.com/gateway", true);
        config.tiger_public_key = Some("bm90IGEga2V5".to_string());
        assert!(Credential::from_config(&config).is_err());

        let mut config = test_keys::config("https://openapi.example.com/gateway", false);
        config.private_key = "bm90IGEga2V5".to_string();
        assert!(Credential::from_config(&config).is_err());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = test_keys::config("https://openapi.example.com/gateway", true);
        let credential = Credential::from_config(&config).unwrap();
        let text = format!("{:?}", credential);
        assert!(text.contains("<redacted>"));
        assert!(!text.contains("primes"));
    }
}
