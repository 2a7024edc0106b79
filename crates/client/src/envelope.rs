use crate::credential::Credential;
use serde::Serialize;
use tigerapi_core::*;
use tigerapi_signing::{canonicalize, sign, SignatureError};

/// Errors that can occur while building a signed envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Signing(#[from] SignatureError),
}

/// The protocol fields of one call, before signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub method: String,
    pub version: String,
    pub tiger_id: String,
    pub sign_type: SignType,
    pub charset: Charset,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biz_content: Option<String>,
}

impl Envelope {
    /// Every signed field as `(wire name, value)`.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            (METHOD, self.method.as_str()),
            (VERSION, self.version.as_str()),
            (TIGER_ID, self.tiger_id.as_str()),
            (SIGN_TYPE, self.sign_type.as_str()),
            (CHARSET, self.charset.as_str()),
            (TIMESTAMP, self.timestamp.as_str()),
            (BIZ_CONTENT, self.biz_content.as_deref().unwrap_or("")),
        ]
    }

    /// The exact text the signature covers.
    pub fn canonical(&self) -> String {
        canonicalize(self.fields())
    }

    /// Seal the envelope. Consumes it, so nothing can change after signing.
    pub fn sign(self, credential: &Credential) -> Result<SignedEnvelope, SignatureError> {
        let signature = sign(
            &self.canonical(),
            credential.private_key(),
            credential.sign_type(),
            credential.charset(),
        )?;
        Ok(SignedEnvelope {
            envelope: self,
            sign: signature,
        })
    }
}

/// A sealed envelope, ready to serialize as the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedEnvelope {
    #[serde(flatten)]
    envelope: Envelope,
    sign: String,
}

impl SignedEnvelope {
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn signature(&self) -> &str {
        &self.sign
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Assemble and sign the parameter set for `request`. Pure; no I/O.
pub fn build(request: &OutboundRequest, credential: &Credential) -> Result<SignedEnvelope, BuildError> {
    if request.method.trim().is_empty() {
        return Err(BuildError::InvalidRequest("method name is empty".to_string()));
    }

    let envelope = Envelope {
        method: request.method.clone(),
        version: request.version.clone(),
        tiger_id: credential.tiger_id().to_string(),
        sign_type: credential.sign_type(),
        charset: credential.charset(),
        timestamp: request.timestamp.clone(),
        biz_content: request.biz_content.clone(),
    };
    envelope.sign(credential).map_err(BuildError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_keys;
    use tigerapi_signing::{verify, RsaPublicKey};

    fn credential() -> Credential {
        Credential::from_config(&test_keys::config("https://openapi.example.com/gateway", true)).unwrap()
    }

    fn request() -> OutboundRequest {
        OutboundRequest::new("place_order")
            .with_timestamp("2024-03-01 09:30:00")
            .with_raw_biz_content(r#"{"account":"DU575569","symbol":"AAPL","action":"BUY"}"#)
    }

    #[test]
    fn test_empty_method_rejected() {
        let credential = credential();
        for method in ["", "   "] {
            let mut req = request();
            req.method = method.to_string();
            assert!(matches!(build(&req, &credential), Err(BuildError::InvalidRequest(_))));
        }
    }

    #[test]
    fn test_fixed_fields_populated() {
        let signed = build(&request(), &credential()).unwrap();
        let env = signed.envelope();
        assert_eq!(env.method, "place_order");
        assert_eq!(env.version, "1.0");
        assert_eq!(env.tiger_id, "20150001");
        assert_eq!(env.sign_type, SignType::Rsa);
        assert_eq!(env.charset, Charset::Utf8);
        assert_eq!(env.timestamp, "2024-03-01 09:30:00");
    }

    #[test]
    fn test_signature_covers_canonical_form() {
        let signed = build(&request(), &credential()).unwrap();
        let client_public = RsaPublicKey::from(test_keys::client_private_key());

        let canonical = signed.envelope().canonical();
        assert!(canonical.starts_with("biz_content="));
        assert!(verify(&canonical, signed.signature(), &client_public, SignType::Rsa, Charset::Utf8));
    }

    #[test]
    fn test_changing_a_field_breaks_signature() {
        let signed = build(&request(), &credential()).unwrap();
        let client_public = RsaPublicKey::from(test_keys::client_private_key());

        let mut altered = signed.envelope().clone();
        altered.timestamp = "2024-03-01 09:30:01".to_string();
        assert!(!verify(&altered.canonical(), signed.signature(), &client_public, SignType::Rsa, Charset::Utf8));
    }

    #[test]
    fn test_json_body_keys() {
        let signed = build(&request(), &credential()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&signed.to_json().unwrap()).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["biz_content", "charset", "method", "sign", "sign_type", "tiger_id", "timestamp", "version"]
        );
        assert_eq!(obj["sign_type"], "RSA");
        assert_eq!(obj["charset"], "UTF-8");
        assert_eq!(obj["sign"], signed.signature());
    }

    #[test]
    fn test_absent_payload_not_signed_or_sent() {
        let req = OutboundRequest::new("market_state").with_timestamp("2024-03-01 09:30:00");
        let signed = build(&req, &credential()).unwrap();
        assert!(!signed.envelope().canonical().contains("biz_content"));

        let value: serde_json::Value = serde_json::from_str(&signed.to_json().unwrap()).unwrap();
        assert!(value.get("biz_content").is_none());
    }
}
