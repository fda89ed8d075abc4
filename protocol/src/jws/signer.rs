//! Outbound FSPIOP request signing.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{crypto, Algorithm, EncodingKey};

use super::canonical::{signing_input, ProtectedHeader, SignatureHeader};
use super::error::JwsError;
use super::headers::{request_path, Headers, JwsRequest};
use crate::config::{
    HEADER_DATE, HEADER_FSPIOP_DESTINATION, HEADER_FSPIOP_HTTP_METHOD, HEADER_FSPIOP_SIGNATURE,
    HEADER_FSPIOP_SOURCE, HEADER_FSPIOP_URI, JWS_SIGNATURE_ALGORITHM,
};
use crate::logging::Logger;

/// Signs requests with one RSA private key.
///
/// Signing does not touch the caller's request. [`sign`](Self::sign)
/// returns a new header map with `fspiop-uri`, `fspiop-http-method` and
/// `fspiop-signature` set; [`signature`](Self::signature) returns only the
/// signature header value.
pub struct JwsSigner {
    key: EncodingKey,
    logger: Arc<dyn Logger>,
}

impl JwsSigner {
    /// Loads a PEM private key (PKCS#1 or PKCS#8).
    pub fn new(signing_key_pem: &[u8], logger: Arc<dyn Logger>) -> Result<Self, JwsError> {
        let key = EncodingKey::from_rsa_pem(signing_key_pem).map_err(|e| JwsError::InvalidKey {
            owner: "signer".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { key, logger })
    }

    /// The request's headers plus everything the signature adds.
    pub fn sign(&self, request: &JwsRequest) -> Result<Headers, JwsError> {
        let body = request.body.as_ref().ok_or(JwsError::MissingBody)?;
        let method = request.method.to_ascii_uppercase();
        let path = request_path(&request.uri)?;

        let mut headers = request.headers.clone();
        headers.insert(HEADER_FSPIOP_HTTP_METHOD, method.as_str());
        headers.insert(HEADER_FSPIOP_URI, path.as_str());

        let source = headers
            .get(HEADER_FSPIOP_SOURCE)
            .ok_or(JwsError::MissingHeader(HEADER_FSPIOP_SOURCE))?;

        let protected = ProtectedHeader {
            alg: JWS_SIGNATURE_ALGORITHM.to_string(),
            uri: Some(path.clone()),
            http_method: Some(method.clone()),
            source: Some(source.to_string()),
            destination: headers.get(HEADER_FSPIOP_DESTINATION).map(str::to_string),
            date: headers.get(HEADER_DATE).map(str::to_string),
        };
        let protected_header = protected.encode()?;
        let input = signing_input(&protected_header, body)?;

        let signature = crypto::sign(input.as_bytes(), &self.key, Algorithm::RS256)
            .map_err(|e| JwsError::Signing(e.to_string()))?;

        self.logger.debug(&format!(
            "signed {method} {path} from {}",
            protected.source.as_deref().unwrap_or_default()
        ));

        let value = SignatureHeader {
            signature,
            protected_header,
        }
        .to_header_value()?;
        headers.insert(HEADER_FSPIOP_SIGNATURE, value);
        Ok(headers)
    }

    /// Just the `fspiop-signature` header value.
    pub fn signature(&self, request: &JwsRequest) -> Result<String, JwsError> {
        self.sign(request)?
            .remove(HEADER_FSPIOP_SIGNATURE)
            .ok_or(JwsError::MissingHeader(HEADER_FSPIOP_SIGNATURE))
    }
}

impl fmt::Debug for JwsSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwsSigner")
            .field("alg", &JWS_SIGNATURE_ALGORITHM)
            .finish_non_exhaustive()
    }
}
