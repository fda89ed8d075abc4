//! The signed representation of a request.
//!
//! ```text
//! signing input = base64url(protectedHeaderJSON) "." base64url(bodyJSON)
//! ```
//!
//! The protected header is emitted in a fixed key order, so signing the same
//! request twice yields byte-identical headers. Signer and validator both
//! build the input through [`signing_input`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::JwsError;
use crate::crypto::{base64url_decode, base64url_encode};

/// JOSE protected header with the FSPIOP fields.
///
/// Fields other than `alg` are optional on decode so that a header missing
/// one of them fails the field cross-check, which names the field, rather
/// than a generic parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedHeader {
    pub alg: String,
    #[serde(rename = "FSPIOP-URI", default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "FSPIOP-HTTP-Method", default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(rename = "FSPIOP-Source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "FSPIOP-Destination", default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(rename = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ProtectedHeader {
    pub fn encode(&self) -> Result<String, JwsError> {
        Ok(base64url_encode(serde_json::to_vec(self)?))
    }

    pub fn decode(encoded: &str) -> Result<Self, JwsError> {
        let json = base64url_decode(encoded)
            .map_err(|e| JwsError::MalformedProtectedHeader(format!("not base64url: {e}")))?;
        serde_json::from_slice(&json).map_err(|e| JwsError::MalformedProtectedHeader(e.to_string()))
    }
}

/// Value of the `fspiop-signature` transport header, as JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureHeader {
    pub signature: String,
    pub protected_header: String,
}

impl SignatureHeader {
    pub fn to_header_value(&self) -> Result<String, JwsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_header_value(value: &str) -> Result<Self, JwsError> {
        serde_json::from_str(value).map_err(|e| JwsError::MalformedSignatureHeader(e.to_string()))
    }
}

/// The body segment. JSON `null` is the empty segment.
pub fn body_segment(body: &Value) -> Result<String, JwsError> {
    if body.is_null() {
        return Ok(String::new());
    }
    Ok(base64url_encode(serde_json::to_vec(body)?))
}

pub fn signing_input(protected_header: &str, body: &Value) -> Result<String, JwsError> {
    Ok(format!("{protected_header}.{}", body_segment(body)?))
}
