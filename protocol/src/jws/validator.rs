//! Inbound FSPIOP signature validation.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. body present
//! 2. `fspiop-source` present and a key registered for it
//! 3. `fspiop-uri`, `fspiop-http-method`, `fspiop-signature` present
//! 4. signature header parses, protected header decodes, `alg` is RS256
//! 5. RS256 signature verifies over the protected header and the live body
//! 6. every protected field matches its transport header
//!
//! Step 6 is what stops a correctly signed header from being replayed on a
//! request with different routing headers.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{crypto, Algorithm};
use serde_json::Value;

use super::canonical::{signing_input, ProtectedHeader, SignatureHeader};
use super::error::JwsError;
use super::headers::{Headers, JwsRequest};
use super::keys::ValidationKeys;
use crate::config::{
    HEADER_DATE, HEADER_FSPIOP_DESTINATION, HEADER_FSPIOP_HTTP_METHOD, HEADER_FSPIOP_SIGNATURE,
    HEADER_FSPIOP_SOURCE, HEADER_FSPIOP_URI, JWS_SIGNATURE_ALGORITHM,
};
use crate::logging::Logger;

pub struct JwsValidator {
    keys: ValidationKeys,
    logger: Arc<dyn Logger>,
}

impl JwsValidator {
    pub fn new(keys: ValidationKeys, logger: Arc<dyn Logger>) -> Self {
        Self { keys, logger }
    }

    pub fn keys(&self) -> &ValidationKeys {
        &self.keys
    }

    pub fn validate_request(&self, request: &JwsRequest) -> Result<(), JwsError> {
        self.validate(&request.headers, request.body.as_ref())
    }

    /// Verifies an inbound request. `Ok(())` means every check passed.
    pub fn validate(&self, headers: &Headers, body: Option<&Value>) -> Result<(), JwsError> {
        let result = self.check(headers, body);
        match &result {
            Ok(()) => self.logger.debug(&format!(
                "validated signature from {}",
                headers.get(HEADER_FSPIOP_SOURCE).unwrap_or_default()
            )),
            Err(e) => self.logger.warn(&format!("signature validation failed: {e}")),
        }
        result
    }

    fn check(&self, headers: &Headers, body: Option<&Value>) -> Result<(), JwsError> {
        let body = body.ok_or(JwsError::MissingBody)?;

        let source = require(headers, HEADER_FSPIOP_SOURCE)?;
        let key = self.keys.get(source).ok_or_else(|| JwsError::UnknownSource {
            fsp: source.to_string(),
            available: self.keys.sources().collect::<Vec<_>>().join(", "),
        })?;

        require(headers, HEADER_FSPIOP_URI)?;
        require(headers, HEADER_FSPIOP_HTTP_METHOD)?;
        let signature_header =
            SignatureHeader::from_header_value(require(headers, HEADER_FSPIOP_SIGNATURE)?)?;

        let protected = ProtectedHeader::decode(&signature_header.protected_header)?;
        if protected.alg != JWS_SIGNATURE_ALGORITHM {
            return Err(JwsError::UnsupportedAlgorithm(protected.alg));
        }

        let input = signing_input(&signature_header.protected_header, body)?;
        let verified = crypto::verify(
            &signature_header.signature,
            input.as_bytes(),
            key,
            Algorithm::RS256,
        )
        .unwrap_or(false);
        if !verified {
            return Err(JwsError::InvalidSignature);
        }

        match_required("FSPIOP-URI", &protected.uri, headers.get(HEADER_FSPIOP_URI))?;
        match_required(
            "FSPIOP-HTTP-Method",
            &protected.http_method,
            headers.get(HEADER_FSPIOP_HTTP_METHOD),
        )?;
        match_required("FSPIOP-Source", &protected.source, headers.get(HEADER_FSPIOP_SOURCE))?;
        match_optional(
            "FSPIOP-Destination",
            &protected.destination,
            headers.get(HEADER_FSPIOP_DESTINATION),
        )?;
        match_optional("Date", &protected.date, headers.get(HEADER_DATE))?;
        Ok(())
    }
}

impl fmt::Debug for JwsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwsValidator")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

fn require<'h>(headers: &'h Headers, name: &'static str) -> Result<&'h str, JwsError> {
    headers.get(name).ok_or(JwsError::MissingHeader(name))
}

fn mismatch(field: &'static str, protected: &Option<String>, header: Option<&str>) -> JwsError {
    JwsError::HeaderMismatch {
        field,
        protected: protected.clone(),
        header: header.map(str::to_string),
    }
}

/// Both sides present and equal.
fn match_required(
    field: &'static str,
    protected: &Option<String>,
    header: Option<&str>,
) -> Result<(), JwsError> {
    match (protected.as_deref(), header) {
        (Some(p), Some(h)) if p == h => Ok(()),
        _ => Err(mismatch(field, protected, header)),
    }
}

/// Both absent, or both present and equal.
fn match_optional(
    field: &'static str,
    protected: &Option<String>,
    header: Option<&str>,
) -> Result<(), JwsError> {
    match (protected.as_deref(), header) {
        (None, None) => Ok(()),
        (Some(p), Some(h)) if p == h => Ok(()),
        _ => Err(mismatch(field, protected, header)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::base64url_encode;
    use crate::jws::JwsSigner;
    use crate::logging::tests::RecordingLogger;
    use crate::logging::TracingLogger;
    use serde_json::json;

    const PRIVATE_PEM: &[u8] = include_bytes!("../../tests/fixtures/payer_private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../tests/fixtures/payer_public.pem");
    const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("../../tests/fixtures/other_private.pem");
    const OTHER_PUBLIC_PEM: &[u8] = include_bytes!("../../tests/fixtures/other_public.pem");

    fn validator() -> JwsValidator {
        let keys =
            ValidationKeys::from_pems([("payerfsp", PUBLIC_PEM), ("payeefsp", OTHER_PUBLIC_PEM)])
                .unwrap();
        JwsValidator::new(keys, Arc::new(TracingLogger::default()))
    }

    fn signed(private_pem: &[u8]) -> JwsRequest {
        let request = JwsRequest::new("POST", "/quotes")
            .header("FSPIOP-Source", "payerfsp")
            .header("FSPIOP-Destination", "payeefsp")
            .header("Date", "Thu, 01 Jan 2030 00:00:00 GMT")
            .body(json!({"quoteId": "7c23", "amount": {"amount": "100", "currency": "USD"}}));
        let signer = JwsSigner::new(private_pem, Arc::new(TracingLogger::default())).unwrap();
        let headers = signer.sign(&request).unwrap();
        request.with_headers(headers)
    }

    /// Replaces the protected header, re-signing so only the field check can fail.
    fn resigned_with(request: &JwsRequest, edit: impl FnOnce(&mut ProtectedHeader)) -> JwsRequest {
        let value = request.headers.get(HEADER_FSPIOP_SIGNATURE).unwrap();
        let mut protected =
            ProtectedHeader::decode(&SignatureHeader::from_header_value(value).unwrap().protected_header)
                .unwrap();
        edit(&mut protected);
        let protected_header = protected.encode().unwrap();
        let input = signing_input(&protected_header, request.body.as_ref().unwrap()).unwrap();
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(PRIVATE_PEM).unwrap();
        let signature = crypto::sign(input.as_bytes(), &key, Algorithm::RS256).unwrap();
        let mut out = request.clone();
        out.headers.insert(
            HEADER_FSPIOP_SIGNATURE,
            SignatureHeader {
                signature,
                protected_header,
            }
            .to_header_value()
            .unwrap(),
        );
        out
    }

    #[test]
    fn accepts_a_signed_request() {
        validator().validate_request(&signed(PRIVATE_PEM)).unwrap();
    }

    #[test]
    fn accepts_null_body() {
        let mut request = JwsRequest::new("GET", "/parties/MSISDN/1")
            .header("FSPIOP-Source", "payerfsp")
            .body(json!(null));
        let signer = JwsSigner::new(PRIVATE_PEM, Arc::new(TracingLogger::default())).unwrap();
        request.headers = signer.sign(&request).unwrap();
        validator().validate_request(&request).unwrap();
    }

    #[test]
    fn missing_body() {
        let mut request = signed(PRIVATE_PEM);
        request.body = None;
        assert!(matches!(validator().validate_request(&request), Err(JwsError::MissingBody)));
    }

    #[test]
    fn unknown_source_lists_available_keys() {
        let mut request = signed(PRIVATE_PEM);
        request.headers.insert("fspiop-source", "strangerfsp");
        let err = validator().validate_request(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"no validation key for source "strangerfsp"; available sources: [payeefsp, payerfsp]"#
        );
    }

    #[test]
    fn required_headers() {
        for name in [
            HEADER_FSPIOP_SOURCE,
            HEADER_FSPIOP_URI,
            HEADER_FSPIOP_HTTP_METHOD,
            HEADER_FSPIOP_SIGNATURE,
        ] {
            let mut request = signed(PRIVATE_PEM);
            request.headers.remove(name);
            let err = validator().validate_request(&request).unwrap_err();
            assert!(
                matches!(err, JwsError::MissingHeader(missing) if missing == name),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn tampered_body_fails_verification() {
        let mut request = signed(PRIVATE_PEM);
        request.body = Some(json!({"quoteId": "7c23", "amount": {"amount": "999", "currency": "USD"}}));
        assert!(matches!(
            validator().validate_request(&request),
            Err(JwsError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_key_fails_verification() {
        // Signed by the payee's key but claims to come from the payer.
        assert!(matches!(
            validator().validate_request(&signed(OTHER_PRIVATE_PEM)),
            Err(JwsError::InvalidSignature)
        ));
    }

    #[test]
    fn malformed_signature_header() {
        let mut request = signed(PRIVATE_PEM);
        request.headers.insert(HEADER_FSPIOP_SIGNATURE, "not json");
        assert!(matches!(
            validator().validate_request(&request),
            Err(JwsError::MalformedSignatureHeader(_))
        ));
    }

    #[test]
    fn rejects_other_algorithms() {
        let request = resigned_with(&signed(PRIVATE_PEM), |p| p.alg = "none".to_string());
        assert!(matches!(
            validator().validate_request(&request),
            Err(JwsError::UnsupportedAlgorithm(alg)) if alg == "none"
        ));
    }

    #[test]
    fn transport_header_changes_are_detected() {
        let cases = [
            (HEADER_FSPIOP_URI, "/transfers", "FSPIOP-URI"),
            (HEADER_FSPIOP_HTTP_METHOD, "PUT", "FSPIOP-HTTP-Method"),
            (HEADER_FSPIOP_DESTINATION, "otherfsp", "FSPIOP-Destination"),
            (HEADER_DATE, "Fri, 02 Jan 2030 00:00:00 GMT", "Date"),
        ];
        for (name, value, expected) in cases {
            let mut request = signed(PRIVATE_PEM);
            request.headers.insert(name, value);
            let err = validator().validate_request(&request).unwrap_err();
            assert!(
                matches!(err, JwsError::HeaderMismatch { field, .. } if field == expected),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn optional_header_present_on_one_side_only() {
        let mut request = signed(PRIVATE_PEM);
        request.headers.remove(HEADER_FSPIOP_DESTINATION);
        assert!(matches!(
            validator().validate_request(&request),
            Err(JwsError::HeaderMismatch {
                field: "FSPIOP-Destination",
                header: None,
                ..
            })
        ));

        let request = resigned_with(&signed(PRIVATE_PEM), |p| p.date = None);
        assert!(matches!(
            validator().validate_request(&request),
            Err(JwsError::HeaderMismatch { field: "Date", protected: None, .. })
        ));
    }

    #[test]
    fn protected_header_missing_required_field() {
        let request = resigned_with(&signed(PRIVATE_PEM), |p| p.uri = None);
        assert!(matches!(
            validator().validate_request(&request),
            Err(JwsError::HeaderMismatch { field: "FSPIOP-URI", .. })
        ));
    }

    #[test]
    fn source_in_protected_header_must_match() {
        let request = resigned_with(&signed(PRIVATE_PEM), |p| {
            p.source = Some("payeefsp".to_string())
        });
        assert!(matches!(
            validator().validate_request(&request),
            Err(JwsError::HeaderMismatch { field: "FSPIOP-Source", .. })
        ));
    }

    #[test]
    fn garbage_signature_is_invalid_not_a_panic() {
        let request = signed(PRIVATE_PEM);
        let value = request.headers.get(HEADER_FSPIOP_SIGNATURE).unwrap();
        let mut header = SignatureHeader::from_header_value(value).unwrap();
        header.signature = base64url_encode(b"short");
        let mut request = request.clone();
        request
            .headers
            .insert(HEADER_FSPIOP_SIGNATURE, header.to_header_value().unwrap());
        assert!(matches!(
            validator().validate_request(&request),
            Err(JwsError::InvalidSignature)
        ));
    }

    #[test]
    fn failures_are_logged() {
        let logger = Arc::new(RecordingLogger::default());
        let validator = JwsValidator::new(ValidationKeys::new(), logger.clone());
        assert!(validator.validate_request(&signed(PRIVATE_PEM)).is_err());
        let lines = logger.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].1.contains("no validation key"));
    }
}
