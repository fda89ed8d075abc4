//! Error types for FSPIOP message signing and validation.
//!
//! Unlike the ILP side there is no boolean tier here: every validation
//! failure is an error naming the check that failed, so an API gateway can
//! reject the request with a specific reason.

use thiserror::Error;

/// Errors raised by [`JwsSigner`](super::JwsSigner) and
/// [`JwsValidator`](super::JwsValidator).
#[derive(Debug, Error)]
pub enum JwsError {
    /// The request has no body. Signatures always cover a body segment.
    #[error("request body is required for FSPIOP signing")]
    MissingBody,

    /// A header the signing scheme depends on is absent.
    #[error("missing required header {0}")]
    MissingHeader(&'static str),

    /// No verification key is registered for the request's source FSP.
    #[error("no validation key for source {fsp:?}; available sources: [{available}]")]
    UnknownSource {
        /// Value of the `fspiop-source` header.
        fsp: String,
        /// Comma-separated registered sources, sorted.
        available: String,
    },

    /// The `fspiop-signature` header is not `{signature, protectedHeader}`.
    #[error("malformed fspiop-signature header: {0}")]
    MalformedSignatureHeader(String),

    /// The protected header does not decode to a JSON object.
    #[error("malformed protected header: {0}")]
    MalformedProtectedHeader(String),

    /// The protected header names an algorithm other than RS256.
    #[error("unsupported signature algorithm {0:?}")]
    UnsupportedAlgorithm(String),

    /// The signature does not verify over the protected header and body.
    #[error("signature verification failed")]
    InvalidSignature,

    /// A protected header field disagrees with its transport header.
    #[error("{field} mismatch: protected header has {protected:?}, request header has {header:?}")]
    HeaderMismatch {
        /// Protected header field name, e.g. `FSPIOP-URI`.
        field: &'static str,
        /// Value in the signed protected header.
        protected: Option<String>,
        /// Value on the request.
        header: Option<String>,
    },

    /// The request URI has no path that could be signed.
    #[error("invalid request URI {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// A PEM key could not be loaded.
    #[error("invalid key for {owner}: {reason}")]
    InvalidKey {
        /// `signer` or the source FSP the key belongs to.
        owner: String,
        reason: String,
    },

    /// The RSA primitive failed while signing.
    #[error("signing failed: {0}")]
    Signing(String),

    /// JSON serialization of the header or body failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for JwsError {
    fn from(err: serde_json::Error) -> Self {
        JwsError::Serialization(err.to_string())
    }
}
