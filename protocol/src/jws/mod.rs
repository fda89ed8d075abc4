//! # FSPIOP Message Signing
//!
//! Detached JWS over FSPIOP requests, the way switch participants
//! authenticate each other's messages.
//!
//! ## Architecture
//!
//! ```text
//! headers.rs    Headers (case-insensitive), JwsRequest, request_path()
//! canonical.rs  ProtectedHeader, SignatureHeader, the signing input
//! keys.rs       ValidationKeys: FSP id → RSA public key
//! signer.rs     JwsSigner: adds fspiop-uri, fspiop-http-method, fspiop-signature
//! validator.rs  JwsValidator: verifies and cross-checks an inbound request
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! fspiop-signature: {"signature":"<b64url RS256>","protectedHeader":"<b64url JSON>"}
//!
//! protectedHeader JSON:
//!   {"alg":"RS256","FSPIOP-URI":"/quotes","FSPIOP-HTTP-Method":"POST",
//!    "FSPIOP-Source":"payerfsp","FSPIOP-Destination":"payeefsp","Date":"..."}
//! ```
//!
//! `FSPIOP-Destination` and `Date` appear only when the request carries
//! them. The signature covers `protectedHeader "." base64url(body)`.
//!
//! Signing and validation are stateless. A signer holds one private key, a
//! validator holds a fixed key registry; both are `Send + Sync` and can be
//! shared across tasks behind an `Arc`.

pub mod canonical;
pub mod error;
pub mod headers;
pub mod keys;
pub mod signer;
pub mod validator;

pub use canonical::{ProtectedHeader, SignatureHeader};
pub use error::JwsError;
pub use headers::{request_path, Headers, JwsRequest};
pub use keys::ValidationKeys;
pub use signer::JwsSigner;
pub use validator::JwsValidator;
