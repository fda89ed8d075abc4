//! # Cryptographic Primitives
//!
//! The byte-oriented building blocks the ILP engine and the message signer
//! share: SHA-256, HMAC-SHA256 and the two base64 alphabets.
//!
//! Everything here is a thin wrapper around audited crates (`sha2`, `hmac`,
//! `base64`). The wrappers exist so that the exact encoding choices (padding,
//! alphabet, leniency on decode) are made in one place. Two parties that
//! never share code must derive byte-identical conditions from the same
//! transaction, and an alphabet mismatch is the easiest way to break that.

pub mod encoding;
pub mod hash;

pub use encoding::{base64_encode, base64url_decode, base64url_encode};
pub use hash::{hmac_sha256, sha256, sha256_array};
