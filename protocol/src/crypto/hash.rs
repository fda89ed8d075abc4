//! # Hashing Utilities
//!
//! SHA-256 for conditions and HMAC-SHA256 for fulfilments. Nothing else is
//! supported because nothing else is spoken on the wire.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use fspiop_protocol::crypto::sha256;
///
/// let hash = sha256(b"fspiop");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Same as [`sha256`] but returns a fixed-size array.
///
/// Execution conditions are exactly 32 bytes on the wire, so the packet
/// codec wants the array type.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// HMAC-SHA256 of `message` under `key`.
///
/// The `hmac` backend accepts keys of any length, so this does not fail in
/// practice.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<[u8; 32], InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(message);
    let result = mac.finalize().into_bytes();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    Ok(output)
}
