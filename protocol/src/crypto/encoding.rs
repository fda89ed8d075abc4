//! Base64 helpers.
//!
//! Packets, fulfilments, conditions and JWS segments all travel as unpadded
//! base64url. The fulfilment key is the one place the standard padded
//! alphabet is used.
//!
//! Decoding is lenient on purpose: counterparties in the wild send both
//! alphabets, with and without padding, and a strict decoder would turn a
//! cosmetic difference into a rejected transfer.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine};

const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Unpadded base64url.
pub fn base64url_encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Padded standard base64.
pub fn base64_encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Decode base64 in either alphabet, padded or not.
pub fn base64url_decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let normalized: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    LENIENT_URL_SAFE.decode(normalized)
}
