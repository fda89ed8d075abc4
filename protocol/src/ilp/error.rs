//! Error types for the ILP engine.
//!
//! Every hard failure of packet construction, decoding or fulfilment
//! calculation returns an [`IlpError`]. Semantic mismatches (a fulfilment
//! that does not match its condition, a transfer that does not match its
//! packet) are not errors; those checks return `bool`.

use thiserror::Error;

/// Errors raised by the ILP codecs and the engine factory.
#[derive(Debug, Error)]
pub enum IlpError {
    /// The version tag is neither `v1` nor `v4`.
    #[error("unsupported ILP version: {0}")]
    UnsupportedVersion(String),

    /// The engine was constructed without a secret or without a logger.
    #[error("invalid ILP engine options: {0}")]
    InvalidOptions(String),

    /// The currency has no entry in the minor-unit table.
    #[error("no decimal places known for currency {0:?}")]
    UnknownCurrency(String),

    /// The amount is not a non-negative decimal that scales to a `u64`.
    #[error("invalid amount {amount:?}: {reason}")]
    InvalidAmount {
        /// The offending amount as received.
        amount: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The expiration timestamp could not be parsed.
    #[error("invalid expiration {value:?}: {reason}")]
    InvalidExpiration {
        /// The offending timestamp as received.
        value: String,
        /// Parser diagnostics.
        reason: String,
    },

    /// A party identifier cannot be expressed as an ILP address.
    #[error("invalid ILP address component in {field}: {value:?}")]
    InvalidAddress {
        /// Which transaction field produced the component.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// A fulfilment decoded to something other than a 32-byte preimage.
    #[error("interledger preimages must be exactly 32 bytes, got {0}")]
    InvalidPreimageLength(usize),

    /// A fulfilment is not valid base64.
    #[error("malformed fulfilment: {0}")]
    MalformedFulfilment(String),

    /// The packet bytes do not parse as the expected structure.
    #[error("malformed ILP packet: {0}")]
    MalformedPacket(String),

    /// The envelope carries a different packet type than this codec speaks.
    #[error("unexpected ILP packet type {found} (expected {expected})")]
    UnexpectedPacketType {
        /// Type byte this codec decodes.
        expected: u8,
        /// Type byte found on the wire.
        found: u8,
    },

    /// The packet data does not hold a transaction object.
    #[error("malformed transaction object in packet data: {0}")]
    MalformedTransactionObject(String),

    /// Serializing the transaction object failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A cryptographic primitive refused its input.
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl From<serde_json::Error> for IlpError {
    fn from(err: serde_json::Error) -> Self {
        IlpError::Serialization(err.to_string())
    }
}
