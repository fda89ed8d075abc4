//! # ILP Engine
//!
//! Builds and checks the Interledger artifacts attached to an FSPIOP quote:
//! the binary packet carrying the transaction object, the fulfilment only the
//! payee FSP can compute, and the condition that locks the transfer until the
//! fulfilment is revealed.
//!
//! ## Architecture
//!
//! ```text
//! mod.rs     IlpVersion, IlpOptions, IlpResponse, the IlpCodec trait, create()
//! common.rs  amount scaling, addressing, fulfilment/condition, transfer check
//! packet.rs  IlpPayment (type 1) and IlpPrepare (type 12)
//! oer.rs     the octet encoding both packets are written in
//! v1.rs      legacy codec: per-party address, fulfilment over the packet
//! v4.rs      ILPv4 codec: fixed address, fulfilment over the transaction
//! ```
//!
//! ## Flow
//!
//! ```text
//! QuoteRequest + QuoteResponse ──► TransactionObject
//!                                        │
//!                         IlpCodec::get_response_ilp
//!                                        │
//!                       { fulfilment, condition, ilpPacket }
//!                                        │
//! TransferRequest ──► validate_ilp_against_transfer_request ──► bool
//! ```
//!
//! ## Errors vs. booleans
//!
//! Malformed input (unknown currency, bad timestamp, undecodable packet) is
//! an [`IlpError`]. A well-formed input that simply does not match (wrong
//! fulfilment, transfer for a different payee) is `false`. Callers branch on
//! the boolean and propagate the error.

pub mod common;
pub mod error;
pub(crate) mod oer;
pub mod packet;
pub mod v1;
pub mod v4;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use error::IlpError;
pub use packet::{IlpPacket, IlpPayment, IlpPrepare};
pub use v1::IlpV1;
pub use v4::IlpV4;

use crate::logging::Logger;
use crate::transaction::{
    FxQuoteRequest, FxQuoteResponse, QuoteRequest, QuoteResponse, TransactionObject,
    TransferRequest,
};

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// Wire format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IlpVersion {
    /// Legacy payment packets.
    V1,
    /// ILPv4 prepare packets.
    #[default]
    V4,
}

impl IlpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            IlpVersion::V1 => "v1",
            IlpVersion::V4 => "v4",
        }
    }
}

impl fmt::Display for IlpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IlpVersion {
    type Err = IlpError;

    /// Accepts `v1` / `v4`, case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(IlpVersion::V1),
            "v4" => Ok(IlpVersion::V4),
            _ => Err(IlpError::UnsupportedVersion(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Construction options for either codec.
///
/// Both fields are required; `logger` is an `Option` only so a missing
/// logger surfaces as [`IlpError::InvalidOptions`] instead of a panic.
#[derive(Clone)]
pub struct IlpOptions {
    pub secret: String,
    pub logger: Option<Arc<dyn Logger>>,
}

impl IlpOptions {
    pub fn new(secret: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            secret: secret.into(),
            logger: Some(logger),
        }
    }

    /// Checks both options are present and hands them out.
    pub(crate) fn into_parts(self) -> Result<(String, Arc<dyn Logger>), IlpError> {
        if self.secret.is_empty() {
            return Err(IlpError::InvalidOptions("secret is empty".to_string()));
        }
        let logger = self
            .logger
            .ok_or_else(|| IlpError::InvalidOptions("logger is missing".to_string()))?;
        Ok((self.secret, logger))
    }
}

impl fmt::Debug for IlpOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IlpOptions")
            .field("secret", &"<redacted>")
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The three artifacts attached to a quote response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IlpResponse {
    /// base64url of the 32-byte preimage. Stays with the payee FSP.
    pub fulfilment: String,
    /// base64url of SHA-256(preimage).
    pub condition: String,
    /// base64url of the binary packet.
    pub ilp_packet: String,
}

// ---------------------------------------------------------------------------
// Codec trait
// ---------------------------------------------------------------------------

/// One ILP wire format.
///
/// Implementors supply the version-specific parts: how a packet is built and
/// parsed, and what the fulfilment is an HMAC of. Everything else is shared.
pub trait IlpCodec: Send + Sync + fmt::Debug {
    fn version(&self) -> IlpVersion;

    fn logger(&self) -> &dyn Logger;

    /// Builds packet, fulfilment and condition for a transaction object.
    fn get_response_ilp(&self, tx: &TransactionObject) -> Result<IlpResponse, IlpError>;

    /// Parses a base64url packet produced by this codec's version.
    fn decode_ilp_packet(&self, packet: &str) -> Result<IlpPacket, IlpError>;

    /// Recomputes the fulfilment for a packet this codec produced.
    fn calculate_fulfil(&self, packet: &str) -> Result<String, IlpError>;

    fn get_quote_response_ilp(
        &self,
        request: &QuoteRequest,
        response: &QuoteResponse,
    ) -> Result<IlpResponse, IlpError> {
        self.get_response_ilp(&TransactionObject::from_quote(request, response))
    }

    fn get_fx_quote_response_ilp(
        &self,
        request: &FxQuoteRequest,
        response: &FxQuoteResponse,
    ) -> Result<IlpResponse, IlpError> {
        self.get_response_ilp(&TransactionObject::from_fx_quote(request, response))
    }

    /// The transaction object embedded in a packet.
    fn get_transaction_object(&self, packet: &str) -> Result<TransactionObject, IlpError> {
        let decoded = self.decode_ilp_packet(packet)?;
        common::transaction_from_data(decoded.data())
    }

    /// The embedded object as raw JSON, including fields the typed records
    /// in [`crate::transaction`] do not model.
    fn get_transaction_value(&self, packet: &str) -> Result<serde_json::Value, IlpError> {
        let decoded = self.decode_ilp_packet(packet)?;
        common::transaction_value_from_data(decoded.data())
    }

    fn calculate_condition_from_fulfil(&self, fulfilment: &str) -> Result<String, IlpError> {
        common::condition_from_fulfilment(fulfilment)
    }

    fn validate_fulfil(&self, fulfilment: &str, condition: &str) -> bool {
        let valid = common::fulfilment_matches(fulfilment, condition);
        if !valid {
            self.logger()
                .warn(&format!("{} fulfilment does not match condition", self.version()));
        }
        valid
    }

    /// `Ok(false)` on any field mismatch; `Err` only if the packet is unreadable.
    fn validate_ilp_against_transfer_request(
        &self,
        transfer: &TransferRequest,
    ) -> Result<bool, IlpError> {
        let tx = self.get_transaction_object(&transfer.ilp_packet)?;
        Ok(common::validate_against_transfer(&tx, transfer, self.logger()))
    }
}

/// A codec chosen at runtime.
pub type Engine = Box<dyn IlpCodec>;

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Builds the codec for `version`.
pub fn create(version: IlpVersion, options: IlpOptions) -> Result<Engine, IlpError> {
    let engine: Engine = match version {
        IlpVersion::V1 => Box::new(IlpV1::new(options)?),
        IlpVersion::V4 => Box::new(IlpV4::new(options)?),
    };
    engine.logger().debug(&format!("ILP engine {version} ready"));
    Ok(engine)
}

/// [`create`] from a textual tag such as `"v4"`.
pub fn create_from_tag(tag: &str, options: IlpOptions) -> Result<Engine, IlpError> {
    create(tag.parse()?, options)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
