//! # Protocol Configuration & Constants
//!
//! Every magic number the ILP engine and the FSPIOP signer depend on lives
//! here. Both sides of a transfer compute these artifacts independently, so
//! a constant that drifts between two deployments breaks interoperability
//! silently. Change them only together with the counterparty.
//!
//! The one piece of runtime configuration, [`IlpConfig`], is deliberately
//! small: a version tag and a secret. Everything else (endpoints, TLS, token
//! refresh) belongs to the request layer that embeds this crate.

use std::env;
use std::fmt;

use serde::Deserialize;

use crate::ilp::{IlpError, IlpVersion};

// ---------------------------------------------------------------------------
// ILP Wire Constants
// ---------------------------------------------------------------------------

/// Envelope type byte of a legacy ILP "payment" packet.
pub const ILP_PAYMENT_TYPE: u8 = 1;

/// Envelope type byte of an ILPv4 "prepare" packet.
pub const ILP_PREPARE_TYPE: u8 = 12;

/// Destination written into every v4 packet. Routing in the scheme happens on
/// FSP ids in the message headers, so this address carries no meaning.
pub const ILP_V4_ADDRESS: &str = "g.mojaloop";

/// Allocation scheme prefix for v1 per-party addresses.
pub const ILP_V1_ADDRESS_PREFIX: &str = "g";

/// Fulfilment preimages are exactly one SHA-256 block of output.
pub const ILP_PREIMAGE_LENGTH: usize = 32;

/// Execution conditions are SHA-256 digests.
pub const ILP_CONDITION_LENGTH: usize = 32;

/// Packet amount written for FX transaction objects. The conversion amounts
/// travel in `conversionTerms`, not in the ILP amount field.
pub const FX_ILP_AMOUNT: &str = "0";

/// `strftime` layout of the ILPv4 `expiresAt` field: UTC, millisecond
/// precision, no separators and no zone suffix (`YYYYMMDDHHmmssfff`).
pub const ILP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Byte length of a formatted `expiresAt` field.
pub const ILP_TIMESTAMP_LENGTH: usize = 17;

// ---------------------------------------------------------------------------
// FSPIOP Signing Constants
// ---------------------------------------------------------------------------

/// The only signature algorithm signer and validator accept.
pub const JWS_SIGNATURE_ALGORITHM: &str = "RS256";

/// Transport header carrying `{signature, protectedHeader}` as JSON text.
pub const HEADER_FSPIOP_SIGNATURE: &str = "fspiop-signature";
pub const HEADER_FSPIOP_SOURCE: &str = "fspiop-source";
pub const HEADER_FSPIOP_DESTINATION: &str = "fspiop-destination";
pub const HEADER_FSPIOP_URI: &str = "fspiop-uri";
pub const HEADER_FSPIOP_HTTP_METHOD: &str = "fspiop-http-method";
pub const HEADER_DATE: &str = "date";

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Environment variable holding the ILP version tag (`v1` or `v4`).
pub const ENV_ILP_VERSION: &str = "ILP_VERSION";

/// Environment variable holding the shared ILP secret.
pub const ENV_ILP_SECRET: &str = "ILP_SECRET";

/// Runtime configuration for the ILP engine.
///
/// Deserializable so embedding services can keep it inside their own config
/// files; `version` defaults to v4 when omitted.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct IlpConfig {
    #[serde(default)]
    pub version: IlpVersion,
    pub secret: String,
}

impl IlpConfig {
    /// Reads `ILP_VERSION` (optional) and `ILP_SECRET` (required).
    pub fn from_env() -> Result<Self, IlpError> {
        let version = match env::var(ENV_ILP_VERSION) {
            Ok(tag) => tag.parse()?,
            Err(_) => IlpVersion::default(),
        };
        let secret = env::var(ENV_ILP_SECRET)
            .map_err(|_| IlpError::InvalidOptions(format!("{ENV_ILP_SECRET} is not set")))?;

        Ok(Self { version, secret })
    }
}

impl fmt::Debug for IlpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IlpConfig")
            .field("version", &self.version)
            .field("secret", &"<redacted>")
            .finish()
    }
}
