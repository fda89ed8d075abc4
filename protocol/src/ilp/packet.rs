//! Binary ILP packets.
//!
//! Two packet kinds are spoken, one per engine version:
//!
//! ```text
//! v1 payment (type 1)                 v4 prepare (type 12)
//! ─────────────────────────────       ──────────────────────────────────
//! amount        u64 big-endian        amount              u64 big-endian
//! account       var octet string      expiresAt           17 ASCII bytes
//! data          var octet string      executionCondition  32 bytes
//! extensions    u8 (always 0)         destination         var octet string
//!                                     data                var octet string
//! ```
//!
//! Both are wrapped in the same envelope: one type byte followed by the
//! contents as a var octet string. `expiresAt` is `YYYYMMDDHHmmssfff` in
//! UTC. Addresses are ASCII. `data` is opaque here; the engines put the
//! base64url text of the transaction object in it.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use super::error::IlpError;
use super::oer::{OerReader, OerWriter};
use crate::config::{
    ILP_CONDITION_LENGTH, ILP_PAYMENT_TYPE, ILP_PREPARE_TYPE, ILP_TIMESTAMP_FORMAT,
    ILP_TIMESTAMP_LENGTH,
};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

fn seal_envelope(packet_type: u8, contents: &[u8]) -> Vec<u8> {
    let mut writer = OerWriter::new();
    writer.write_u8(packet_type);
    writer.write_var_octet_string(contents);
    writer.into_bytes()
}

fn open_envelope(bytes: &[u8], expected: u8) -> Result<&[u8], IlpError> {
    let mut reader = OerReader::new(bytes);
    let found = reader.read_u8()?;
    if found != expected {
        return Err(IlpError::UnexpectedPacketType { expected, found });
    }
    let contents = reader.read_var_octet_string()?;
    if reader.remaining() != 0 {
        return Err(IlpError::MalformedPacket(format!(
            "{} trailing bytes after envelope",
            reader.remaining()
        )));
    }
    Ok(contents)
}

fn read_address(reader: &mut OerReader<'_>, field: &str) -> Result<String, IlpError> {
    let raw = reader.read_var_octet_string()?;
    if !raw.is_ascii() {
        return Err(IlpError::MalformedPacket(format!("{field} is not ASCII")));
    }
    String::from_utf8(raw.to_vec())
        .map_err(|_| IlpError::MalformedPacket(format!("{field} is not ASCII")))
}

// ---------------------------------------------------------------------------
// v1 payment
// ---------------------------------------------------------------------------

/// Legacy ILP payment packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IlpPayment {
    /// Amount in minor units of the transfer currency.
    pub amount: u64,
    pub account: String,
    pub data: Vec<u8>,
}

impl IlpPayment {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut contents = OerWriter::new();
        contents.write_u64(self.amount);
        contents.write_var_octet_string(self.account.as_bytes());
        contents.write_var_octet_string(&self.data);
        contents.write_u8(0);
        seal_envelope(ILP_PAYMENT_TYPE, &contents.into_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IlpError> {
        let contents = open_envelope(bytes, ILP_PAYMENT_TYPE)?;
        let mut reader = OerReader::new(contents);

        let amount = reader.read_u64()?;
        let account = read_address(&mut reader, "account")?;
        let data = reader.read_var_octet_string()?.to_vec();
        let extensions = reader.read_u8()?;
        if extensions != 0 || reader.remaining() != 0 {
            return Err(IlpError::MalformedPacket(
                "payment packet extensions are not supported".to_string(),
            ));
        }

        Ok(Self {
            amount,
            account,
            data,
        })
    }
}

// ---------------------------------------------------------------------------
// v4 prepare
// ---------------------------------------------------------------------------

/// ILPv4 prepare packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IlpPrepare {
    /// Amount in minor units of the transfer currency.
    pub amount: u64,
    /// Millisecond precision survives the wire; anything finer is truncated.
    pub expires_at: DateTime<Utc>,
    pub execution_condition: [u8; ILP_CONDITION_LENGTH],
    pub destination: String,
    pub data: Vec<u8>,
}

impl IlpPrepare {
    /// Fails only if `expires_at` lies outside years 0000 to 9999, which the
    /// fixed-width timestamp cannot represent.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IlpError> {
        let expires_at = self.expires_at.format(ILP_TIMESTAMP_FORMAT).to_string();
        if expires_at.len() != ILP_TIMESTAMP_LENGTH {
            return Err(IlpError::InvalidExpiration {
                value: self.expires_at.to_rfc3339(),
                reason: "year does not fit the packet timestamp".to_string(),
            });
        }

        let mut contents = OerWriter::new();
        contents.write_u64(self.amount);
        contents.write_octets(expires_at.as_bytes());
        contents.write_octets(&self.execution_condition);
        contents.write_var_octet_string(self.destination.as_bytes());
        contents.write_var_octet_string(&self.data);
        Ok(seal_envelope(ILP_PREPARE_TYPE, &contents.into_bytes()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IlpError> {
        let contents = open_envelope(bytes, ILP_PREPARE_TYPE)?;
        let mut reader = OerReader::new(contents);

        let amount = reader.read_u64()?;
        let expires_at = parse_packet_timestamp(reader.read_octets(ILP_TIMESTAMP_LENGTH)?)?;

        let mut execution_condition = [0u8; ILP_CONDITION_LENGTH];
        execution_condition.copy_from_slice(reader.read_octets(ILP_CONDITION_LENGTH)?);

        let destination = read_address(&mut reader, "destination")?;
        let data = reader.read_var_octet_string()?.to_vec();
        if reader.remaining() != 0 {
            return Err(IlpError::MalformedPacket(format!(
                "{} trailing bytes in prepare packet",
                reader.remaining()
            )));
        }

        Ok(Self {
            amount,
            expires_at,
            execution_condition,
            destination,
            data,
        })
    }
}

fn parse_packet_timestamp(raw: &[u8]) -> Result<DateTime<Utc>, IlpError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| IlpError::MalformedPacket("expiresAt is not ASCII".to_string()))?;
    let naive = NaiveDateTime::parse_from_str(text, ILP_TIMESTAMP_FORMAT)
        .map_err(|e| IlpError::MalformedPacket(format!("expiresAt {text:?}: {e}")))?;
    Ok(Utc.from_utc_datetime(&naive))
}

// ---------------------------------------------------------------------------
// Decoded packet
// ---------------------------------------------------------------------------

/// A decoded packet of either version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IlpPacket {
    Payment(IlpPayment),
    Prepare(IlpPrepare),
}

impl IlpPacket {
    pub fn amount(&self) -> u64 {
        match self {
            IlpPacket::Payment(p) => p.amount,
            IlpPacket::Prepare(p) => p.amount,
        }
    }

    /// The v1 `account` or the v4 `destination`.
    pub fn address(&self) -> &str {
        match self {
            IlpPacket::Payment(p) => &p.account,
            IlpPacket::Prepare(p) => &p.destination,
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            IlpPacket::Payment(p) => &p.data,
            IlpPacket::Prepare(p) => &p.data,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
