//! Logic shared by the v1 and v4 codecs.
//!
//! The two wire formats disagree on packet layout and on what the fulfilment
//! is derived from, but agree on everything in this file: how amounts are
//! scaled, how the transaction object rides inside `data`, how a condition
//! follows from a fulfilment, and what a transfer request has to match.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use super::error::IlpError;
use crate::config::{FX_ILP_AMOUNT, ILP_CONDITION_LENGTH, ILP_PREIMAGE_LENGTH, ILP_V1_ADDRESS_PREFIX};
use crate::crypto::{base64_encode, base64url_decode, base64url_encode, hmac_sha256, sha256_array};
use crate::currency;
use crate::logging::Logger;
use crate::transaction::{Amount, TransactionObject, TransferRequest};

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Converts a decimal amount into minor units of its currency.
///
/// `"100"` USD becomes `10000`. The scaled value must be a whole number that
/// fits in a `u64`; `"0.001"` USD is rejected rather than rounded.
pub fn scale_amount(amount: &Amount) -> Result<u64, IlpError> {
    let places = currency::decimal_places(&amount.currency)
        .ok_or_else(|| IlpError::UnknownCurrency(amount.currency.clone()))?;

    let invalid = |reason: &str| IlpError::InvalidAmount {
        amount: amount.amount.clone(),
        reason: reason.to_string(),
    };

    let value = Decimal::from_str_exact(amount.amount.trim())
        .map_err(|e| invalid(&format!("not a decimal number ({e})")))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid("negative"));
    }

    let factor = Decimal::from(10u64.pow(places));
    let scaled = value
        .checked_mul(factor)
        .ok_or_else(|| invalid("overflow while scaling"))?;
    if !scaled.fract().is_zero() {
        return Err(invalid(&format!(
            "more than {places} decimal places for {}",
            amount.currency
        )));
    }

    scaled
        .trunc()
        .to_u64()
        .ok_or_else(|| invalid("scaled amount does not fit in 64 bits"))
}

/// The amount written into a packet for this transaction object.
pub(crate) fn packet_amount(tx: &TransactionObject) -> Result<u64, IlpError> {
    match tx {
        TransactionObject::Quote(quote) => scale_amount(&quote.amount),
        TransactionObject::Fx(_) => FX_ILP_AMOUNT.parse().map_err(|_| IlpError::InvalidAmount {
            amount: FX_ILP_AMOUNT.to_string(),
            reason: "FX packet amount is not an integer".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Addressing & expiry
// ---------------------------------------------------------------------------

fn address_segment(field: &'static str, value: &str, lowercase: bool) -> Result<String, IlpError> {
    if value.is_empty() || !value.is_ascii() {
        return Err(IlpError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
    Ok(if lowercase {
        value.to_ascii_lowercase()
    } else {
        value.to_string()
    })
}

/// Per-party address used by the v1 codec.
///
/// ```text
/// quote: g.<payee fspId>.<partyIdType>.<partyIdentifier>[.<partySubIdOrType>]
/// fx:    g.<counterPartyFsp>.<sourceCurrency>.<targetCurrency>
/// ```
///
/// Everything after the fsp id is lowercased; on the FX path the fsp id is
/// lowercased too.
pub fn v1_address(tx: &TransactionObject) -> Result<String, IlpError> {
    let mut segments = vec![ILP_V1_ADDRESS_PREFIX.to_string()];
    match tx {
        TransactionObject::Quote(quote) => {
            let info = &quote.payee.party_id_info;
            segments.push(address_segment("payee.fspId", &info.fsp_id, false)?);
            segments.push(address_segment("payee.partyIdType", &info.party_id_type, true)?);
            segments.push(address_segment(
                "payee.partyIdentifier",
                &info.party_identifier,
                true,
            )?);
            if let Some(sub_id) = &info.party_sub_id_or_type {
                segments.push(address_segment("payee.partySubIdOrType", sub_id, true)?);
            }
        }
        TransactionObject::Fx(fx) => {
            let terms = &fx.conversion_terms;
            segments.push(address_segment("counterPartyFsp", &terms.counter_party_fsp, true)?);
            segments.push(address_segment(
                "sourceAmount.currency",
                &terms.source_amount.currency,
                true,
            )?);
            segments.push(address_segment(
                "targetAmount.currency",
                &terms.target_amount.currency,
                true,
            )?);
        }
    }
    Ok(segments.join("."))
}

/// Parses an ISO 8601 / RFC 3339 expiration timestamp.
pub fn parse_expiration(value: &str) -> Result<DateTime<Utc>, IlpError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| IlpError::InvalidExpiration {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Packet data
// ---------------------------------------------------------------------------

/// The base64url text of the transaction object's JSON.
pub(crate) fn transaction_text(tx: &TransactionObject) -> Result<String, IlpError> {
    Ok(base64url_encode(tx.to_json()?))
}

/// A packet's `data` field as text, exactly as the producer wrote it.
pub(crate) fn data_text(data: &[u8]) -> Result<&str, IlpError> {
    std::str::from_utf8(data)
        .map_err(|_| IlpError::MalformedTransactionObject("data is not ASCII".to_string()))
}

fn data_json(data: &[u8]) -> Result<Vec<u8>, IlpError> {
    base64url_decode(data_text(data)?)
        .map_err(|e| IlpError::MalformedTransactionObject(format!("data is not base64: {e}")))
}

/// Recovers the transaction object from a packet's `data` field.
///
/// Fields the typed records do not model are dropped; use
/// [`transaction_value_from_data`] when every field matters.
pub(crate) fn transaction_from_data(data: &[u8]) -> Result<TransactionObject, IlpError> {
    serde_json::from_slice(&data_json(data)?)
        .map_err(|e| IlpError::MalformedTransactionObject(e.to_string()))
}

/// The embedded JSON object with every field and in its original key order.
pub(crate) fn transaction_value_from_data(data: &[u8]) -> Result<Value, IlpError> {
    let value: Value = serde_json::from_slice(&data_json(data)?)
        .map_err(|e| IlpError::MalformedTransactionObject(e.to_string()))?;
    if !value.is_object() {
        return Err(IlpError::MalformedTransactionObject(
            "data is not a JSON object".to_string(),
        ));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Fulfilment & condition
// ---------------------------------------------------------------------------

/// `base64url(HMAC-SHA256(ascii(base64(secret)), message))`.
pub(crate) fn hmac_fulfilment(secret: &str, message: &[u8]) -> Result<String, IlpError> {
    let key = base64_encode(secret);
    let mac = hmac_sha256(key.as_bytes(), message).map_err(|e| IlpError::Crypto(e.to_string()))?;
    Ok(base64url_encode(mac))
}

fn decode_preimage(fulfilment: &str) -> Result<Vec<u8>, IlpError> {
    let preimage =
        base64url_decode(fulfilment).map_err(|e| IlpError::MalformedFulfilment(e.to_string()))?;
    if preimage.len() != ILP_PREIMAGE_LENGTH {
        return Err(IlpError::InvalidPreimageLength(preimage.len()));
    }
    Ok(preimage)
}

/// SHA-256 of the decoded 32-byte preimage.
pub(crate) fn condition_bytes(fulfilment: &str) -> Result<[u8; ILP_CONDITION_LENGTH], IlpError> {
    Ok(sha256_array(&decode_preimage(fulfilment)?))
}

/// The base64url condition for a fulfilment.
pub fn condition_from_fulfilment(fulfilment: &str) -> Result<String, IlpError> {
    Ok(base64url_encode(condition_bytes(fulfilment)?))
}

/// Whether `fulfilment` hashes to `condition`.
///
/// Compares decoded bytes, so a condition sent in the padded or standard
/// alphabet still matches. Any decoding failure is a mismatch.
pub fn fulfilment_matches(fulfilment: &str, condition: &str) -> bool {
    let Ok(expected) = condition_bytes(fulfilment) else {
        return false;
    };
    match base64url_decode(condition) {
        Ok(given) => given.as_slice() == expected.as_slice(),
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Transfer cross-check
// ---------------------------------------------------------------------------

/// Checks a transfer request against the transaction object in its packet.
///
/// Payer fsp, payee fsp, amount and currency must match exactly, as strings.
/// The first mismatch is logged by field name and yields `false`. FX objects
/// carry no payer/payee pair and never match.
pub(crate) fn validate_against_transfer(
    tx: &TransactionObject,
    transfer: &TransferRequest,
    logger: &dyn Logger,
) -> bool {
    let Some(quote) = tx.as_quote() else {
        logger.warn(&format!(
            "transfer {} carries an FX transaction object",
            transfer.transfer_id
        ));
        return false;
    };

    let checks = [
        ("payerFsp", quote.payer.fsp_id(), transfer.payer_fsp.as_str()),
        ("payeeFsp", quote.payee.fsp_id(), transfer.payee_fsp.as_str()),
        (
            "amount.amount",
            quote.amount.amount.as_str(),
            transfer.amount.amount.as_str(),
        ),
        (
            "amount.currency",
            quote.amount.currency.as_str(),
            transfer.amount.currency.as_str(),
        ),
    ];

    for (field, in_packet, in_transfer) in checks {
        if in_packet != in_transfer {
            logger.warn(&format!(
                "transfer {} does not match its ILP packet: {field} is {in_transfer:?}, packet has {in_packet:?}",
                transfer.transfer_id
            ));
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
