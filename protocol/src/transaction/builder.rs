//! Transaction object construction.
//!
//! The transaction object is the record both FSPs hash and embed in the ILP
//! packet. It is derived from a quote exchange (or an FX quote exchange) by
//! picking fields in a fixed order, so that the payer side and the payee side
//! arrive at the same JSON text without ever talking to each other about it.
//!
//! Construction is a pure function of its inputs. The result is handed to the
//! engines by shared reference and never modified afterwards.

use serde::{Deserialize, Serialize};

use super::types::{
    Amount, ConversionTerms, FxQuoteRequest, FxQuoteResponse, Party, QuoteRequest, QuoteResponse,
    TransactionType,
};

// ---------------------------------------------------------------------------
// Quote path
// ---------------------------------------------------------------------------

/// Transaction object for a regular payment quote.
///
/// # Canonical Field Order
///
/// `quoteId, transactionId, transactionType, payee, payer, expiration,
/// amount, note`. Serde emits fields in declaration order, so reordering the
/// struct changes every condition ever derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTransaction {
    pub quote_id: String,
    pub transaction_id: String,
    pub transaction_type: TransactionType,
    pub payee: Party,
    pub payer: Party,
    pub expiration: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// FX path
// ---------------------------------------------------------------------------

/// Transaction object for a currency-conversion quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxTransaction {
    pub conversion_request_id: String,
    pub conversion_terms: ConversionTerms,
}

// ---------------------------------------------------------------------------
// TransactionObject
// ---------------------------------------------------------------------------

/// Either kind of transaction object.
///
/// Serialized untagged: the JSON is exactly the inner record, which is what
/// the counterparty hashes. On decode the quote shape is tried first; an FX
/// object lacks `quoteId` and falls through to the FX shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionObject {
    Quote(QuoteTransaction),
    Fx(FxTransaction),
}

impl TransactionObject {
    /// Builds the object for a quote exchange.
    ///
    /// The amount is the quote response's `transferAmount` (what the payer
    /// FSP will actually move), not the amount originally requested. The note
    /// prefers the payee's wording and falls back to the payer's.
    pub fn from_quote(request: &QuoteRequest, response: &QuoteResponse) -> Self {
        TransactionObject::Quote(QuoteTransaction {
            quote_id: request.quote_id.clone(),
            transaction_id: request.transaction_id.clone(),
            transaction_type: request.transaction_type.clone(),
            payee: request.payee.clone(),
            payer: request.payer.clone(),
            expiration: response.expiration.clone(),
            amount: response.transfer_amount.clone(),
            note: response.note.clone().or_else(|| request.note.clone()),
        })
    }

    /// Builds the object for an FX quote exchange.
    ///
    /// Only the backend's terms are kept: they carry the final amounts and
    /// charges, while the request's terms may still have blanks.
    pub fn from_fx_quote(request: &FxQuoteRequest, response: &FxQuoteResponse) -> Self {
        TransactionObject::Fx(FxTransaction {
            conversion_request_id: request.conversion_request_id.clone(),
            conversion_terms: response.conversion_terms.clone(),
        })
    }

    pub fn is_fx(&self) -> bool {
        matches!(self, TransactionObject::Fx(_))
    }

    pub fn as_quote(&self) -> Option<&QuoteTransaction> {
        match self {
            TransactionObject::Quote(quote) => Some(quote),
            TransactionObject::Fx(_) => None,
        }
    }

    pub fn as_fx(&self) -> Option<&FxTransaction> {
        match self {
            TransactionObject::Fx(fx) => Some(fx),
            TransactionObject::Quote(_) => None,
        }
    }

    /// The timestamp the ILP `expiresAt` is derived from.
    pub fn expiration(&self) -> &str {
        match self {
            TransactionObject::Quote(quote) => &quote.expiration,
            TransactionObject::Fx(fx) => &fx.conversion_terms.expiration,
        }
    }

    /// Compact JSON, the exact text that gets embedded and hashed.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<QuoteTransaction> for TransactionObject {
    fn from(quote: QuoteTransaction) -> Self {
        TransactionObject::Quote(quote)
    }
}

impl From<FxTransaction> for TransactionObject {
    fn from(fx: FxTransaction) -> Self {
        TransactionObject::Fx(fx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
