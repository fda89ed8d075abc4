//! FSPIOP message records.
//!
//! These mirror the JSON bodies exchanged on the quotes, fxQuotes and
//! transfers resources. Field declaration order is wire order: the
//! transaction object built from these records is serialized and hashed, and
//! two independent implementations must produce identical bytes. Optional
//! fields are omitted, never written as `null`.
//!
//! Amounts stay strings end to end. Converting "0.10" to a float and back is
//! how money goes missing.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A monetary amount in major units, e.g. `{"amount": "12.50", "currency": "USD"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub amount: String,
    pub currency: String,
}

impl Amount {
    pub fn new(amount: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

// ---------------------------------------------------------------------------
// Extensions
// ---------------------------------------------------------------------------

/// Free-form key/value pair a scheme or FSP attaches to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub key: String,
    pub value: String,
}

/// FSPIOP `extensionList`: `{"extension": [{"key": ..., "value": ...}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionList {
    pub extension: Vec<Extension>,
}

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyIdInfo {
    /// `MSISDN`, `ACCOUNT_ID`, `IBAN`, ...
    pub party_id_type: String,
    pub party_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_sub_id_or_type: Option<String>,
    pub fsp_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_list: Option<ExtensionList>,
}

impl PartyIdInfo {
    pub fn new(
        party_id_type: impl Into<String>,
        party_identifier: impl Into<String>,
        fsp_id: impl Into<String>,
    ) -> Self {
        Self {
            party_id_type: party_id_type.into(),
            party_identifier: party_identifier.into(),
            party_sub_id_or_type: None,
            fsp_id: fsp_id.into(),
            extension_list: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complex_name: Option<ComplexName>,
    /// ISO 8601 date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

/// Payer or payee of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub party_id_info: PartyIdInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_classification_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_currencies: Option<Vec<String>>,
}

impl Party {
    pub fn new(party_id_info: PartyIdInfo) -> Self {
        Self {
            party_id_info,
            merchant_classification_code: None,
            name: None,
            personal_info: None,
            supported_currencies: None,
        }
    }

    /// The FSP holding this party's account.
    pub fn fsp_id(&self) -> &str {
        &self.party_id_info.fsp_id
    }
}

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundInfo {
    pub original_transaction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,
}

/// What kind of transaction this is and who initiated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionType {
    /// `DEPOSIT`, `WITHDRAWAL`, `TRANSFER`, `PAYMENT`, `REFUND`.
    pub scenario: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_scenario: Option<String>,
    /// `PAYER` or `PAYEE`.
    pub initiator: String,
    /// `CONSUMER`, `AGENT`, `BUSINESS`, `DEVICE`.
    pub initiator_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_info: Option<RefundInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_of_payments: Option<String>,
}

impl TransactionType {
    pub fn new(
        scenario: impl Into<String>,
        initiator: impl Into<String>,
        initiator_type: impl Into<String>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            sub_scenario: None,
            initiator: initiator.into(),
            initiator_type: initiator_type.into(),
            refund_info: None,
            balance_of_payments: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// Body of `POST /quotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub quote_id: String,
    pub transaction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_request_id: Option<String>,
    pub payee: Party,
    pub payer: Party,
    /// `SEND` or `RECEIVE`.
    pub amount_type: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<Amount>,
    pub transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

/// Body of `PUT /quotes/{id}` as produced by the payee side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub transfer_amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_receive_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_fsp_fee: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_fsp_commission: Option<Amount>,
    /// RFC 3339 timestamp after which the quote is void.
    pub expiration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ilp_packet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

// ---------------------------------------------------------------------------
// FX quotes
// ---------------------------------------------------------------------------

/// Currency with an amount that may still be unknown at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxMoney {
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxCharge {
    pub charge_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Amount>,
}

/// The terms of a currency conversion as agreed with the FXP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionTerms {
    pub conversion_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub determining_transfer_id: Option<String>,
    pub initiating_fsp: String,
    pub counter_party_fsp: String,
    pub amount_type: String,
    pub source_amount: FxMoney,
    pub target_amount: FxMoney,
    pub expiration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<Vec<FxCharge>>,
}

/// Body of `POST /fxQuotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxQuoteRequest {
    pub conversion_request_id: String,
    pub conversion_terms: ConversionTerms,
}

/// What the FXP backend returns: the request terms with amounts and charges
/// filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxQuoteResponse {
    pub conversion_terms: ConversionTerms,
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

/// Body of `POST /transfers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub transfer_id: String,
    pub payer_fsp: String,
    pub payee_fsp: String,
    pub amount: Amount,
    pub ilp_packet: String,
    pub condition: String,
    pub expiration: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
