//! # Transaction Module
//!
//! The FSPIOP message records and the transaction object derived from them.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    Amount, Party, TransactionType, quote / fxQuote / transfer bodies
//! builder.rs  TransactionObject: the canonical record embedded in ILP packets
//! ```
//!
//! ## Design Decisions
//!
//! - Amounts are decimal strings everywhere in this module. Scaling to minor
//!   units happens once, inside the ILP codec, with decimal arithmetic.
//! - Struct field order is wire order. The transaction object is serialized
//!   with `serde_json` and its bytes are hashed, so declaration order is part
//!   of the protocol.

pub mod builder;
pub mod types;

pub use builder::{FxTransaction, QuoteTransaction, TransactionObject};
pub use types::{
    Amount, ComplexName, ConversionTerms, Extension, ExtensionList, FxCharge, FxMoney,
    FxQuoteRequest, FxQuoteResponse, Party, PartyIdInfo, PersonalInfo, QuoteRequest,
    QuoteResponse, RefundInfo, TransactionType, TransferRequest,
};
