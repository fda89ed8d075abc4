// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # FSPIOP Protocol Core Library
//!
//! The two pieces of an interoperability-network client that have to be
//! bit-exact with every counterparty: the Interledger packet attached to a
//! quote, and the detached signature on every FSPIOP request.
//!
//! ## Architecture
//!
//! - **ilp**: v1 and v4 packet codecs, fulfilment/condition derivation,
//!   transfer-vs-packet checks, and the factory that picks a codec.
//! - **jws**: RS256 signing of outbound requests and validation of inbound
//!   ones, including the header cross-check.
//! - **transaction**: FSPIOP quote, FX quote and transfer bodies, and the
//!   transaction object built from them.
//! - **currency**: ISO 4217 minor-unit table for amount scaling.
//! - **crypto**: SHA-256, HMAC-SHA256, base64 and base64url.
//! - **logging**: the `Logger` seam the engines report through.
//! - **config**: wire constants, header names, `IlpConfig`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use fspiop_protocol::ilp::{self, IlpOptions, IlpVersion};
//! use fspiop_protocol::logging::TracingLogger;
//! # fn run(request: &fspiop_protocol::transaction::QuoteRequest,
//! #        response: &fspiop_protocol::transaction::QuoteResponse)
//! #        -> Result<(), fspiop_protocol::ilp::IlpError> {
//! let engine = ilp::create(
//!     IlpVersion::V4,
//!     IlpOptions::new("shared-secret", Arc::new(TracingLogger::default())),
//! )?;
//! let artifacts = engine.get_quote_response_ilp(request, response)?;
//! assert!(engine.validate_fulfil(&artifacts.fulfilment, &artifacts.condition));
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Philosophy
//!
//! 1. No I/O. Every operation is a synchronous function of its inputs.
//! 2. Amounts stay decimal strings until the single point where they are
//!    scaled, and scaling never touches floating point.
//! 3. Malformed input is an error; a well-formed mismatch is `false`.

pub mod config;
pub mod crypto;
pub mod currency;
pub mod ilp;
pub mod jws;
pub mod logging;
pub mod transaction;
