//! ILPv4 codec.
//!
//! Packets are type-12 "prepare" packets with a fixed destination; routing
//! between FSPs happens on FSPIOP headers, not on ILP addresses. The
//! fulfilment is an HMAC of the transaction object's base64url text, so any
//! party holding the secret can recompute it from the packet alone.
//!
//! The condition goes into the packet, which means the fulfilment has to be
//! computed first: `tx → fulfilment → condition → packet`.

use std::fmt;
use std::sync::Arc;

use super::common;
use super::packet::{IlpPacket, IlpPrepare};
use super::{IlpCodec, IlpError, IlpOptions, IlpResponse, IlpVersion};
use crate::config::ILP_V4_ADDRESS;
use crate::crypto::{base64url_decode, base64url_encode};
use crate::logging::Logger;
use crate::transaction::TransactionObject;

pub struct IlpV4 {
    secret: String,
    logger: Arc<dyn Logger>,
}

impl IlpV4 {
    pub fn new(options: IlpOptions) -> Result<Self, IlpError> {
        let (secret, logger) = options.into_parts()?;
        Ok(Self { secret, logger })
    }

    fn fulfil_text(&self, text: &str) -> Result<String, IlpError> {
        common::hmac_fulfilment(&self.secret, text.as_bytes())
    }

    fn decode_prepare(&self, packet: &str) -> Result<IlpPrepare, IlpError> {
        let bytes = base64url_decode(packet)
            .map_err(|e| IlpError::MalformedPacket(format!("packet is not base64: {e}")))?;
        IlpPrepare::from_bytes(&bytes)
    }
}

impl fmt::Debug for IlpV4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IlpV4")
            .field("secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl IlpCodec for IlpV4 {
    fn version(&self) -> IlpVersion {
        IlpVersion::V4
    }

    fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    fn get_response_ilp(&self, tx: &TransactionObject) -> Result<IlpResponse, IlpError> {
        let text = common::transaction_text(tx)?;
        let fulfilment = self.fulfil_text(&text)?;
        let execution_condition = common::condition_bytes(&fulfilment)?;

        let prepare = IlpPrepare {
            amount: common::packet_amount(tx)?,
            expires_at: common::parse_expiration(tx.expiration())?,
            execution_condition,
            destination: ILP_V4_ADDRESS.to_string(),
            data: text.into_bytes(),
        };
        let ilp_packet = base64url_encode(prepare.to_bytes()?);
        self.logger.debug(&format!(
            "v4 prepare packet: amount={} expiresAt={} bytes={}",
            prepare.amount,
            prepare.expires_at.to_rfc3339(),
            ilp_packet.len()
        ));

        Ok(IlpResponse {
            fulfilment,
            condition: base64url_encode(execution_condition),
            ilp_packet,
        })
    }

    fn decode_ilp_packet(&self, packet: &str) -> Result<IlpPacket, IlpError> {
        Ok(IlpPacket::Prepare(self.decode_prepare(packet)?))
    }

    /// Recovers the transaction object from the packet and HMACs its text as
    /// embedded. Packets whose data is not a transaction object are rejected.
    ///
    /// The text is never re-serialized: a counterparty's object may carry
    /// fields or a key order the typed records would not reproduce.
    fn calculate_fulfil(&self, packet: &str) -> Result<String, IlpError> {
        let prepare = self.decode_prepare(packet)?;
        common::transaction_from_data(&prepare.data)?;
        self.fulfil_text(common::data_text(&prepare.data)?)
    }
}
