//! Legacy ILP codec.
//!
//! Packets are type-1 "payment" packets addressed to the payee
//! (`g.<fsp>.<type>.<id>`). The fulfilment is an HMAC of the base64url
//! packet text itself, so it can only be recomputed from the exact packet
//! string that went out with the quote.

use std::fmt;
use std::sync::Arc;

use super::common;
use super::packet::{IlpPacket, IlpPayment};
use super::{IlpCodec, IlpError, IlpOptions, IlpResponse, IlpVersion};
use crate::crypto::{base64url_decode, base64url_encode};
use crate::logging::Logger;
use crate::transaction::TransactionObject;

pub struct IlpV1 {
    secret: String,
    logger: Arc<dyn Logger>,
}

impl IlpV1 {
    pub fn new(options: IlpOptions) -> Result<Self, IlpError> {
        let (secret, logger) = options.into_parts()?;
        Ok(Self { secret, logger })
    }

    fn encode_packet(&self, tx: &TransactionObject) -> Result<String, IlpError> {
        let payment = IlpPayment {
            amount: common::packet_amount(tx)?,
            account: common::v1_address(tx)?,
            data: common::transaction_text(tx)?.into_bytes(),
        };
        self.logger.debug(&format!(
            "v1 payment packet: amount={} account={}",
            payment.amount, payment.account
        ));
        Ok(base64url_encode(payment.to_bytes()))
    }
}

impl fmt::Debug for IlpV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IlpV1")
            .field("secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl IlpCodec for IlpV1 {
    fn version(&self) -> IlpVersion {
        IlpVersion::V1
    }

    fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    fn get_response_ilp(&self, tx: &TransactionObject) -> Result<IlpResponse, IlpError> {
        let ilp_packet = self.encode_packet(tx)?;
        let fulfilment = self.calculate_fulfil(&ilp_packet)?;
        let condition = common::condition_from_fulfilment(&fulfilment)?;
        Ok(IlpResponse {
            fulfilment,
            condition,
            ilp_packet,
        })
    }

    fn decode_ilp_packet(&self, packet: &str) -> Result<IlpPacket, IlpError> {
        let bytes = base64url_decode(packet)
            .map_err(|e| IlpError::MalformedPacket(format!("packet is not base64: {e}")))?;
        Ok(IlpPacket::Payment(IlpPayment::from_bytes(&bytes)?))
    }

    /// HMAC over the packet text as given. A re-encoded copy of the same
    /// packet (padding added, other alphabet) yields a different fulfilment.
    fn calculate_fulfil(&self, packet: &str) -> Result<String, IlpError> {
        common::hmac_fulfilment(&self.secret, packet.as_bytes())
    }
}
