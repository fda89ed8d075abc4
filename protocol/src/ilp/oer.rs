//! Octet Encoding Rules, the subset ILP packets use.
//!
//! Only three shapes appear on the wire: fixed-width big-endian integers,
//! fixed-length octet runs, and variable-length octet strings with a length
//! determinant. The determinant is a single byte for lengths below 128;
//! longer strings write `0x80 | n` followed by the length in `n` big-endian
//! bytes, with no leading zero bytes.
//!
//! The reader is strict: non-minimal length determinants and truncated input
//! are rejected. Two encodings of the same packet would hash differently, and
//! the fulfilment of a v1 packet is derived from its encoded text.

use bytes::{Buf, BufMut, BytesMut};

use super::error::IlpError;

const LENGTH_PREFIX_LONG_FORM: u8 = 0x80;

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub(crate) struct OerWriter {
    buf: BytesMut,
}

impl OerWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub(crate) fn write_u64(&mut self, value: u64) {
        self.buf.put_u64(value);
    }

    /// Raw bytes with no length determinant.
    pub(crate) fn write_octets(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub(crate) fn write_var_octet_string(&mut self, bytes: &[u8]) {
        self.write_length(bytes.len());
        self.buf.put_slice(bytes);
    }

    fn write_length(&mut self, len: usize) {
        if len < usize::from(LENGTH_PREFIX_LONG_FORM) {
            self.buf.put_u8(len as u8);
            return;
        }
        let be = (len as u64).to_be_bytes();
        let skip = be.iter().take_while(|b| **b == 0).count();
        let significant = &be[skip..];
        self.buf.put_u8(LENGTH_PREFIX_LONG_FORM | significant.len() as u8);
        self.buf.put_slice(significant);
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct OerReader<'a> {
    buf: &'a [u8],
}

impl<'a> OerReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn require(&self, needed: usize, what: &str) -> Result<(), IlpError> {
        if self.buf.remaining() < needed {
            return Err(IlpError::MalformedPacket(format!(
                "truncated {what}: need {needed} bytes, have {}",
                self.buf.remaining()
            )));
        }
        Ok(())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, IlpError> {
        self.require(1, "u8")?;
        Ok(self.buf.get_u8())
    }

    pub(crate) fn read_u64(&mut self) -> Result<u64, IlpError> {
        self.require(8, "u64")?;
        Ok(self.buf.get_u64())
    }

    pub(crate) fn read_octets(&mut self, len: usize) -> Result<&'a [u8], IlpError> {
        self.require(len, "octets")?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    pub(crate) fn read_var_octet_string(&mut self) -> Result<&'a [u8], IlpError> {
        let len = self.read_length()?;
        self.read_octets(len)
    }

    fn read_length(&mut self) -> Result<usize, IlpError> {
        let first = self.read_u8()?;
        if first & LENGTH_PREFIX_LONG_FORM == 0 {
            return Ok(usize::from(first));
        }

        let width = usize::from(first & !LENGTH_PREFIX_LONG_FORM);
        if width == 0 || width > 8 {
            return Err(IlpError::MalformedPacket(format!(
                "invalid length determinant width {width}"
            )));
        }
        let bytes = self.read_octets(width)?;
        if bytes[0] == 0 {
            return Err(IlpError::MalformedPacket(
                "length determinant has leading zero byte".to_string(),
            ));
        }
        let len = bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
        if len < u64::from(LENGTH_PREFIX_LONG_FORM) {
            return Err(IlpError::MalformedPacket(format!(
                "length {len} must use the short form"
            )));
        }
        usize::try_from(len)
            .map_err(|_| IlpError::MalformedPacket(format!("length {len} does not fit in memory")))
    }
}
