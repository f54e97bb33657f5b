// nfc-validator/src/ndef/tlv.rs
//! TLV blocks of an NFC Forum Type 2 tag (T2T 1.1, 2.3).
//!
//! The length field is absent for the Terminator, one byte for values
//! shorter than 255 bytes and three bytes (`FF hi lo`) otherwise.

use crate::constants::{
    TLV_LONG_LENGTH_MARKER, TLV_NDEF_MESSAGE, TLV_SHORT_LENGTH_MAX, TLV_TERMINATOR,
};
use crate::protocol::parser::{be_u16_at, byte_at};
use crate::{Error, Result};

/// Largest value the 3-byte length form can carry.
pub const TLV_MAX_LENGTH: usize = 0xFFFF;

/// Encode a value length into its 1- or 3-byte TLV form.
pub fn value_length_bytes(len: usize) -> Result<Vec<u8>> {
    if len <= TLV_SHORT_LENGTH_MAX {
        Ok(vec![len as u8])
    } else if len <= TLV_MAX_LENGTH {
        let [hi, lo] = (len as u16).to_be_bytes();
        Ok(vec![TLV_LONG_LENGTH_MARKER, hi, lo])
    } else {
        Err(Error::CapacityExceeded {
            required: len,
            available: TLV_MAX_LENGTH,
        })
    }
}

/// Decode a TLV length field at the start of `bytes`. Returns the length and
/// the number of bytes the field occupied.
pub fn length_from_bytes(bytes: &[u8]) -> Result<(usize, usize)> {
    let first = byte_at(bytes, 0)?;
    if first == TLV_LONG_LENGTH_MARKER {
        Ok((usize::from(be_u16_at(bytes, 1)?), 3))
    } else {
        Ok((usize::from(first), 1))
    }
}

/// One tag-length-value block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvBlock {
    tag: u8,
    value: Vec<u8>,
}

impl TlvBlock {
    pub fn ndef_message(value: Vec<u8>) -> Self {
        Self {
            tag: TLV_NDEF_MESSAGE,
            value,
        }
    }

    pub fn terminator() -> Self {
        Self {
            tag: TLV_TERMINATOR,
            value: Vec::new(),
        }
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn is_terminator(&self) -> bool {
        self.tag == TLV_TERMINATOR
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = vec![self.tag];
        if !self.is_terminator() {
            out.extend(value_length_bytes(self.value.len())?);
            out.extend_from_slice(&self.value);
        }
        Ok(out)
    }
}
