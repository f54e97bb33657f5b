// nfc-validator/src/ndef/record.rs
//! NDEF record framing (NDEF 1.0, 3.2).
//!
//! ```text
//! FLAGS  TYPE_LENGTH  PAYLOAD_LENGTH(1|4)  [ID_LENGTH]  TYPE  [ID]  PAYLOAD
//! ```

use crate::constants::NDEF_SHORT_RECORD_MAX;
use crate::ndef::record_type::RecordType;
use crate::protocol::parser::ByteReader;
use crate::{Error, Result};

const MB: u8 = 0x80;
const ME: u8 = 0x40;
const CF: u8 = 0x20;
const SR: u8 = 0x10;
const IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

/// Type Name Format field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Tnf {
    Empty = 0x00,
    #[default]
    WellKnown = 0x01,
    MediaType = 0x02,
    AbsoluteUri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl Tnf {
    pub fn from_bits(bits: u8) -> Self {
        match bits & TNF_MASK {
            0x00 => Tnf::Empty,
            0x01 => Tnf::WellKnown,
            0x02 => Tnf::MediaType,
            0x03 => Tnf::AbsoluteUri,
            0x04 => Tnf::External,
            0x05 => Tnf::Unknown,
            0x06 => Tnf::Unchanged,
            _ => Tnf::Reserved,
        }
    }
}

/// The six sub-fields packed into the first byte of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFlag {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunk: bool,
    pub short_record: bool,
    pub id_length_present: bool,
    pub tnf: Tnf,
}

impl Default for RecordFlag {
    /// Single short well-known record (`D1`).
    fn default() -> Self {
        Self {
            message_begin: true,
            message_end: true,
            chunk: false,
            short_record: true,
            id_length_present: false,
            tnf: Tnf::WellKnown,
        }
    }
}

impl RecordFlag {
    pub fn from_byte(b: u8) -> Self {
        Self {
            message_begin: b & MB != 0,
            message_end: b & ME != 0,
            chunk: b & CF != 0,
            short_record: b & SR != 0,
            id_length_present: b & IL != 0,
            tnf: Tnf::from_bits(b),
        }
    }

    pub fn to_byte(&self) -> u8 {
        let bit = |set: bool, mask: u8| if set { mask } else { 0 };
        bit(self.message_begin, MB)
            | bit(self.message_end, ME)
            | bit(self.chunk, CF)
            | bit(self.short_record, SR)
            | bit(self.id_length_present, IL)
            | self.tnf as u8
    }
}

/// A single NDEF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    flag: RecordFlag,
    type_length: u8,
    payload_length: u32,
    type_identifier: u8,
    id: Option<Vec<u8>>,
    record_type: RecordType,
}

impl NdefRecord {
    pub fn new(record_type: RecordType) -> Self {
        Self::with_flag(record_type, RecordFlag::default())
    }

    /// Build a record with explicit flags. The short-record bit is cleared
    /// whenever the payload does not fit a one-byte length.
    pub fn with_flag(record_type: RecordType, mut flag: RecordFlag) -> Self {
        let payload_length = record_type.to_bytes().len();
        if payload_length > NDEF_SHORT_RECORD_MAX {
            flag.short_record = false;
        }
        flag.id_length_present = false;
        Self {
            flag,
            type_length: record_type.type_length(),
            payload_length: payload_length as u32,
            type_identifier: record_type.type_identifier(),
            id: None,
            record_type,
        }
    }

    /// Attach an ID field; sets the IL bit.
    pub fn with_id(mut self, id: Vec<u8>) -> Self {
        self.flag.id_length_present = true;
        self.id = Some(id);
        self
    }

    pub fn flag(&self) -> RecordFlag {
        self.flag
    }

    pub fn type_length(&self) -> u8 {
        self.type_length
    }

    /// PAYLOAD_LENGTH as declared in the header, record-type header
    /// included.
    pub fn payload_length(&self) -> usize {
        self.payload_length as usize
    }

    pub fn type_identifier(&self) -> u8 {
        self.type_identifier
    }

    pub fn id(&self) -> Option<&[u8]> {
        self.id.as_deref()
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn record_type_mut(&mut self) -> &mut RecordType {
        &mut self.record_type
    }

    /// Declared payload length minus the record-type header.
    pub fn content_length(&self) -> Result<usize> {
        self.payload_length()
            .checked_sub(self.record_type.header_length())
            .ok_or_else(|| {
                Error::MalformedMessage(format!(
                    "payload length {} shorter than the record type header",
                    self.payload_length
                ))
            })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let id_len = match &self.id {
            Some(id) => Some(u8::try_from(id.len()).map_err(|_| Error::InvalidLength {
                expected: usize::from(u8::MAX),
                actual: id.len(),
            })?),
            None => None,
        };

        let mut out = vec![self.flag.to_byte(), self.type_length];
        if self.flag.short_record {
            out.push(self.payload_length as u8);
        } else {
            out.extend_from_slice(&self.payload_length.to_be_bytes());
        }
        if let Some(len) = id_len {
            out.push(len);
        }
        out.push(self.type_identifier);
        if let Some(id) = &self.id {
            out.extend_from_slice(id);
        }
        out.extend(self.record_type.to_bytes());
        Ok(out)
    }

    /// Parse a record header plus the record-type header. The content is
    /// left empty; callers feed it separately.
    pub fn parse_header(reader: &mut ByteReader<'_>) -> Result<Self> {
        let flag = RecordFlag::from_byte(reader.u8()?);
        let type_length = reader.u8()?;
        let payload_length = if flag.short_record {
            u32::from(reader.u8()?)
        } else {
            reader.be_u32()?
        };
        let id_length = if flag.id_length_present {
            Some(reader.u8()?)
        } else {
            None
        };
        let type_identifier = reader.u8()?;
        let id = match id_length {
            Some(len) => Some(reader.take(usize::from(len))?.to_vec()),
            None => None,
        };

        let mut record_type = RecordType::from_identifier(type_identifier)?;
        record_type.parse_header(reader)?;

        Ok(Self {
            flag,
            type_length,
            payload_length,
            type_identifier,
            id,
            record_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndef::record_type::TextRecord;

    fn text(len: usize) -> RecordType {
        RecordType::Text(TextRecord::new(vec![b'x'; len]))
    }

    #[test]
    fn flag_byte_packing() {
        assert_eq!(RecordFlag::default().to_byte(), 0xD1);
        let flag = RecordFlag::from_byte(0xD1);
        assert!(flag.message_begin && flag.message_end && flag.short_record);
        assert!(!flag.chunk && !flag.id_length_present);
        assert_eq!(flag.tnf, Tnf::WellKnown);
        assert_eq!(RecordFlag::from_byte(0x2C).to_byte(), 0x2C);
    }

    #[test]
    fn short_record_header() {
        let record = NdefRecord::new(RecordType::Text(TextRecord::new(b"abcde".to_vec())));
        assert_eq!(
            record.to_bytes().unwrap(),
            vec![0xD1, 0x01, 0x08, 0x54, 0x02, 0x65, 0x6E, 0x61, 0x62, 0x63, 0x64, 0x65]
        );
        assert_eq!(record.content_length().unwrap(), 5);
    }

    #[test]
    fn long_payload_clears_short_record() {
        let record = NdefRecord::new(text(300));
        assert!(!record.flag().short_record);
        let bytes = record.to_bytes().unwrap();
        assert_eq!(bytes[0], 0xC1);
        // 303 = 300 + status byte + "en"
        assert_eq!(&bytes[2..6], &[0x00, 0x00, 0x01, 0x2F]);
        assert_eq!(bytes[6], 0x54);
    }

    #[test]
    fn id_field_round_trip() {
        let record = NdefRecord::new(text(4)).with_id(vec![0x07]);
        let bytes = record.to_bytes().unwrap();
        assert_eq!(&bytes[..6], &[0xD9, 0x01, 0x07, 0x01, 0x54, 0x07]);
        let parsed = NdefRecord::parse_header(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(parsed.id(), Some(&[0x07][..]));
        assert_eq!(parsed.content_length().unwrap(), 4);
    }

    #[test]
    fn declared_length_below_type_header_is_malformed() {
        let bytes = [0xD1, 0x01, 0x01, 0x54, 0x02, b'e', b'n'];
        let parsed = NdefRecord::parse_header(&mut ByteReader::new(&bytes)).unwrap();
        assert!(matches!(
            parsed.content_length(),
            Err(Error::MalformedMessage(_))
        ));
    }
}
