// nfc-validator/src/ndef/message.rs
//! NDEF Message TLV carrying one record.

use crate::constants::{TLV_NDEF_MESSAGE, TLV_TERMINATOR};
use crate::ndef::record::NdefRecord;
use crate::ndef::record_type::{RecordType, TextRecord, UriRecord};
use crate::ndef::tlv::{TlvBlock, length_from_bytes, value_length_bytes};
use crate::protocol::command::Payload;
use crate::protocol::parser::ByteReader;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NdefMessage {
    record: Option<NdefRecord>,
    /// TLV length field
    length: usize,
    /// Bytes from the TLV tag to the first content byte
    total_header_length: usize,
    content_payload_length: usize,
    absorbed: usize,
}

impl NdefMessage {
    pub fn new(record: NdefRecord) -> Result<Self> {
        let length = record.to_bytes()?.len();
        let content_payload_length = record.content_length()?;
        let total_header_length = 1 + value_length_bytes(length)?.len() + length
            - content_payload_length;
        Ok(Self {
            length,
            total_header_length,
            content_payload_length,
            absorbed: content_payload_length,
            record: Some(record),
        })
    }

    /// English UTF-8 Text record around `bytes`.
    pub fn text(bytes: &[u8]) -> Result<Self> {
        Self::new(NdefRecord::new(RecordType::Text(TextRecord::new(
            bytes.to_vec(),
        ))))
    }

    pub fn uri(uri: &str) -> Result<Self> {
        Self::new(NdefRecord::new(RecordType::Uri(UriRecord::new(uri))))
    }

    /// Parse the TLV and record headers at the start of `bytes`.
    ///
    /// A buffer starting with any other TLV tag yields an empty message.
    /// The record content is left empty; feed it with [`absorb`].
    ///
    /// [`absorb`]: NdefMessage::absorb
    pub fn parse_header(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::MalformedMessage("empty buffer".into()));
        }
        if bytes[0] != TLV_NDEF_MESSAGE {
            return Ok(Self::default());
        }

        let (length, field_len) = length_from_bytes(&bytes[1..])?;
        let mut reader = ByteReader::new(&bytes[1 + field_len..]);
        if length == 0 {
            return Ok(Self {
                length,
                total_header_length: 1 + field_len,
                ..Self::default()
            });
        }

        let record = NdefRecord::parse_header(&mut reader)?;
        let content_payload_length = record.content_length()?;
        Ok(Self {
            length,
            total_header_length: 1 + field_len + reader.position(),
            content_payload_length,
            absorbed: 0,
            record: Some(record),
        })
    }

    /// Parse a complete message held in one buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut message = Self::parse_header(bytes)?;
        if message.record.is_some() {
            let content = bytes.get(message.total_header_length..).unwrap_or(&[]);
            message.absorb(content)?;
            if !message.is_complete() {
                return Err(Error::MalformedMessage(format!(
                    "payload truncated: {} of {} bytes",
                    message.absorbed, message.content_payload_length
                )));
            }
            if content.len() == message.content_payload_length {
                return Err(Error::MalformedMessage("missing terminator".into()));
            }
        }
        Ok(message)
    }

    /// Feed content bytes. When the chunk runs past the declared length the
    /// byte right after the content must be the Terminator TLV; the rest of
    /// the chunk is dropped. This holds for empty content too, so a chunk
    /// fed to a complete message must start with the terminator.
    pub fn absorb(&mut self, chunk: &[u8]) -> Result<usize> {
        let remaining = self.remaining();
        let Some(record) = self.record.as_mut() else {
            return Ok(0);
        };
        if let Some(&next) = chunk.get(remaining) {
            if next != TLV_TERMINATOR {
                return Err(Error::MalformedMessage(format!(
                    "expected terminator after payload, found {:#04x}",
                    next
                )));
            }
        }
        let take = remaining.min(chunk.len());
        record.record_type_mut().append_payload(&chunk[..take]);
        self.absorbed += take;
        Ok(take)
    }

    pub fn remaining(&self) -> usize {
        self.content_payload_length - self.absorbed
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }

    pub fn record(&self) -> Option<&NdefRecord> {
        self.record.as_ref()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn total_header_length(&self) -> usize {
        self.total_header_length
    }

    pub fn content_payload_length(&self) -> usize {
        self.content_payload_length
    }

    pub fn payload(&self) -> Option<Payload> {
        self.record.as_ref().map(|r| r.record_type().payload())
    }

    /// TLV-framed message followed by the Terminator TLV.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let value = match &self.record {
            Some(record) => record.to_bytes()?,
            None => Vec::new(),
        };
        let mut out = TlvBlock::ndef_message(value).to_bytes()?;
        out.extend(TlvBlock::terminator().to_bytes()?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABCDE: [u8; 15] = [
        0x03, 0x0C, 0xD1, 0x01, 0x08, 0x54, 0x02, 0x65, 0x6E, 0x61, 0x62, 0x63, 0x64, 0x65, 0xFE,
    ];

    #[test]
    fn encodes_text_message() {
        let msg = NdefMessage::text(b"abcde").unwrap();
        assert_eq!(msg.to_bytes().unwrap(), ABCDE.to_vec());
        assert_eq!(msg.length(), 12);
        assert_eq!(msg.total_header_length(), 9);
    }

    #[test]
    fn header_only_parse() {
        let msg = NdefMessage::parse_header(&ABCDE).unwrap();
        assert_eq!(msg.total_header_length(), 9);
        assert_eq!(msg.content_payload_length(), 5);
        assert_eq!(msg.remaining(), 5);
        assert_eq!(msg.record().unwrap().type_identifier(), 0x54);
    }

    #[test]
    fn full_parse() {
        let msg = NdefMessage::from_bytes(&ABCDE).unwrap();
        assert_eq!(msg.payload().unwrap().text(), Some("abcde"));
        assert!(msg.is_complete());
    }

    #[test]
    fn empty_buffer_is_malformed() {
        assert!(matches!(
            NdefMessage::from_bytes(&[]),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn other_tlv_tag_yields_empty_message() {
        let msg = NdefMessage::from_bytes(&[0x01, 0x03, 0xA0, 0x10, 0x44]).unwrap();
        assert!(msg.is_empty());
        assert!(msg.payload().is_none());
    }

    #[test]
    fn zero_length_tlv() {
        let msg = NdefMessage::from_bytes(&[0x03, 0x00, 0xFE]).unwrap();
        assert!(msg.is_empty());
        assert_eq!(msg.total_header_length(), 2);
    }

    #[test]
    fn missing_terminator() {
        let mut bytes = ABCDE.to_vec();
        bytes[14] = 0x00;
        bytes.push(0x00);
        assert!(matches!(
            NdefMessage::from_bytes(&bytes),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn empty_text_still_needs_terminator() {
        let mut bytes = NdefMessage::text(b"").unwrap().to_bytes().unwrap();
        assert_eq!(bytes.last(), Some(&TLV_TERMINATOR));
        assert!(NdefMessage::from_bytes(&bytes).unwrap().is_complete());

        let last = bytes.len() - 1;
        bytes[last] = 0x00;
        bytes.push(0x11);
        assert!(matches!(
            NdefMessage::from_bytes(&bytes),
            Err(Error::MalformedMessage(_))
        ));
        bytes.truncate(last);
        assert!(matches!(
            NdefMessage::from_bytes(&bytes),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn content_ending_the_buffer_lacks_terminator() {
        assert!(matches!(
            NdefMessage::from_bytes(&ABCDE[..14]),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn truncated_payload() {
        assert!(matches!(
            NdefMessage::from_bytes(&ABCDE[..11]),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn long_message_uses_three_byte_lengths() {
        let body = vec![b'z'; 400];
        let bytes = NdefMessage::text(&body).unwrap().to_bytes().unwrap();
        // TLV: 03 FF 01 9A, record: C1 01 00 00 01 93 54 02 65 6E
        assert_eq!(&bytes[..4], &[0x03, 0xFF, 0x01, 0x9A]);
        assert_eq!(&bytes[4..10], &[0xC1, 0x01, 0x00, 0x00, 0x01, 0x93]);
        let msg = NdefMessage::from_bytes(&bytes).unwrap();
        assert_eq!(msg.total_header_length(), 14);
        assert_eq!(msg.payload().unwrap().bytes(), body.as_slice());
    }

    #[test]
    fn uri_message_round_trip() {
        let bytes = NdefMessage::uri("https://example.org").unwrap().to_bytes().unwrap();
        let msg = NdefMessage::from_bytes(&bytes).unwrap();
        assert_eq!(msg.payload().unwrap().text(), Some("https://example.org"));
    }
}
