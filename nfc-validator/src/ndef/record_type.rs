// nfc-validator/src/ndef/record_type.rs
//! Record Type Definitions (NFC Forum RTD) and the registry that resolves
//! them from the type identifier byte.

use crate::protocol::command::Payload;
use crate::protocol::parser::ByteReader;
use crate::utils::clamp;
use crate::{Error, Result};

/// Well-known type "T"
pub const RTD_TEXT: u8 = 0x54;
/// Well-known type "U"
pub const RTD_URI: u8 = 0x55;

/// Language code of English ("en")
pub const LANGUAGE_EN: &[u8] = b"en";
/// Language code of Italian ("it")
pub const LANGUAGE_IT: &[u8] = b"it";

const TEXT_UTF16_BIT: u8 = 0x80;
const TEXT_LANGUAGE_LENGTH_MAX: u8 = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16,
}

/// Status byte of a Text record: encoding bit and language code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFlag {
    pub encoding: TextEncoding,
    pub language_length: u8,
}

impl TextFlag {
    pub fn new(encoding: TextEncoding, language_length: u8) -> Self {
        Self {
            encoding,
            language_length: clamp(language_length, 0, TEXT_LANGUAGE_LENGTH_MAX),
        }
    }

    pub fn from_byte(b: u8) -> Self {
        let encoding = if b & TEXT_UTF16_BIT != 0 {
            TextEncoding::Utf16
        } else {
            TextEncoding::Utf8
        };
        Self::new(encoding, b & TEXT_LANGUAGE_LENGTH_MAX)
    }

    pub fn to_byte(&self) -> u8 {
        let bit = match self.encoding {
            TextEncoding::Utf8 => 0,
            TextEncoding::Utf16 => TEXT_UTF16_BIT,
        };
        bit | self.language_length
    }
}

/// Text record: status byte, language code, then the text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    encoding: TextEncoding,
    language: Vec<u8>,
    text: Vec<u8>,
}

impl Default for TextRecord {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TextRecord {
    /// UTF-8 text tagged as English.
    pub fn new(text: Vec<u8>) -> Self {
        Self::with_language(text, LANGUAGE_EN)
    }

    pub fn with_language(text: Vec<u8>, language: &[u8]) -> Self {
        let len = usize::from(TEXT_LANGUAGE_LENGTH_MAX).min(language.len());
        Self {
            encoding: TextEncoding::Utf8,
            language: language[..len].to_vec(),
            text,
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn language(&self) -> &[u8] {
        &self.language
    }

    pub fn text_bytes(&self) -> &[u8] {
        &self.text
    }

    fn flag(&self) -> TextFlag {
        TextFlag::new(self.encoding, self.language.len() as u8)
    }

    fn decode_text(&self) -> String {
        match self.encoding {
            TextEncoding::Utf8 => String::from_utf8_lossy(&self.text).into_owned(),
            TextEncoding::Utf16 => {
                let units = self
                    .text
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]));
                char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            }
        }
    }
}

/// URI identifier codes (NFC Forum URI RTD, 3.2.2)
const URI_PREFIXES: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// URI record: one identifier code abbreviating the scheme, then the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriRecord {
    identifier: u8,
    uri: Vec<u8>,
}

impl UriRecord {
    /// Pick the longest known prefix of `uri` and abbreviate it.
    pub fn new(uri: &str) -> Self {
        let (code, prefix) = URI_PREFIXES
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, p)| uri.starts_with(*p))
            .max_by_key(|(_, p)| p.len())
            .unwrap_or((0, &""));
        Self {
            identifier: code as u8,
            uri: uri[prefix.len()..].as_bytes().to_vec(),
        }
    }

    pub fn identifier(&self) -> u8 {
        self.identifier
    }

    pub fn prefix(&self) -> &'static str {
        URI_PREFIXES
            .get(usize::from(self.identifier))
            .copied()
            .unwrap_or("")
    }

    pub fn uri(&self) -> String {
        format!("{}{}", self.prefix(), String::from_utf8_lossy(&self.uri))
    }
}

/// Payload type of an NDEF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordType {
    Text(TextRecord),
    Uri(UriRecord),
}

type Constructor = fn() -> RecordType;

/// Closed table of the record types this crate understands.
const REGISTRY: [(u8, Constructor); 2] = [
    (RTD_TEXT, || RecordType::Text(TextRecord::default())),
    (RTD_URI, || RecordType::Uri(UriRecord::default())),
];

impl RecordType {
    /// Fresh, empty record type for a type identifier byte.
    pub fn from_identifier(identifier: u8) -> Result<Self> {
        REGISTRY
            .iter()
            .find(|(id, _)| *id == identifier)
            .map(|(_, make)| make())
            .ok_or(Error::UnknownRecordType(identifier))
    }

    pub fn type_identifier(&self) -> u8 {
        match self {
            RecordType::Text(_) => RTD_TEXT,
            RecordType::Uri(_) => RTD_URI,
        }
    }

    /// Length of the TYPE field; all well-known types here are one byte.
    pub fn type_length(&self) -> u8 {
        1
    }

    /// Bytes of record-type overhead at the start of the record payload.
    pub fn header_length(&self) -> usize {
        match self {
            RecordType::Text(t) => 1 + t.language.len(),
            RecordType::Uri(_) => 1,
        }
    }

    /// Full record payload: type header plus content.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            RecordType::Text(t) => {
                let mut out = vec![t.flag().to_byte()];
                out.extend_from_slice(&t.language);
                out.extend_from_slice(&t.text);
                out
            }
            RecordType::Uri(u) => {
                let mut out = vec![u.identifier];
                out.extend_from_slice(&u.uri);
                out
            }
        }
    }

    /// Read the type header from `reader`, discarding any content gathered
    /// so far.
    pub fn parse_header(&mut self, reader: &mut ByteReader<'_>) -> Result<()> {
        match self {
            RecordType::Text(t) => {
                let flag = TextFlag::from_byte(reader.u8()?);
                t.encoding = flag.encoding;
                t.language = reader.take(usize::from(flag.language_length))?.to_vec();
                t.text.clear();
            }
            RecordType::Uri(u) => {
                u.identifier = reader.u8()?;
                u.uri.clear();
            }
        }
        Ok(())
    }

    /// Append content bytes, used by streaming reads.
    pub fn append_payload(&mut self, bytes: &[u8]) {
        match self {
            RecordType::Text(t) => t.text.extend_from_slice(bytes),
            RecordType::Uri(u) => u.uri.extend_from_slice(bytes),
        }
    }

    /// Content bytes without the type header.
    pub fn content(&self) -> &[u8] {
        match self {
            RecordType::Text(t) => &t.text,
            RecordType::Uri(u) => &u.uri,
        }
    }

    pub fn payload(&self) -> Payload {
        match self {
            RecordType::Text(t) => Payload::with_text(t.text.clone(), t.decode_text()),
            RecordType::Uri(u) => Payload::with_text(u.uri.clone(), u.uri()),
        }
    }
}
