// nfc-validator/src/ndef/mod.rs
//! NFC Data Exchange Format codec: TLV framing, record headers, record
//! types and block-streamed reads.

pub mod message;
pub mod record;
pub mod record_type;
pub mod stream;
pub mod tlv;

pub use message::NdefMessage;
pub use record::{NdefRecord, RecordFlag, Tnf};
pub use record_type::{RecordType, TextEncoding, TextRecord, UriRecord};
pub use stream::{BlockSource, NdefReadout, NdefStreamReader};
pub use tlv::{TlvBlock, length_from_bytes, value_length_bytes};
