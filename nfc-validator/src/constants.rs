// nfc-validator/src/constants.rs
//! Protocol constants shared across the crate

/// ISO 7816 status word for a successful reader operation
pub const SW_SUCCESS: u8 = 0x90;

/// ISO 7816 status word reported by the ACR122 when an operation fails
pub const SW_ERROR: u8 = 0x63;

/// Second byte of the `6A 81` "function not supported" status word
pub const SW_NOT_SUPPORTED_TRAILER: u8 = 0x81;

/// TLV tag of an NDEF Message block (NFC Forum Type 2 Tag, 2.3.4)
pub const TLV_NDEF_MESSAGE: u8 = 0x03;

/// TLV tag of the Terminator block
pub const TLV_TERMINATOR: u8 = 0xFE;

/// Marker announcing the 3-byte TLV length form
pub const TLV_LONG_LENGTH_MARKER: u8 = 0xFF;

/// Largest value length that still fits the 1-byte TLV length form
pub const TLV_SHORT_LENGTH_MAX: usize = 0xFE;

/// Largest payload a short NDEF record can carry
pub const NDEF_SHORT_RECORD_MAX: usize = 0xFF;

/// Size of one NFC Forum Type 2 memory page
pub const PAGE_SIZE: usize = 4;

/// AES block size; per-card IVs are padded to this length
pub const CIPHER_BLOCK_SIZE: usize = 16;

/// Default receive buffer handed to the transport
pub const DEFAULT_RESPONSE_CAPACITY: usize = 255;
