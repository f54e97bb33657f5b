// nfc-validator/src/device/models/pn532/config.rs

//! PN532 framing commands (UM0701-02)

/// InCommunicateThru: D4 42 {data}
pub const IN_COMMUNICATE_THRU: &[u8] = &[0xD4, 0x42];
pub const IN_COMMUNICATE_THRU_RESPONSE: &[u8] = &[0xD5, 0x43];

/// InDataExchange on logical target 1: D4 40 01 {data}
pub const IN_DATA_EXCHANGE: &[u8] = &[0xD4, 0x40, 0x01];
pub const IN_DATA_EXCHANGE_RESPONSE: &[u8] = &[0xD5, 0x41];

/// Header (2) + status byte
pub const MIN_RESPONSE_LEN: usize = 3;
pub const STATUS_OFFSET: usize = 2;

/// Bits 6 (MI) and 7 (NAD) of the status byte are flags, not error code
pub const STATUS_ERROR_MASK: u8 = 0x3F;
