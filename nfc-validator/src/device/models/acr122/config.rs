// nfc-validator/src/device/models/acr122/config.rs

//! ACR122U pseudo-APDU templates (ACR122U API v2.04)

use crate::constants::{SW_ERROR, SW_SUCCESS};

/// Get Data (UID): FF CA 00 00 00
pub const GET_UID: &[u8] = &[0xFF, 0xCA, 0x00, 0x00, 0x00];

/// Load Authentication Keys: FF 82 00 00 06 {key[6]}
pub const LOAD_AUTHENTICATION_KEYS: &[u8] = &[
    0xFF, 0x82, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
pub const LOAD_KEYS_KEY_OFFSET: usize = 5;

/// Read Binary Blocks: FF B0 00 {page} {len}
pub const READ_BINARY: &[u8] = &[0xFF, 0xB0, 0x00, 0x00, 0x00];

/// Read Value Block: FF B1 00 {block} 04
pub const READ_VALUE: &[u8] = &[0xFF, 0xB1, 0x00, 0x00, 0x04];

/// Update Binary Blocks: FF D6 00 {page} {n} {data[4]}
pub const UPDATE_BINARY: &[u8] = &[0xFF, 0xD6, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00];
pub const UPDATE_BINARY_DATA_OFFSET: usize = 5;
pub const UPDATE_BINARY_MAX_DATA: usize = 4;

/// Direct Transmit: FF 00 00 00 {Lc} {payload}
pub const DIRECT_TRANSMIT: &[u8] = &[0xFF, 0x00, 0x00, 0x00, 0x00];
pub const DIRECT_TRANSMIT_MAX_PAYLOAD: usize = 255;

/// P2 (page/block) and Le/Lc offsets shared by the templates above
pub const P2_OFFSET: usize = 3;
pub const LEN_OFFSET: usize = 4;

/// Status codes. `6A 81` is folded into the sum of its two bytes.
pub const STATUS_SUCCESS: u16 = SW_SUCCESS as u16;
pub const STATUS_ERROR: u16 = SW_ERROR as u16;
pub const STATUS_NOT_SUPPORTED: u16 = 0xEB;

/// Escape control code for reader-level commands (SCARD_CTL_CODE(3500))
pub const ESCAPE_CONTROL_FUNCTION: u32 = 3500;
