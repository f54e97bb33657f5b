// nfc-validator/src/device/models/ntag215/config.rs

//! NTAG215 commands and memory map (NTAG213/215/216 datasheet rev. 3.2)

/// PWD_AUTH: 1B {pwd[4]}, answered with the 2-byte PACK
pub const PWD_AUTH: &[u8] = &[0x1B, 0x00, 0x00, 0x00, 0x00];
pub const PWD_AUTH_PASSWORD_OFFSET: usize = 1;
pub const PWD_AUTH_RESPONSE_LEN: usize = 2;

/// GET_VERSION: 60, answered with 00 {vendor} {type} {subtype} {major}
/// {minor} {storage} {protocol}
pub const GET_VERSION: &[u8] = &[0x60];
pub const GET_VERSION_RESPONSE_HEADER: &[u8] = &[0x00];
pub const GET_VERSION_RESPONSE_LEN: usize = 8;
pub const GET_VERSION_STORAGE_OFFSET: usize = 6;

/// Storage size byte of each NTAG21x family member
pub const STORAGE_NTAG213: u8 = 0x0F;
pub const STORAGE_NTAG215: u8 = 0x11;
pub const STORAGE_NTAG216: u8 = 0x13;

/// Memory geometry
pub const MAX_WRITABLE_BYTES: usize = 4;
pub const MAX_READABLE_BYTES: usize = 16;
pub const FIRST_USER_PAGE: u8 = 0x04;
pub const LAST_USER_PAGE: u8 = 0x81;
pub const CONFIG_PAGE: u8 = 0x83;
pub const TOTAL_MEMORY: usize = 540;
