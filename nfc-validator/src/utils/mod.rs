// nfc-validator/src/utils/mod.rs
//! Small, reusable helpers: hex formatting for wire traces and the byte
//! trimming used before every response is classified.

pub mod bytes;
pub mod hex;

pub use self::bytes::*;
pub use self::hex::*;
