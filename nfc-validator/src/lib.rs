// nfc-validator/src/lib.rs

//! nfc-validator
//!
//! Fare validation for NTAG215 tickets read through an ACR122 reader with a
//! PN532 controller: layered command composition, the NDEF/TLV codec and the
//! encrypted on-card ticket state machine.
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod logging;
pub mod ndef;
pub mod prelude;
pub mod protocol;
pub mod reader;
pub mod test_support;
pub mod ticketing;
pub mod transport;
pub mod types;
pub mod utils;
pub mod validator;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
