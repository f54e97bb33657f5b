// nfc-validator/src/ticketing/mod.rs
//! Fare validation on top of the NDEF layer.
//!
//! The ticket is the only state and it lives on the card: a JSON record,
//! AES-CBC encrypted with the card UID as IV, stored as the content of a
//! single Text record.

pub mod audit;
pub mod encryption;
pub mod location;
pub mod service;
pub mod ticket;
pub mod tier;

pub use audit::{CreditTransaction, InMemoryAudit, NoAudit, TicketValidation, ValidationStorage};
pub use encryption::{CipherKey, TicketCipher, padded_iv};
pub use location::{FixedLocation, LocationProvider};
pub use service::TicketingService;
pub use ticket::{Ticket, ValidationOutcome};
pub use tier::{Tier, TierId, TierTable};
