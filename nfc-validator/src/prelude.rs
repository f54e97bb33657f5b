// nfc-validator/src/prelude.rs

pub use crate::config::ValidatorConfig;
pub use crate::device::{CardModel, ControllerModel, ReaderModel};
pub use crate::logging::{EventLog, LogFacade};
pub use crate::ndef::{NdefMessage, NdefRecord, RecordType};
pub use crate::protocol::{Command, Operation, Payload};
pub use crate::reader::{Reader, ReaderBuilder};
pub use crate::ticketing::{
    CipherKey, Ticket, TicketCipher, TicketingService, TierTable, ValidationOutcome,
};
pub use crate::transport::Transport;
pub use crate::validator::Validator;
pub use crate::{Error, ErrorKind, Password, Result, Uid};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, parse_hex};
