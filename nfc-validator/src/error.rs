// nfc-validator/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Layer;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[cfg(feature = "pcsc")]
    #[error("pcsc error: {0}")]
    Pcsc(#[from] pcsc::Error),

    #[error("no card connected")]
    NoCardConnected,

    #[error("invalid packet length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("{layer} response header mismatch")]
    HeaderMismatch { layer: Layer },

    #[error("{layer} reported status {code:#04x}: {message}")]
    ProtocolStatus {
        layer: Layer,
        code: u16,
        message: &'static str,
    },

    #[error("malformed NDEF message: {0}")]
    MalformedMessage(String),

    #[error("unknown NDEF record type {0:#04x}")]
    UnknownRecordType(u8),

    #[error("invalid starting page {page}: first user data page is {first}")]
    InvalidStartingPage { page: u8, first: u8 },

    #[error("{required} bytes exceed the {available} bytes of user memory")]
    CapacityExceeded { required: usize, available: usize },

    #[error("insufficient credit: balance {credit}, requested {amount}")]
    InsufficientCredit { credit: Decimal, amount: Decimal },

    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("card identifier of {actual} bytes exceeds the {max}-byte cipher block")]
    OversizedIdentifier { actual: usize, max: usize },

    #[error("no ticket loaded for the connected card")]
    NoTicket,

    #[error("cipher error: {0}")]
    Cipher(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("audit storage error: {0}")]
    Audit(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// Coarse classification used to tell recoverable protocol failures apart
/// from business-rule rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Protocol,
    Malformed,
    BusinessRule,
    Configuration,
    Storage,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TransportFailure(_) | Error::NoCardConnected => ErrorKind::Transport,
            #[cfg(feature = "pcsc")]
            Error::Pcsc(_) => ErrorKind::Transport,
            Error::InvalidLength { .. }
            | Error::HeaderMismatch { .. }
            | Error::ProtocolStatus { .. } => ErrorKind::Protocol,
            Error::MalformedMessage(_)
            | Error::UnknownRecordType(_)
            | Error::Cipher(_)
            | Error::Serialization(_) => ErrorKind::Malformed,
            Error::InsufficientCredit { .. }
            | Error::InvalidAmount(_)
            | Error::NoTicket
            | Error::InvalidStartingPage { .. }
            | Error::CapacityExceeded { .. } => ErrorKind::BusinessRule,
            Error::OversizedIdentifier { .. } | Error::Configuration(_) => {
                ErrorKind::Configuration
            }
            Error::Audit(_) => ErrorKind::Storage,
        }
    }

    /// Business-rule rejections leave the persisted ticket untouched.
    pub fn is_business_rule(&self) -> bool {
        self.kind() == ErrorKind::BusinessRule
    }
}

pub type Result<T> = std::result::Result<T, Error>;
