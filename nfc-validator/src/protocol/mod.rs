// nfc-validator/src/protocol/mod.rs

pub mod command;
pub mod operation;
pub mod parser;

pub use command::{
    Command, CommandResponse, CommandTemplate, Extraction, Extractor, Payload, ResponseLayout,
    Status,
};
pub use operation::{Operation, OperationType};
