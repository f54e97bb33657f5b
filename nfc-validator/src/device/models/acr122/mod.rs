// nfc-validator/src/device/models/acr122/mod.rs

pub mod config;

use crate::protocol::command::{
    Command, CommandResponse, CommandTemplate, Extraction, Payload, ResponseLayout, Status,
};
use crate::types::AuthKey;
use crate::utils::last_nonzero_index;
use crate::{Error, Result};

pub const GET_UID: CommandTemplate = CommandTemplate::new(
    "GET_UID",
    config::GET_UID,
    ResponseLayout::new(&[], 5),
    extract_status_word,
);

pub const LOAD_AUTHENTICATION_KEYS: CommandTemplate = CommandTemplate::new(
    "LOAD_AUTHENTICATION_KEYS",
    config::LOAD_AUTHENTICATION_KEYS,
    ResponseLayout::new(&[], 1),
    extract_status_word,
);

pub const READ_BINARY: CommandTemplate = CommandTemplate::new(
    "READ_BINARY",
    config::READ_BINARY,
    ResponseLayout::new(&[], 1),
    extract_status_word,
);

pub const READ_VALUE: CommandTemplate = CommandTemplate::new(
    "READ_VALUE",
    config::READ_VALUE,
    ResponseLayout::new(&[], 5),
    extract_status_word,
);

pub const UPDATE_BINARY: CommandTemplate = CommandTemplate::new(
    "UPDATE_BINARY",
    config::UPDATE_BINARY,
    ResponseLayout::new(&[], 1),
    extract_status_word,
);

pub const DIRECT_TRANSMIT: CommandTemplate = CommandTemplate::new(
    "DIRECT_TRANSMIT",
    config::DIRECT_TRANSMIT,
    ResponseLayout::new(&[], 1),
    extract_status_word,
);

/// Human readable description of an ACR122 status code.
pub fn describe_status(code: u16) -> &'static str {
    match code {
        config::STATUS_SUCCESS => "The operation completed successfully",
        config::STATUS_ERROR => "The operation failed",
        config::STATUS_NOT_SUPPORTED => "Function not supported",
        _ => "Unknown reader status",
    }
}

/// Status-word extractor shared by every ACR122 command.
///
/// The last non-zero byte carries the status; a trailing `0x81` is combined
/// with the byte before it so `6A 81` reads as "not supported". Everything
/// before the status is the payload.
pub fn extract_status_word(layout: &ResponseLayout, raw: &[u8]) -> Extraction {
    let Some(mut status_idx) = last_nonzero_index(raw) else {
        return Extraction::new(
            CommandResponse::new(Status::GenericError, Status::GenericError.code(), "Empty response"),
            Payload::default(),
        );
    };

    let mut code = u16::from(raw[status_idx]);
    if raw[status_idx] == crate::constants::SW_NOT_SUPPORTED_TRAILER && status_idx > 0 {
        status_idx -= 1;
        code += u16::from(raw[status_idx]);
    }
    let payload = Payload::new(raw[..status_idx].to_vec());

    if code != config::STATUS_SUCCESS {
        return Extraction::new(CommandResponse::failure(code, describe_status(code)), payload);
    }
    if !layout.header_matches(raw) {
        return Extraction::new(CommandResponse::from_status(Status::HeaderMismatch), payload);
    }
    if raw.len() < layout.min_len {
        return Extraction::new(
            CommandResponse::failure(Status::Failure.code(), "Response shorter than expected"),
            payload,
        );
    }
    Extraction::new(CommandResponse::success(code, describe_status(code)), payload)
}

pub fn load_authentication_keys(key: &AuthKey) -> Result<Command> {
    let mut cmd = LOAD_AUTHENTICATION_KEYS.instantiate();
    cmd.write_at(config::LOAD_KEYS_KEY_OFFSET, key.as_bytes())?;
    Ok(cmd)
}

pub fn read_binary(page: u8, len: u8) -> Result<Command> {
    let mut cmd = READ_BINARY.instantiate();
    cmd.set_byte(config::P2_OFFSET, page)?;
    cmd.set_byte(config::LEN_OFFSET, len)?;
    Ok(cmd)
}

pub fn read_value(block: u8) -> Result<Command> {
    let mut cmd = READ_VALUE.instantiate();
    cmd.set_byte(config::P2_OFFSET, block)?;
    Ok(cmd)
}

/// Build an UPDATE BINARY for one page. Short data is zero padded, the
/// command always updates a full page.
pub fn update_binary(page: u8, data: &[u8]) -> Result<Command> {
    if data.len() > config::UPDATE_BINARY_MAX_DATA {
        return Err(Error::InvalidLength {
            expected: config::UPDATE_BINARY_MAX_DATA,
            actual: data.len(),
        });
    }
    let mut cmd = UPDATE_BINARY.instantiate();
    cmd.set_byte(config::P2_OFFSET, page)?;
    cmd.write_at(config::UPDATE_BINARY_DATA_OFFSET, data)?;
    Ok(cmd)
}

pub fn direct_transmit(payload: &[u8]) -> Result<Command> {
    if payload.len() > config::DIRECT_TRANSMIT_MAX_PAYLOAD {
        return Err(Error::InvalidLength {
            expected: config::DIRECT_TRANSMIT_MAX_PAYLOAD,
            actual: payload.len(),
        });
    }
    let mut cmd = DIRECT_TRANSMIT.instantiate();
    cmd.set_byte(config::LEN_OFFSET, payload.len() as u8)?;
    cmd.append(payload);
    Ok(cmd)
}
