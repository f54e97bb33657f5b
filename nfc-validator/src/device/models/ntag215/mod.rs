// nfc-validator/src/device/models/ntag215/mod.rs

pub mod auth;
pub mod config;

pub use auth::*;

use crate::protocol::command::{
    Command, CommandResponse, CommandTemplate, Extraction, Payload, ResponseLayout, Status,
    passthrough,
};
use crate::types::Password;
use crate::Result;

pub const PWD_AUTH: CommandTemplate = CommandTemplate::new(
    "PWD_AUTH",
    config::PWD_AUTH,
    ResponseLayout::new(&[], config::PWD_AUTH_RESPONSE_LEN),
    passthrough,
);

pub const GET_VERSION: CommandTemplate = CommandTemplate::new(
    "GET_VERSION",
    config::GET_VERSION,
    ResponseLayout::new(
        config::GET_VERSION_RESPONSE_HEADER,
        config::GET_VERSION_RESPONSE_LEN,
    ),
    extract_version,
);

/// Chip name for a GET_VERSION storage-size byte.
pub fn chip_name(storage_size: u8) -> Option<&'static str> {
    match storage_size {
        config::STORAGE_NTAG213 => Some("NTAG213"),
        config::STORAGE_NTAG215 => Some("NTAG215"),
        config::STORAGE_NTAG216 => Some("NTAG216"),
        _ => None,
    }
}

/// GET_VERSION extractor: drops the leading `00` and names the chip from
/// its storage-size byte.
pub fn extract_version(layout: &ResponseLayout, raw: &[u8]) -> Extraction {
    let rest = raw.get(layout.header.len()..).unwrap_or(&[]).to_vec();
    if !layout.header_matches(raw) {
        return Extraction::new(CommandResponse::from_status(Status::HeaderMismatch), Payload::new(rest));
    }
    if raw.len() < layout.min_len {
        return Extraction::new(
            CommandResponse::failure(Status::Failure.code(), "Response shorter than expected"),
            Payload::new(rest),
        );
    }
    let payload = match raw
        .get(config::GET_VERSION_STORAGE_OFFSET)
        .and_then(|b| chip_name(*b))
    {
        Some(name) => Payload::with_text(rest, name),
        None => Payload::new(rest),
    };
    Extraction::new(CommandResponse::from_status(Status::Success), payload)
}

pub fn password_auth(password: &Password) -> Result<Command> {
    let mut cmd = PWD_AUTH.instantiate();
    cmd.write_at(config::PWD_AUTH_PASSWORD_OFFSET, password.as_bytes())?;
    Ok(cmd)
}

pub fn get_version() -> Command {
    GET_VERSION.instantiate()
}
