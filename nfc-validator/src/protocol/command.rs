// nfc-validator/src/protocol/command.rs
//! Command templates and the per-call command instances built from them.
//!
//! A [`CommandTemplate`] is plain static data: the canonical bytes, the
//! expected response shape and the payload extractor. Building a command for
//! a transmission always goes through [`CommandTemplate::instantiate`], which
//! copies the bytes into an owned [`Command`]. Call-specific values are then
//! written at fixed offsets of that copy, so the template itself can never be
//! changed by a caller.

use crate::{Error, Result};

/// Outcome classification of a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Unset,
    Success,
    Failure,
    HeaderMismatch,
    GenericError,
}

impl Status {
    /// Generic numeric code used when the device gives none.
    pub const fn code(&self) -> u16 {
        match self {
            Status::Unset => 0xFFFF,
            Status::Success => 0x00,
            Status::Failure => 0x01,
            Status::HeaderMismatch => 0x02,
            Status::GenericError => 0x03,
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Status::Unset => "Unset",
            Status::Success => "Operation successful",
            Status::Failure => "Operation failure",
            Status::HeaderMismatch => "Header mismatch in response buffer",
            Status::GenericError => "The command encountered an error",
        }
    }
}

/// Status, result code and message of a command after its response has
/// been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResponse {
    status: Status,
    code: u16,
    message: &'static str,
}

impl CommandResponse {
    pub const UNSET: Self = Self::from_status(Status::Unset);

    pub const fn new(status: Status, code: u16, message: &'static str) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    pub const fn from_status(status: Status) -> Self {
        Self::new(status, status.code(), status.description())
    }

    pub fn success(code: u16, message: &'static str) -> Self {
        Self::new(Status::Success, code, message)
    }

    pub fn failure(code: u16, message: &'static str) -> Self {
        Self::new(Status::Failure, code, message)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl Default for CommandResponse {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Decoded bytes of a response plus an optional textual decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    bytes: Vec<u8>,
    text: Option<String>,
}

impl Payload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, text: None }
    }

    pub fn with_text(bytes: Vec<u8>, text: impl Into<String>) -> Self {
        Self {
            bytes,
            text: Some(text.into()),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Expected shape of the response to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseLayout {
    pub header: &'static [u8],
    pub min_len: usize,
}

impl ResponseLayout {
    pub const fn new(header: &'static [u8], min_len: usize) -> Self {
        Self { header, min_len }
    }

    pub fn header_matches(&self, raw: &[u8]) -> bool {
        raw.starts_with(self.header)
    }
}

/// Result of running an extractor over a raw response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub response: CommandResponse,
    pub payload: Payload,
}

impl Extraction {
    pub fn new(response: CommandResponse, payload: Payload) -> Self {
        Self { response, payload }
    }
}

/// Payload extractor: validates the header, classifies the status and slices
/// out the payload proper.
pub type Extractor = fn(&ResponseLayout, &[u8]) -> Extraction;

/// Default extractor: header and minimum length are checked, the whole
/// buffer is the payload.
pub fn passthrough(layout: &ResponseLayout, raw: &[u8]) -> Extraction {
    let payload = Payload::new(raw.to_vec());
    if !layout.header_matches(raw) {
        return Extraction::new(CommandResponse::from_status(Status::HeaderMismatch), payload);
    }
    if raw.len() < layout.min_len {
        return Extraction::new(
            CommandResponse::failure(Status::Failure.code(), "Response shorter than expected"),
            payload,
        );
    }
    Extraction::new(CommandResponse::from_status(Status::Success), payload)
}

/// Immutable command template.
#[derive(Debug, Clone, Copy)]
pub struct CommandTemplate {
    name: &'static str,
    bytes: &'static [u8],
    layout: ResponseLayout,
    extractor: Extractor,
}

impl CommandTemplate {
    pub const fn new(
        name: &'static str,
        bytes: &'static [u8],
        layout: ResponseLayout,
        extractor: Extractor,
    ) -> Self {
        Self {
            name,
            bytes,
            layout,
            extractor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    pub fn layout(&self) -> &ResponseLayout {
        &self.layout
    }

    /// Deep-copy the template into a command ready for per-call mutation.
    pub fn instantiate(&self) -> Command {
        Command {
            name: self.name,
            bytes: self.bytes.to_vec(),
            layout: self.layout,
            extractor: self.extractor,
            response: CommandResponse::UNSET,
            payload: None,
        }
    }
}

/// Owned command instance for one transmission.
#[derive(Debug, Clone)]
pub struct Command {
    name: &'static str,
    bytes: Vec<u8>,
    layout: ResponseLayout,
    extractor: Extractor,
    response: CommandResponse,
    payload: Option<Payload>,
}

impl Command {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn layout(&self) -> &ResponseLayout {
        &self.layout
    }

    /// Overwrite one byte at a fixed offset. The length never changes.
    pub fn set_byte(&mut self, offset: usize, value: u8) -> Result<()> {
        let len = self.bytes.len();
        let slot = self.bytes.get_mut(offset).ok_or(Error::InvalidLength {
            expected: offset + 1,
            actual: len,
        })?;
        *slot = value;
        Ok(())
    }

    /// Overwrite `data.len()` bytes starting at `offset`.
    pub fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let end = offset + data.len();
        if end > self.bytes.len() {
            return Err(Error::InvalidLength {
                expected: end,
                actual: self.bytes.len(),
            });
        }
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Append-only concatenation, the only way the length may grow.
    pub fn append(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Run the extractor over `raw`, recording the classified status and the
    /// decoded payload on this command.
    pub fn extract_payload(&mut self, raw: &[u8]) -> &Payload {
        let Extraction { response, payload } = (self.extractor)(&self.layout, raw);
        self.response = response;
        self.payload.insert(payload)
    }

    pub fn response(&self) -> &CommandResponse {
        &self.response
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }
}
