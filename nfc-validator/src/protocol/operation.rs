// nfc-validator/src/protocol/operation.rs
//! One transmission unit: the nested commands, the wrapped wire bytes and the
//! decoded response.

use crate::protocol::command::{Command, Payload, Status};
use crate::types::Layer;
use crate::utils::{bytes_to_hex_spaced, trim_trailing_zeros};
use crate::{Error, Result};

/// Framing of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Addressed to the reader itself (GET UID, READ BINARY, ...)
    Reader,
    /// Card command wrapped in a controller command wrapped in a reader
    /// direct-transmit.
    Card,
}

#[derive(Debug, Clone)]
enum Layers {
    ReaderOnly(Command),
    Wrapped {
        reader: Command,
        controller: Command,
        card: Command,
    },
}

/// A single request/response exchange with the reader.
#[derive(Debug, Clone)]
pub struct Operation {
    layers: Layers,
    wrapped: Vec<u8>,
    response: Vec<u8>,
    payload: Option<Payload>,
}

impl Operation {
    /// Reader-only operation; the wire bytes are the reader command itself.
    pub fn reader(command: Command) -> Self {
        let wrapped = command.bytes().to_vec();
        Self {
            layers: Layers::ReaderOnly(command),
            wrapped,
            response: Vec::new(),
            payload: None,
        }
    }

    /// Three-layer operation. `reader` must already carry the concatenated
    /// controller and card bytes (see `ReaderModel::direct_transmit`).
    pub fn card(reader: Command, controller: Command, card: Command) -> Self {
        let wrapped = reader.bytes().to_vec();
        Self {
            layers: Layers::Wrapped {
                reader,
                controller,
                card,
            },
            wrapped,
            response: Vec::new(),
            payload: None,
        }
    }

    pub fn operation_type(&self) -> OperationType {
        match self.layers {
            Layers::ReaderOnly(_) => OperationType::Reader,
            Layers::Wrapped { .. } => OperationType::Card,
        }
    }

    /// Bytes handed to the transport.
    pub fn wrapped_command(&self) -> &[u8] {
        &self.wrapped
    }

    pub fn wrapped_command_hex(&self) -> String {
        bytes_to_hex_spaced(&self.wrapped)
    }

    /// Trimmed raw response, empty until `elaborate_response` ran.
    pub fn response(&self) -> &[u8] {
        &self.response
    }

    pub fn response_hex(&self) -> String {
        bytes_to_hex_spaced(&self.response)
    }

    pub fn reader_command(&self) -> &Command {
        match &self.layers {
            Layers::ReaderOnly(reader) | Layers::Wrapped { reader, .. } => reader,
        }
    }

    pub fn controller_command(&self) -> Option<&Command> {
        match &self.layers {
            Layers::ReaderOnly(_) => None,
            Layers::Wrapped { controller, .. } => Some(controller),
        }
    }

    pub fn card_command(&self) -> Option<&Command> {
        match &self.layers {
            Layers::ReaderOnly(_) => None,
            Layers::Wrapped { card, .. } => Some(card),
        }
    }

    /// Decode a raw response. Trailing zero padding is trimmed, then the
    /// extractors run reader -> controller -> card, each one consuming the
    /// payload bytes produced by the previous one. The last stage's payload
    /// becomes the operation payload.
    pub fn elaborate_response(&mut self, raw: &[u8]) -> &Payload {
        self.response = trim_trailing_zeros(raw).to_vec();
        let payload = match &mut self.layers {
            Layers::ReaderOnly(reader) => reader.extract_payload(&self.response).clone(),
            Layers::Wrapped {
                reader,
                controller,
                card,
            } => {
                let from_reader = reader.extract_payload(&self.response).bytes().to_vec();
                let from_controller = controller.extract_payload(&from_reader).bytes().to_vec();
                card.extract_payload(&from_controller).clone()
            }
        };
        self.payload.insert(payload)
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_ref().map(Payload::bytes).unwrap_or(&[])
    }

    pub fn payload_text(&self) -> Option<&str> {
        self.payload.as_ref().and_then(Payload::text)
    }

    pub fn payload_hex(&self) -> String {
        bytes_to_hex_spaced(self.payload_bytes())
    }

    fn commands(&self) -> Vec<(Layer, &Command)> {
        match &self.layers {
            Layers::ReaderOnly(reader) => vec![(Layer::Reader, reader)],
            Layers::Wrapped {
                reader,
                controller,
                card,
            } => vec![
                (Layer::Reader, reader),
                (Layer::Controller, controller),
                (Layer::Card, card),
            ],
        }
    }

    /// Turn the recorded statuses into a `Result`. The outermost failing
    /// layer wins. Callers must check before trusting the payload.
    pub fn check(&self) -> Result<()> {
        for (layer, command) in self.commands() {
            let response = command.response();
            match response.status() {
                Status::Success => {}
                Status::Unset => {
                    return Err(Error::TransportFailure(format!(
                        "no response recorded for {} command {}",
                        layer,
                        command.name()
                    )));
                }
                Status::HeaderMismatch => return Err(Error::HeaderMismatch { layer }),
                Status::Failure | Status::GenericError => {
                    return Err(Error::ProtocolStatus {
                        layer,
                        code: response.code(),
                        message: response.message(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn is_success(&self) -> bool {
        self.check().is_ok()
    }
}
