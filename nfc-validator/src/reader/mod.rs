// nfc-validator/src/reader/mod.rs
//! Reader orchestrator.
//!
//! Composes reader, controller and card commands into one transmission,
//! sends it through the transport and checks every layer's status. The
//! reader owns exactly one card session; `&mut self` on every operation
//! keeps exchanges with the card strictly sequential.

pub mod builder;
pub mod ndef;

pub use builder::ReaderBuilder;

use crate::device::models::ntag215::SecurityConfig;
use crate::device::{CardGeometry, CardModel, ControllerModel, ReaderModel};
use crate::logging::EventLog;
use crate::protocol::command::Command;
use crate::protocol::operation::Operation;
use crate::transport::Transport;
use crate::types::{AuthKey, Password, SessionHandle, Uid};
use crate::{Error, Result};

/// The card currently in the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSession {
    pub card: CardModel,
    pub uid: Uid,
    pub handle: SessionHandle,
}

pub struct Reader {
    transport: Box<dyn Transport>,
    model: ReaderModel,
    controller: ControllerModel,
    log: Box<dyn EventLog>,
    response_capacity: usize,
    session: Option<CardSession>,
}

impl Reader {
    pub(crate) fn from_parts(
        transport: Box<dyn Transport>,
        model: ReaderModel,
        controller: ControllerModel,
        log: Box<dyn EventLog>,
        response_capacity: usize,
    ) -> Self {
        Self {
            transport,
            model,
            controller,
            log,
            response_capacity,
            session: None,
        }
    }

    pub fn model(&self) -> ReaderModel {
        self.model
    }

    pub fn controller(&self) -> ControllerModel {
        self.controller
    }

    /// Open a session with the card on the reader and fetch its UID.
    pub fn connect_card(&mut self, card: CardModel) -> Result<&CardSession> {
        self.log.record("Connecting card");
        self.session = None;
        let handle = match self.transport.connect(card) {
            Ok(handle) => handle,
            Err(err) => return Err(self.fail(err)),
        };

        // read_uid records its own failures
        let uid = match self.read_uid() {
            Ok(op) => Uid::try_from(op.payload_bytes()).map_err(|err| self.fail(err)),
            Err(err) => Err(err),
        };
        let uid = match uid {
            Ok(uid) => uid,
            Err(err) => {
                if let Err(disconnect_err) = self.transport.disconnect() {
                    self.log.record_error(&disconnect_err);
                }
                return Err(err);
            }
        };

        self.log
            .record(&format!("Connected {} with UID: {}", card.name(), uid));
        Ok(self.session.insert(CardSession { card, uid, handle }))
    }

    pub fn disconnect(&mut self) -> Result<()> {
        if self.session.take().is_some() {
            self.log.record("Disconnecting card");
            self.transport.disconnect()?;
        }
        Ok(())
    }

    pub fn session(&self) -> Option<&CardSession> {
        self.session.as_ref()
    }

    pub fn connected_card(&self) -> Result<&CardSession> {
        self.session.as_ref().ok_or(Error::NoCardConnected)
    }

    pub fn card_uid(&self) -> Result<&Uid> {
        Ok(&self.connected_card()?.uid)
    }

    pub fn geometry(&self) -> Result<CardGeometry> {
        Ok(self.connected_card()?.card.geometry())
    }

    /// GET DATA for the UID of the card in the field.
    pub fn read_uid(&mut self) -> Result<Operation> {
        let cmd = self.model.uid_command();
        self.transmit(Operation::reader(cmd))
    }

    /// One READ BINARY of the card's maximum readable size.
    pub fn read_blocks(&mut self, start_page: u8) -> Result<Operation> {
        let len = self.geometry()?.max_readable_bytes;
        self.log.record("Command: ReadBlocks");
        let cmd = self.model.read_binary_command(start_page, len as u8)?;
        self.transmit(Operation::reader(cmd))
    }

    pub fn read_value(&mut self, block: u8) -> Result<Operation> {
        let cmd = self.model.read_value_command(block)?;
        self.transmit(Operation::reader(cmd))
    }

    /// UPDATE BINARY of one page.
    pub fn write_block(&mut self, page: u8, data: &[u8]) -> Result<Operation> {
        let max = self.geometry()?.max_writable_bytes;
        if data.len() > max {
            return Err(Error::InvalidLength {
                expected: max,
                actual: data.len(),
            });
        }
        self.log.record("Command: WriteBlock");
        let cmd = self.model.update_binary_command(page, data)?;
        self.transmit(Operation::reader(cmd))
    }

    /// Write `bytes` page by page from `start_page`. With a password the card
    /// is authenticated before every page.
    pub fn write_bytes(
        &mut self,
        bytes: &[u8],
        start_page: u8,
        password: Option<&Password>,
    ) -> Result<Vec<Operation>> {
        let chunk_len = self.geometry()?.max_writable_bytes;
        let mut operations = Vec::with_capacity(bytes.len().div_ceil(chunk_len));
        for (j, chunk) in bytes.chunks(chunk_len).enumerate() {
            if let Some(password) = password {
                operations.push(self.authenticate(password)?);
            }
            let page = u8::try_from(usize::from(start_page) + j).map_err(|_| {
                Error::CapacityExceeded {
                    required: bytes.len(),
                    available: (usize::from(u8::MAX) + 1 - usize::from(start_page)) * chunk_len,
                }
            })?;
            operations.push(self.write_block(page, chunk)?);
        }
        Ok(operations)
    }

    /// PWD_AUTH through InCommunicateThru; the payload is the PACK.
    pub fn authenticate(&mut self, password: &Password) -> Result<Operation> {
        let card = self.connected_card()?.card.password_auth_command(password)?;
        let controller = self.controller.communicate_thru_command();
        self.transmit_card_command(controller, card)
    }

    /// GET_VERSION through InDataExchange; the payload text names the chip.
    pub fn card_version(&mut self) -> Result<Operation> {
        let card = self.connected_card()?.card.version_command();
        let controller = self.controller.data_exchange_command();
        self.transmit_card_command(controller, card)
    }

    pub fn load_authentication_keys(&mut self, key: &AuthKey) -> Result<Operation> {
        let cmd = self.model.load_keys_command(key)?;
        self.transmit(Operation::reader(cmd))
    }

    /// Write the password-protection configuration pages.
    pub fn setup_card_security(&mut self, config: &SecurityConfig) -> Result<Vec<Operation>> {
        let session = self.connected_card()?;
        let bytes = session.card.security_config_bytes(config);
        let page = session.card.geometry().config_page;
        self.log.record("SetupCardSecurityConfiguration");
        let result = self.write_bytes(&bytes, page, None);
        self.log.commit();
        result
    }

    /// Reader escape command, answered by the reader itself.
    pub fn control(&mut self, command: &[u8]) -> Result<Vec<u8>> {
        let code = self.model.escape_control_code();
        self.transport
            .control(command, code)
            .map_err(|err| self.fail(err))
    }

    pub fn commit_log(&mut self) {
        self.log.commit();
    }

    fn transmit_card_command(&mut self, controller: Command, card: Command) -> Result<Operation> {
        let mut inner = controller.bytes().to_vec();
        inner.extend_from_slice(card.bytes());
        let reader = self.model.direct_transmit_command(&inner)?;
        self.transmit(Operation::card(reader, controller, card))
    }

    /// Send the wrapped bytes and decode the answer. Failures are recorded
    /// and returned, never retried.
    fn transmit(&mut self, mut operation: Operation) -> Result<Operation> {
        self.log
            .record(&format!("< {}", operation.wrapped_command_hex()));
        let raw = match self
            .transport
            .transmit(operation.wrapped_command(), self.response_capacity)
        {
            Ok(raw) => raw,
            Err(err) => return Err(self.fail(err)),
        };
        operation.elaborate_response(&raw);
        self.log.record(&format!("> {}", operation.response_hex()));
        match operation.check() {
            Ok(()) => Ok(operation),
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        self.log.record_error(&err);
        err
    }
}
