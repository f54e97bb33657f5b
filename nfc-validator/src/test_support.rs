//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize MockTransport setup and provide
//! [`SimulatedTag`], an in-memory NTAG215 answering the ACR122/PN532 command
//! set, so tests across the crate and the tests/ directory can drive a real
//! [`Reader`] end to end.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::PAGE_SIZE;
use crate::device::CardModel;
use crate::device::models::ntag215::config as ntag;
use crate::logging::{EventLog, MemoryLog};
use crate::reader::{Reader, ReaderBuilder};
use crate::ticketing::audit::{
    CreditTransaction, InMemoryAudit, TicketValidation, ValidationStorage,
};
use crate::ticketing::ticket::Ticket;
use crate::transport::Transport;
use crate::transport::mock::MockTransport;
use crate::types::SessionHandle;
use crate::{Error, Result};

/// Transport wrapper that delegates into a shared MockTransport so a test
/// can inspect sent messages after the Reader took ownership.
#[doc(hidden)]
#[derive(Clone, Default)]
pub struct SharedTransport {
    inner: Rc<RefCell<MockTransport>>,
}

impl SharedTransport {
    pub fn new(mock: MockTransport) -> Self {
        Self {
            inner: Rc::new(RefCell::new(mock)),
        }
    }

    pub fn push_response(&self, resp: Vec<u8>) {
        self.inner.borrow_mut().push_response(resp);
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.inner.borrow().sent.clone()
    }

    pub fn last_sent(&self) -> Option<Vec<u8>> {
        self.inner.borrow().sent.last().cloned()
    }

    pub fn with<R>(&self, f: impl FnOnce(&MockTransport) -> R) -> R {
        f(&self.inner.borrow())
    }

    pub fn set_disconnect_failures(&self, n: usize) {
        self.inner.borrow_mut().set_disconnect_failures(n);
    }
}

impl Transport for SharedTransport {
    fn connect(&mut self, card: CardModel) -> Result<SessionHandle> {
        self.inner.borrow_mut().connect(card)
    }

    fn transmit(&mut self, command: &[u8], max_response_len: usize) -> Result<Vec<u8>> {
        self.inner.borrow_mut().transmit(command, max_response_len)
    }

    fn control(&mut self, command: &[u8], control_code: u32) -> Result<Vec<u8>> {
        self.inner.borrow_mut().control(command, control_code)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.inner.borrow_mut().disconnect()
    }
}

/// Shared MemoryLog handle.
#[doc(hidden)]
#[derive(Clone, Default)]
pub struct SharedLog {
    inner: Rc<RefCell<MemoryLog>>,
}

impl SharedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.inner.borrow().messages().map(str::to_string).collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner.borrow().errors().map(str::to_string).collect()
    }

    pub fn commits(&self) -> usize {
        self.inner.borrow().commits
    }
}

impl EventLog for SharedLog {
    fn record(&mut self, message: &str) {
        self.inner.borrow_mut().record(message);
    }

    fn record_error(&mut self, err: &Error) {
        self.inner.borrow_mut().record_error(err);
    }

    fn commit(&mut self) {
        self.inner.borrow_mut().commit();
    }
}

/// Shared InMemoryAudit handle.
#[doc(hidden)]
#[derive(Clone, Default)]
pub struct SharedAudit {
    inner: Rc<RefCell<InMemoryAudit>>,
}

impl SharedAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> InMemoryAudit {
        self.inner.borrow().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.borrow_mut().set_failing(failing);
    }
}

impl ValidationStorage for SharedAudit {
    fn register_validation(&mut self, validation: &TicketValidation) -> Result<()> {
        self.inner.borrow_mut().register_validation(validation)
    }

    fn register_ticket_update(&mut self, ticket: &Ticket) -> Result<()> {
        self.inner.borrow_mut().register_ticket_update(ticket)
    }

    fn register_transaction(&mut self, transaction: &CreditTransaction) -> Result<()> {
        self.inner.borrow_mut().register_transaction(transaction)
    }
}

/// Reader over a MockTransport pre-seeded with `responses`.
#[doc(hidden)]
pub fn mock_reader(responses: Vec<Vec<u8>>) -> (Reader, SharedTransport, SharedLog) {
    let transport = SharedTransport::new(MockTransport::new());
    for resp in responses {
        transport.push_response(resp);
    }
    let log = SharedLog::new();
    let reader = build_reader(Box::new(transport.clone()), log.clone());
    (reader, transport, log)
}

/// Reader talking to a simulated tag.
#[doc(hidden)]
pub fn simulated_reader(tag: &SimulatedTag) -> (Reader, SharedLog) {
    let log = SharedLog::new();
    let reader = build_reader(Box::new(tag.clone()), log.clone());
    (reader, log)
}

fn build_reader(transport: Box<dyn Transport>, log: SharedLog) -> Reader {
    match ReaderBuilder::new()
        .with_transport(transport)
        .with_log(Box::new(log))
        .build()
    {
        Ok(reader) => reader,
        Err(err) => panic!("reader construction failed: {}", err),
    }
}

const SW_OK: [u8; 2] = [0x90, 0x00];
const SW_ERROR: [u8; 2] = [0x63, 0x00];
const SW_NOT_SUPPORTED: [u8; 2] = [0x6A, 0x81];

/// PN532 status for a card that did not answer (NAK).
const PN532_TIMEOUT: u8 = 0x01;
/// PN532 status for a command the target cannot accept.
const PN532_NOT_ACCEPTABLE: u8 = 0x27;

const CFG0: usize = ntag::CONFIG_PAGE as usize * PAGE_SIZE;
const CFG1: usize = CFG0 + PAGE_SIZE;
const PWD: usize = CFG1 + PAGE_SIZE;
const PACK: usize = PWD + PAGE_SIZE;
const LAST_PAGE: u8 = (ntag::TOTAL_MEMORY / PAGE_SIZE - 1) as u8;

#[derive(Debug)]
struct TagState {
    uid: Vec<u8>,
    memory: Vec<u8>,
    present: bool,
    authenticated: bool,
    /// AUTH0 and PROT latched when the card is activated
    auth0: u8,
    read_protected: bool,
    transmits: usize,
    fail_transmits: usize,
    writes_before_failure: Option<usize>,
}

/// In-memory NTAG215 behind an ACR122 reader with a PN532 controller.
///
/// Cloning gives another handle to the same tag, so a test can keep one
/// handle while the reader owns the other.
#[doc(hidden)]
#[derive(Debug, Clone)]
pub struct SimulatedTag {
    state: Rc<RefCell<TagState>>,
}

impl SimulatedTag {
    /// Factory-fresh tag: empty user memory, password protection disabled.
    pub fn new(uid: Vec<u8>) -> Self {
        let mut memory = vec![0u8; ntag::TOTAL_MEMORY];
        let n = uid.len().min(8);
        memory[..n].copy_from_slice(&uid[..n]);
        // capability container: NDEF, 496 bytes of data area, read/write
        memory[12..16].copy_from_slice(&[0xE1, 0x10, 0x3E, 0x00]);
        memory[CFG0..CFG0 + 4].copy_from_slice(&[0x04, 0x00, 0x00, 0xFF]);
        memory[CFG1..CFG1 + 4].copy_from_slice(&[0x00, 0x05, 0x00, 0x00]);
        memory[PWD..PWD + 4].copy_from_slice(&[0xFF; 4]);
        Self {
            state: Rc::new(RefCell::new(TagState {
                uid,
                memory,
                present: true,
                authenticated: false,
                auth0: 0xFF,
                read_protected: false,
                transmits: 0,
                fail_transmits: 0,
                writes_before_failure: None,
            })),
        }
    }

    /// Program the password configuration directly. Like on the real chip
    /// it applies from the next activation.
    pub fn protect(&self, password: [u8; 4], pack: [u8; 2]) {
        let mut s = self.state.borrow_mut();
        s.memory[CFG0 + 3] = ntag::FIRST_USER_PAGE;
        s.memory[CFG1] = 0x80;
        s.memory[PWD..PWD + 4].copy_from_slice(&password);
        s.memory[PACK..PACK + 2].copy_from_slice(&pack);
    }

    pub fn memory(&self) -> Vec<u8> {
        self.state.borrow().memory.clone()
    }

    /// Overwrite raw memory from `page`.
    pub fn load(&self, page: u8, bytes: &[u8]) {
        let start = usize::from(page) * PAGE_SIZE;
        self.state.borrow_mut().memory[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn set_present(&self, present: bool) {
        self.state.borrow_mut().present = present;
    }

    pub fn transmit_count(&self) -> usize {
        self.state.borrow().transmits
    }

    /// Make the next `n` transmissions fail at the transport level.
    pub fn fail_next_transmits(&self, n: usize) {
        self.state.borrow_mut().fail_transmits = n;
    }

    /// Let `n` more page writes succeed, then reject every write.
    pub fn fail_writes_after(&self, n: usize) {
        self.state.borrow_mut().writes_before_failure = Some(n);
    }

    pub fn clear_failures(&self) {
        let mut s = self.state.borrow_mut();
        s.fail_transmits = 0;
        s.writes_before_failure = None;
    }
}

impl TagState {
    fn activate(&mut self) {
        self.authenticated = false;
        self.auth0 = self.memory[CFG0 + 3];
        self.read_protected = self.memory[CFG1] & 0x80 != 0;
    }

    fn locked(&self, page: u8) -> bool {
        !self.authenticated && page >= self.auth0
    }

    fn reply(&mut self, apdu: &[u8]) -> Vec<u8> {
        match apdu {
            [0xFF, 0xCA, 0x00, 0x00, 0x00] => [self.uid.as_slice(), &SW_OK[..]].concat(),
            [0xFF, 0x82, 0x00, 0x00, 0x06, _key @ ..] => SW_OK.to_vec(),
            [0xFF, 0xB0, 0x00, page, len] => self.read(*page, usize::from(*len)),
            [0xFF, 0xB1, 0x00, block, 0x04] => self.read(*block, 4),
            [0xFF, 0xD6, 0x00, page, 0x04, data @ ..] if data.len() == 4 => {
                self.write(*page, data)
            }
            [0xFF, 0x00, 0x00, 0x00, lc, payload @ ..] if payload.len() == usize::from(*lc) => {
                let mut resp = self.controller(payload);
                resp.extend_from_slice(&SW_OK);
                resp
            }
            _ => SW_NOT_SUPPORTED.to_vec(),
        }
    }

    fn read(&self, page: u8, len: usize) -> Vec<u8> {
        if self.read_protected && self.locked(page) {
            return SW_ERROR.to_vec();
        }
        let start = usize::from(page) * PAGE_SIZE;
        let mut out: Vec<u8> = (0..len)
            .map(|i| self.memory.get(start + i).copied().unwrap_or(0))
            .collect();
        out.extend_from_slice(&SW_OK);
        out
    }

    fn write(&mut self, page: u8, data: &[u8]) -> Vec<u8> {
        if !(2..=LAST_PAGE).contains(&page) || self.locked(page) {
            return SW_ERROR.to_vec();
        }
        if let Some(left) = self.writes_before_failure.as_mut() {
            if *left == 0 {
                return SW_ERROR.to_vec();
            }
            *left -= 1;
        }
        let start = usize::from(page) * PAGE_SIZE;
        self.memory[start..start + PAGE_SIZE].copy_from_slice(data);
        SW_OK.to_vec()
    }

    fn controller(&mut self, frame: &[u8]) -> Vec<u8> {
        let (reply_code, card_cmd) = match frame {
            [0xD4, 0x40, _tg, rest @ ..] => (0x41, rest),
            [0xD4, 0x42, rest @ ..] => (0x43, rest),
            _ => return vec![0x7F],
        };
        let mut out = vec![0xD5, reply_code];
        match self.card(card_cmd) {
            Ok(data) => {
                out.push(0x00);
                out.extend(data);
            }
            Err(status) => out.push(status),
        }
        out
    }

    fn card(&mut self, cmd: &[u8]) -> std::result::Result<Vec<u8>, u8> {
        match cmd {
            [0x60] => Ok(vec![0x00, 0x04, 0x04, 0x02, 0x01, 0x00, 0x11, 0x03]),
            [0x1B, pwd @ ..] if pwd.len() == 4 => {
                if pwd == &self.memory[PWD..PWD + 4] {
                    self.authenticated = true;
                    Ok(self.memory[PACK..PACK + 2].to_vec())
                } else {
                    self.authenticated = false;
                    Err(PN532_TIMEOUT)
                }
            }
            _ => Err(PN532_NOT_ACCEPTABLE),
        }
    }
}

impl Transport for SimulatedTag {
    fn connect(&mut self, _card: CardModel) -> Result<SessionHandle> {
        let mut s = self.state.borrow_mut();
        if !s.present {
            return Err(Error::TransportFailure("no card in the field".into()));
        }
        s.activate();
        Ok(SessionHandle::new(1))
    }

    fn transmit(&mut self, command: &[u8], max_response_len: usize) -> Result<Vec<u8>> {
        let mut s = self.state.borrow_mut();
        s.transmits += 1;
        if s.fail_transmits > 0 {
            s.fail_transmits -= 1;
            return Err(Error::TransportFailure("reader did not answer".into()));
        }
        if !s.present {
            return Err(Error::TransportFailure("card removed".into()));
        }
        let mut resp = s.reply(command);
        resp.truncate(max_response_len);
        Ok(resp)
    }

    fn control(&mut self, _command: &[u8], _control_code: u32) -> Result<Vec<u8>> {
        Ok(SW_OK.to_vec())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.state.borrow_mut().authenticated = false;
        Ok(())
    }
}
