// nfc-validator/src/ticketing/service.rs
//! Ticket lifecycle on the connected card.
//!
//! The service keeps the last ticket it trusted from the card. Every change
//! is computed on a copy, written encrypted, then read back; only the
//! read-back ticket replaces the cached one.

use chrono::{DateTime, Utc};
use log::{info, warn};
use rust_decimal::Decimal;

use crate::reader::Reader;
use crate::ticketing::audit::{CreditTransaction, NoAudit, TicketValidation, ValidationStorage};
use crate::ticketing::encryption::TicketCipher;
use crate::ticketing::location::LocationProvider;
use crate::ticketing::ticket::{Ticket, ValidationOutcome};
use crate::ticketing::tier::TierTable;
use crate::types::Password;
use crate::{Error, Result};

pub struct TicketingService {
    reader: Reader,
    cipher: TicketCipher,
    tiers: TierTable,
    location: Box<dyn LocationProvider>,
    audit: Box<dyn ValidationStorage>,
    password: Option<Password>,
    ndef_start_page: u8,
    ticket: Option<Ticket>,
}

impl TicketingService {
    pub fn new(
        reader: Reader,
        cipher: TicketCipher,
        tiers: TierTable,
        location: Box<dyn LocationProvider>,
    ) -> Self {
        Self {
            reader,
            cipher,
            tiers,
            location,
            audit: Box::new(NoAudit),
            password: None,
            ndef_start_page: crate::device::models::ntag215::config::FIRST_USER_PAGE,
            ticket: None,
        }
    }

    pub fn with_audit(mut self, audit: Box<dyn ValidationStorage>) -> Self {
        self.audit = audit;
        self
    }

    /// Authenticate with `password` before reads and every written page.
    pub fn with_password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    pub fn with_ndef_start_page(mut self, page: u8) -> Self {
        self.ndef_start_page = page;
        self
    }

    pub fn reader(&self) -> &Reader {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut Reader {
        &mut self.reader
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Load the ticket of the card that just connected. A blank card leaves
    /// no ticket cached and returns `None`.
    pub fn connect_ticket(&mut self) -> Result<Option<&Ticket>> {
        self.ticket = None;
        if let Some(password) = self.password {
            self.reader.authenticate(&password)?;
        }
        self.ticket = self.load_ticket()?;
        Ok(self.ticket.as_ref())
    }

    pub fn connected_ticket(&self) -> Result<&Ticket> {
        self.ticket.as_ref().ok_or(Error::NoTicket)
    }

    /// Forget the cached ticket, e.g. after the card left the field.
    pub fn release_ticket(&mut self) {
        self.ticket = None;
    }

    /// Decrypt the ticket currently stored on the card.
    pub fn read_ticket(&mut self) -> Result<Ticket> {
        self.load_ticket()?.ok_or(Error::NoTicket)
    }

    /// Provision the card with a zero-credit ticket at the base tier.
    pub fn init_new_ticket(&mut self) -> Result<&Ticket> {
        let card_id = self.card_id()?;
        let ticket = Ticket::new(card_id, &self.tiers.base()?.name, Utc::now());
        self.persist(&ticket)?;
        info!("ticket initialised for card {}", hex::encode_upper(&ticket.card_id));
        self.register_ticket_update();
        self.connected_ticket()
    }

    pub fn add_credit(&mut self, amount: Decimal) -> Result<&Ticket> {
        self.add_credit_at(amount, Utc::now())
    }

    pub fn add_credit_at(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<&Ticket> {
        let mut ticket = self.connected_ticket()?.clone();
        ticket.add_credit(amount, now)?;
        self.persist(&ticket)?;
        info!(
            "credit {} added to card {}, balance {}",
            amount,
            hex::encode_upper(&ticket.card_id),
            self.connected_ticket()?.credit
        );

        let transaction = CreditTransaction {
            card_id: ticket.card_id.clone(),
            location: self.location.location(),
            date: now,
            amount,
        };
        if let Err(err) = self.audit.register_transaction(&transaction) {
            warn!("credit transaction not recorded: {}", err);
        }
        self.register_ticket_update();
        self.connected_ticket()
    }

    pub fn validate_ticket(&mut self) -> Result<ValidationOutcome> {
        self.validate_ticket_at(Utc::now())
    }

    /// Run the validation state machine at `now`. A rejected charge leaves
    /// both the card and the cached ticket as they were.
    pub fn validate_ticket_at(&mut self, now: DateTime<Utc>) -> Result<ValidationOutcome> {
        let current = self.connected_ticket()?;
        let (next, outcome) = match current.validate(&self.tiers, now) {
            Ok(validated) => validated,
            Err(err) => {
                warn!(
                    "validation refused for card {}: {}",
                    hex::encode_upper(&current.card_id),
                    err
                );
                return Err(err);
            }
        };
        let encrypted = self.persist(&next)?;
        let stored = self.connected_ticket()?;
        info!(
            "card {} validated ({:?}), tier {}, credit {}",
            hex::encode_upper(&stored.card_id),
            outcome,
            stored.tier,
            stored.credit
        );

        if outcome.records_validation() {
            let validation =
                TicketValidation::new(&next.card_id, self.location.location(), now, &encrypted);
            if let Err(err) = self.audit.register_validation(&validation) {
                warn!("validation not recorded: {}", err);
            }
        }
        self.register_ticket_update();
        Ok(outcome)
    }

    /// Encrypt and write `ticket`, returning the bytes written.
    pub fn write_ticket(&mut self, ticket: &Ticket) -> Result<Vec<u8>> {
        let card_id = self.card_id()?;
        let encrypted = self.cipher.encrypt_ticket(ticket, &card_id)?;
        let password = self.password;
        self.reader
            .write_text_ndef_message(&encrypted, self.ndef_start_page, password.as_ref())?;
        Ok(encrypted)
    }

    /// Write, then trust only what reads back.
    fn persist(&mut self, ticket: &Ticket) -> Result<Vec<u8>> {
        let encrypted = self.write_ticket(ticket)?;
        self.ticket = Some(self.read_ticket()?);
        Ok(encrypted)
    }

    fn load_ticket(&mut self) -> Result<Option<Ticket>> {
        let card_id = self.card_id()?;
        let readout = self.reader.read_ndef_message(self.ndef_start_page)?;
        match readout.message.payload() {
            Some(payload) => Ok(Some(self.cipher.decrypt_ticket(payload.bytes(), &card_id)?)),
            None => Ok(None),
        }
    }

    fn register_ticket_update(&mut self) {
        if let Some(ticket) = &self.ticket {
            if let Err(err) = self.audit.register_ticket_update(ticket) {
                warn!("ticket snapshot not recorded: {}", err);
            }
        }
    }

    fn card_id(&self) -> Result<Vec<u8>> {
        Ok(self.reader.card_uid()?.as_bytes().to_vec())
    }
}
