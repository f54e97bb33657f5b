// nfc-validator/src/validator.rs
//! The validator as a whole: configuration, reader and ticket service.
//!
//! Card presence is detected outside the crate. Whatever watches for cards
//! calls [`Validator::on_card_connected`] when one arrives and
//! [`Validator::on_card_removed`] when it leaves; everything in between runs
//! synchronously on the single card session.

use chrono::{DateTime, Utc};
use log::info;
use rust_decimal::Decimal;

use crate::config::ValidatorConfig;
use crate::device::CardModel;
use crate::reader::{Reader, ReaderBuilder};
use crate::ticketing::{
    FixedLocation, Ticket, TicketCipher, TicketingService, ValidationOutcome, ValidationStorage,
};
use crate::transport::Transport;
use crate::Result;

pub struct Validator {
    service: TicketingService,
    card: CardModel,
}

impl Validator {
    /// Wrap an already built reader.
    pub fn new(config: &ValidatorConfig, reader: Reader) -> Result<Self> {
        let card = CardModel::default();
        config.validate(card)?;
        let mut service = TicketingService::new(
            reader,
            TicketCipher::new(config.key.clone()),
            config.tiers.clone(),
            Box::new(FixedLocation::new(config.location.clone())),
        )
        .with_ndef_start_page(config.ndef_start_page);
        if let Some(password) = config.password()? {
            service = service.with_password(password);
        }
        Ok(Self { service, card })
    }

    /// Build the reader over `transport` with the configured buffer size.
    pub fn with_transport(config: &ValidatorConfig, transport: Box<dyn Transport>) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .with_transport(transport)
            .with_response_capacity(config.response_capacity)
            .build()?;
        Self::new(config, reader)
    }

    pub fn with_audit(mut self, audit: Box<dyn ValidationStorage>) -> Self {
        self.service = self.service.with_audit(audit);
        self
    }

    pub fn card_model(&self) -> CardModel {
        self.card
    }

    pub fn service(&self) -> &TicketingService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut TicketingService {
        &mut self.service
    }

    /// Open the card session and load its ticket. `None` means a blank card
    /// that still needs [`Validator::init_new_ticket`].
    pub fn on_card_connected(&mut self) -> Result<Option<&Ticket>> {
        let uid = self.service.reader_mut().connect_card(self.card)?.uid.clone();
        info!("card {} connected", uid);
        self.service.connect_ticket()
    }

    pub fn on_card_removed(&mut self) -> Result<()> {
        self.service.release_ticket();
        self.service.reader_mut().disconnect()
    }

    pub fn validate(&mut self) -> Result<ValidationOutcome> {
        self.service.validate_ticket()
    }

    pub fn validate_at(&mut self, now: DateTime<Utc>) -> Result<ValidationOutcome> {
        self.service.validate_ticket_at(now)
    }

    pub fn add_credit(&mut self, amount: Decimal) -> Result<&Ticket> {
        self.service.add_credit(amount)
    }

    pub fn init_new_ticket(&mut self) -> Result<&Ticket> {
        self.service.init_new_ticket()
    }

    pub fn read_ticket(&mut self) -> Result<Ticket> {
        self.service.read_ticket()
    }

    pub fn connected_ticket(&self) -> Result<&Ticket> {
        self.service.connected_ticket()
    }
}
