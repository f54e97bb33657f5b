// nfc-validator/src/ticketing/audit.rs
//! Audit trail of validations, ticket snapshots and credit transactions.
//!
//! Storage failures never block a validation: the service logs them with
//! `warn!` and carries on with the ticket already written to the card.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ticketing::ticket::Ticket;
use crate::{Error, Result};

/// One tap that moved the current validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketValidation {
    #[serde(with = "hex::serde")]
    pub card_id: Vec<u8>,
    pub location: String,
    pub time: DateTime<Utc>,
    pub encrypted_ticket_hash: String,
}

impl TicketValidation {
    pub fn new(card_id: &[u8], location: String, time: DateTime<Utc>, encrypted: &[u8]) -> Self {
        Self {
            card_id: card_id.to_vec(),
            location,
            time,
            encrypted_ticket_hash: encrypted_ticket_hash(encrypted),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransaction {
    #[serde(with = "hex::serde")]
    pub card_id: Vec<u8>,
    pub location: String,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
}

/// Lowercase hex SHA-256 of the bytes written to the card.
pub fn encrypted_ticket_hash(encrypted: &[u8]) -> String {
    hex::encode(Sha256::digest(encrypted))
}

pub trait ValidationStorage {
    fn register_validation(&mut self, validation: &TicketValidation) -> Result<()>;
    fn register_ticket_update(&mut self, ticket: &Ticket) -> Result<()>;
    fn register_transaction(&mut self, transaction: &CreditTransaction) -> Result<()>;
}

impl<T: ValidationStorage + ?Sized> ValidationStorage for Box<T> {
    fn register_validation(&mut self, validation: &TicketValidation) -> Result<()> {
        (**self).register_validation(validation)
    }

    fn register_ticket_update(&mut self, ticket: &Ticket) -> Result<()> {
        (**self).register_ticket_update(ticket)
    }

    fn register_transaction(&mut self, transaction: &CreditTransaction) -> Result<()> {
        (**self).register_transaction(transaction)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAudit;

impl ValidationStorage for NoAudit {
    fn register_validation(&mut self, _validation: &TicketValidation) -> Result<()> {
        Ok(())
    }

    fn register_ticket_update(&mut self, _ticket: &Ticket) -> Result<()> {
        Ok(())
    }

    fn register_transaction(&mut self, _transaction: &CreditTransaction) -> Result<()> {
        Ok(())
    }
}

/// Keeps every record in memory. `set_failing(true)` makes each call fail,
/// for exercising the swallow-and-warn path.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAudit {
    pub validations: Vec<TicketValidation>,
    pub ticket_updates: Vec<Ticket>,
    pub transactions: Vec<CreditTransaction>,
    failing: bool,
}

impl InMemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(Error::Audit("storage unavailable".into()));
        }
        Ok(())
    }
}

impl ValidationStorage for InMemoryAudit {
    fn register_validation(&mut self, validation: &TicketValidation) -> Result<()> {
        self.check()?;
        self.validations.push(validation.clone());
        Ok(())
    }

    fn register_ticket_update(&mut self, ticket: &Ticket) -> Result<()> {
        self.check()?;
        self.ticket_updates.push(ticket.clone());
        Ok(())
    }

    fn register_transaction(&mut self, transaction: &CreditTransaction) -> Result<()> {
        self.check()?;
        self.transactions.push(transaction.clone());
        Ok(())
    }
}
