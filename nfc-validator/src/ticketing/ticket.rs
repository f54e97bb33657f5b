// nfc-validator/src/ticketing/ticket.rs
//! The ticket record persisted on the card and its validation transitions.
//!
//! Every transition is computed on a copy. The caller only replaces its
//! ticket once the copy has been written back to the card, so a rejected
//! charge never leaves a half-updated ticket behind.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ticketing::tier::{Tier, TierId, TierTable};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub credit: Decimal,
    pub tier: String,
    pub current_validation: Option<DateTime<Utc>>,
    pub session_validation: Option<DateTime<Utc>>,
    pub usage_timestamp: DateTime<Utc>,
    pub session_expense: Decimal,
    #[serde(with = "hex::serde")]
    pub card_id: Vec<u8>,
}

/// What a validation did to the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// New session at the base tier, base fare charged.
    Restarted,
    /// Inside an open window, nothing charged.
    StillValid { refreshed: bool },
    /// Switched to the next tier for the difference in price.
    Upgraded,
    /// Base fare charged inside an open upgrade window.
    Charged,
}

impl ValidationOutcome {
    /// True when the current validation moved, which is what the audit
    /// trail counts as a tap. An upgrade only switches tier.
    pub fn records_validation(&self) -> bool {
        matches!(
            self,
            ValidationOutcome::Restarted
                | ValidationOutcome::Charged
                | ValidationOutcome::StillValid { refreshed: true }
        )
    }
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

impl Ticket {
    /// Fresh zero-credit ticket at the base tier.
    pub fn new(card_id: Vec<u8>, base_tier: &str, now: DateTime<Utc>) -> Self {
        Self {
            credit: Decimal::ZERO,
            tier: base_tier.to_string(),
            current_validation: None,
            session_validation: None,
            usage_timestamp: now,
            session_expense: Decimal::ZERO,
            card_id,
        }
    }

    pub fn tier_id(&self, tiers: &TierTable) -> Result<TierId> {
        tiers.find(&self.tier)
    }

    /// Debit `amount` and add it to the session expense. Negative amounts
    /// are rejected.
    pub fn charge(&mut self, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }
        if self.credit - amount < Decimal::ZERO {
            return Err(Error::InsufficientCredit {
                credit: self.credit,
                amount,
            });
        }
        self.credit -= amount;
        self.session_expense += amount;
        Ok(())
    }

    /// Credit `amount`; zero and negative amounts are rejected.
    pub fn add_credit(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }
        self.credit += amount;
        self.usage_timestamp = now;
        Ok(())
    }

    /// Compute the ticket after a tap at `now`. `self` is left untouched.
    pub fn validate(&self, tiers: &TierTable, now: DateTime<Utc>) -> Result<(Ticket, ValidationOutcome)> {
        let mut next = self.clone();
        let outcome = next.apply_validation(tiers, now)?;
        next.usage_timestamp = now;
        Ok((next, outcome))
    }

    fn apply_validation(&mut self, tiers: &TierTable, now: DateTime<Utc>) -> Result<ValidationOutcome> {
        let base = tiers.base()?;
        let (Some(session), Some(current)) = (self.session_validation, self.current_validation)
        else {
            return self.restart(tiers, now);
        };

        let tier_id = self.tier_id(tiers)?;
        let tier = tiers.get(tier_id)?;
        let since_session = minutes_between(session, now);
        if since_session < tier.duration() {
            return Ok(self.manage_valid(base, current, now));
        }

        let upgrade = match tiers.next(tier_id) {
            Some(id) => tiers.get(id)?,
            None => return self.restart(tiers, now),
        };
        if since_session > upgrade.duration() {
            return self.restart(tiers, now);
        }

        if minutes_between(current, now) < base.duration() {
            return Ok(self.manage_valid(base, current, now));
        }

        if self.session_expense + base.cost >= upgrade.cost {
            self.charge((upgrade.cost - self.session_expense).max(Decimal::ZERO))?;
            self.tier = upgrade.name.clone();
            Ok(ValidationOutcome::Upgraded)
        } else {
            self.charge(base.cost)?;
            self.current_validation = Some(now);
            Ok(ValidationOutcome::Charged)
        }
    }

    fn restart(&mut self, tiers: &TierTable, now: DateTime<Utc>) -> Result<ValidationOutcome> {
        let base = tiers.base()?;
        self.session_expense = Decimal::ZERO;
        self.tier = base.name.clone();
        self.charge(base.cost)?;
        self.current_validation = Some(now);
        self.session_validation = Some(now);
        Ok(ValidationOutcome::Restarted)
    }

    fn manage_valid(&mut self, base: &Tier, current: DateTime<Utc>, now: DateTime<Utc>) -> ValidationOutcome {
        let refreshed = minutes_between(current, now) > base.duration();
        if refreshed {
            self.current_validation = Some(now);
        }
        ValidationOutcome::StillValid { refreshed }
    }
}
