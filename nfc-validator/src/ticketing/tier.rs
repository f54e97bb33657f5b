// nfc-validator/src/ticketing/tier.rs
//! Fare products, ordered from the cheapest base ticket upwards.
//!
//! Tiers live in one immutable table and are referred to by position; the
//! "next" tier of an entry is simply the following one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub cost: Decimal,
    pub duration_minutes: u32,
}

impl Tier {
    pub fn new(name: impl Into<String>, cost: Decimal, duration_minutes: u32) -> Self {
        Self {
            name: name.into(),
            cost,
            duration_minutes,
        }
    }

    pub fn duration(&self) -> f64 {
        f64::from(self.duration_minutes)
    }
}

/// Position of a tier in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TierId(usize);

impl TierId {
    pub const BASE: Self = Self(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl Default for TierTable {
    /// BIT, ROMA24, ROMA48, ROMA72, CIS
    fn default() -> Self {
        Self {
            tiers: vec![
                Tier::new("BIT", Decimal::new(150, 2), 100),
                Tier::new("ROMA24", Decimal::new(700, 2), 1440),
                Tier::new("ROMA48", Decimal::new(1250, 2), 2880),
                Tier::new("ROMA72", Decimal::new(1800, 2), 4320),
                Tier::new("CIS", Decimal::new(2400, 2), 10080),
            ],
        }
    }
}

impl TierTable {
    pub fn new(tiers: Vec<Tier>) -> Result<Self> {
        let table = Self { tiers };
        table.validate()?;
        Ok(table)
    }

    /// Non-empty, unique names, costs and durations never decreasing.
    pub fn validate(&self) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(Error::Configuration("tier table is empty".into()));
        }
        for (i, tier) in self.tiers.iter().enumerate() {
            if self.tiers[..i].iter().any(|t| t.name == tier.name) {
                return Err(Error::Configuration(format!(
                    "duplicate tier {}",
                    tier.name
                )));
            }
            if tier.cost < Decimal::ZERO {
                return Err(Error::Configuration(format!(
                    "tier {} has a negative cost",
                    tier.name
                )));
            }
        }
        for pair in self.tiers.windows(2) {
            if pair[1].cost < pair[0].cost || pair[1].duration_minutes < pair[0].duration_minutes {
                return Err(Error::Configuration(format!(
                    "tier {} is not above {}",
                    pair[1].name, pair[0].name
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn base(&self) -> Result<&Tier> {
        self.get(TierId::BASE)
    }

    pub fn get(&self, id: TierId) -> Result<&Tier> {
        self.tiers
            .get(id.0)
            .ok_or_else(|| Error::Configuration(format!("no tier at position {}", id.0)))
    }

    pub fn next(&self, id: TierId) -> Option<TierId> {
        let next = id.0 + 1;
        (next < self.tiers.len()).then_some(TierId(next))
    }

    pub fn find(&self, name: &str) -> Result<TierId> {
        self.tiers
            .iter()
            .position(|t| t.name == name)
            .map(TierId)
            .ok_or_else(|| Error::Configuration(format!("unknown tier {}", name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }
}
