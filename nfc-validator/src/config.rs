// nfc-validator/src/config.rs
//! Runtime configuration of a validator.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RESPONSE_CAPACITY;
use crate::device::CardModel;
use crate::ticketing::{CipherKey, TierTable};
use crate::types::Password;
use crate::{Error, Result};

fn default_location() -> String {
    "unknown".to_string()
}

fn default_ndef_start_page() -> u8 {
    CardModel::Ntag215.geometry().first_user_page
}

fn default_response_capacity() -> usize {
    DEFAULT_RESPONSE_CAPACITY
}

/// Everything a validator needs besides the hardware.
///
/// Only `key` is required in JSON; every other field has a default.
///
/// ```
/// use nfc_validator::config::ValidatorConfig;
///
/// let config = ValidatorConfig::from_json(
///     r#"{ "key": "000102030405060708090a0b0c0d0e0f", "location": "bus 64" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.ndef_start_page, 4);
/// assert_eq!(config.tiers.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    pub key: CipherKey,
    /// 4-character NTAG password, `None` for unprotected cards
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_ndef_start_page")]
    pub ndef_start_page: u8,
    #[serde(default = "default_response_capacity")]
    pub response_capacity: usize,
    #[serde(default)]
    pub tiers: TierTable,
}

impl ValidatorConfig {
    pub fn new(key: CipherKey) -> Self {
        Self {
            key,
            password: None,
            location: default_location(),
            ndef_start_page: default_ndef_start_page(),
            response_capacity: default_response_capacity(),
            tiers: TierTable::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate(CardModel::default())?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration against the memory map of `card`.
    pub fn validate(&self, card: CardModel) -> Result<()> {
        self.tiers.validate()?;
        self.password()?;
        let geometry = card.geometry();
        if self.ndef_start_page < geometry.first_user_page
            || self.ndef_start_page > geometry.last_user_page
        {
            return Err(Error::Configuration(format!(
                "NDEF start page {:#04x} outside user pages {:#04x}..={:#04x}",
                self.ndef_start_page, geometry.first_user_page, geometry.last_user_page
            )));
        }
        if self.response_capacity == 0 {
            return Err(Error::Configuration("response capacity is zero".into()));
        }
        Ok(())
    }

    pub fn password(&self) -> Result<Option<Password>> {
        self.password
            .as_deref()
            .map(|p| {
                Password::try_from(p)
                    .map_err(|_| Error::Configuration("card password must be 4 bytes".into()))
            })
            .transpose()
    }
}
