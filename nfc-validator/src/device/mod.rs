// nfc-validator/src/device/mod.rs
//! Reader, controller and card variants.
//!
//! Each device category is a closed sum type. Every device-specific command
//! is built by matching on the variant, so adding a model means adding a
//! variant and letting the compiler point at every place that needs it. The
//! reader orchestrator and the ticketing layer only talk to these enums.

pub mod models;

use crate::protocol::command::Command;
use crate::types::{AuthKey, Password};
use crate::Result;

use models::ntag215::SecurityConfig;
use models::{acr122, ntag215, pn532};

/// PC/SC reader front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReaderModel {
    #[default]
    Acr122,
}

impl ReaderModel {
    pub fn name(&self) -> &'static str {
        match self {
            ReaderModel::Acr122 => "ACR122",
        }
    }

    pub fn uid_command(&self) -> Command {
        match self {
            ReaderModel::Acr122 => acr122::GET_UID.instantiate(),
        }
    }

    pub fn load_keys_command(&self, key: &AuthKey) -> Result<Command> {
        match self {
            ReaderModel::Acr122 => acr122::load_authentication_keys(key),
        }
    }

    pub fn read_binary_command(&self, page: u8, len: u8) -> Result<Command> {
        match self {
            ReaderModel::Acr122 => acr122::read_binary(page, len),
        }
    }

    pub fn read_value_command(&self, block: u8) -> Result<Command> {
        match self {
            ReaderModel::Acr122 => acr122::read_value(block),
        }
    }

    pub fn update_binary_command(&self, page: u8, data: &[u8]) -> Result<Command> {
        match self {
            ReaderModel::Acr122 => acr122::update_binary(page, data),
        }
    }

    pub fn direct_transmit_command(&self, payload: &[u8]) -> Result<Command> {
        match self {
            ReaderModel::Acr122 => acr122::direct_transmit(payload),
        }
    }

    /// Control code for reader escape commands.
    pub fn escape_control_code(&self) -> u32 {
        match self {
            ReaderModel::Acr122 => acr122::config::ESCAPE_CONTROL_FUNCTION,
        }
    }
}

/// NFC controller sitting between the reader and the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControllerModel {
    #[default]
    Pn532,
}

impl ControllerModel {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerModel::Pn532 => "PN532",
        }
    }

    /// Framing with the controller's full protocol handling (CRC, chaining).
    pub fn data_exchange_command(&self) -> Command {
        match self {
            ControllerModel::Pn532 => pn532::data_exchange(),
        }
    }

    /// Raw framing, used for commands the controller does not know about.
    pub fn communicate_thru_command(&self) -> Command {
        match self {
            ControllerModel::Pn532 => pn532::communicate_thru(),
        }
    }
}

/// Memory layout of a card, expressed in pages and bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardGeometry {
    /// Bytes written by one UPDATE BINARY (one page)
    pub max_writable_bytes: usize,
    /// Bytes returned by one READ BINARY
    pub max_readable_bytes: usize,
    pub first_user_page: u8,
    pub last_user_page: u8,
    /// First configuration page (password protection)
    pub config_page: u8,
    pub page_size: usize,
}

impl CardGeometry {
    /// Pages advanced by one READ BINARY.
    pub fn pages_per_read(&self) -> u8 {
        (self.max_readable_bytes / self.page_size) as u8
    }

    /// Bytes of user memory from `start_page` to the last user page.
    pub fn capacity_from(&self, start_page: u8) -> usize {
        if start_page > self.last_user_page {
            return 0;
        }
        (usize::from(self.last_user_page) + 1 - usize::from(start_page)) * self.page_size
    }
}

/// Card (tag) model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardModel {
    #[default]
    Ntag215,
}

impl CardModel {
    pub fn name(&self) -> &'static str {
        match self {
            CardModel::Ntag215 => "NTAG215",
        }
    }

    pub fn geometry(&self) -> CardGeometry {
        match self {
            CardModel::Ntag215 => CardGeometry {
                max_writable_bytes: ntag215::config::MAX_WRITABLE_BYTES,
                max_readable_bytes: ntag215::config::MAX_READABLE_BYTES,
                first_user_page: ntag215::config::FIRST_USER_PAGE,
                last_user_page: ntag215::config::LAST_USER_PAGE,
                config_page: ntag215::config::CONFIG_PAGE,
                page_size: crate::constants::PAGE_SIZE,
            },
        }
    }

    pub fn password_auth_command(&self, password: &Password) -> Result<Command> {
        match self {
            CardModel::Ntag215 => ntag215::password_auth(password),
        }
    }

    pub fn version_command(&self) -> Command {
        match self {
            CardModel::Ntag215 => ntag215::get_version(),
        }
    }

    /// Bytes to write from `geometry().config_page` to enable password
    /// protection.
    pub fn security_config_bytes(&self, config: &SecurityConfig) -> Vec<u8> {
        match self {
            CardModel::Ntag215 => config.to_bytes(),
        }
    }
}
