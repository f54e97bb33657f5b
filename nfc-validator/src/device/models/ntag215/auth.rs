// nfc-validator/src/device/models/ntag215/auth.rs
//! Configuration pages for password protection (datasheet 8.5.7 and 8.8.1).
//!
//! The 16 bytes built here are written from the CFG0 page onwards and cover
//! CFG0, CFG1, PWD and PACK:
//!
//! ```text
//! CFG0: MIRROR  RFUI  MIRROR_PAGE  AUTH0
//! CFG1: ACCESS  RFUI  RFUI         RFUI
//! PWD:  pwd[0]  pwd[1] pwd[2]      pwd[3]
//! PACK: pack[0] pack[1] RFUI       RFUI
//! ```

use crate::types::{Pack, Password};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MirrorConf {
    NoMirror = 0x00,
    UidMirror = 0x40,
    NfcCounterMirror = 0x80,
    UidAndNfcCounterMirror = 0xC0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MirrorBytePosition {
    First = 0x00,
    Second = 0x10,
    Third = 0x20,
    Fourth = 0x30,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StrongModulation {
    Disabled = 0x00,
    Enabled = 0x04,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Protection {
    WriteProtected = 0x00,
    ReadWriteProtected = 0x80,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConfigLock {
    Open = 0x00,
    PermanentlyLocked = 0x40,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NfcCounter {
    Disabled = 0x00,
    Enabled = 0x10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NfcCounterPasswordProtection {
    Disabled = 0x00,
    Enabled = 0x08,
}

/// Largest AUTHLIM value; 0 disables the retry limit.
pub const MAX_AUTH_LIMIT: u8 = 7;

/// MIRROR byte of CFG0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorByte {
    pub conf: MirrorConf,
    pub position: MirrorBytePosition,
    pub strong_modulation: StrongModulation,
}

impl MirrorByte {
    pub fn to_byte(&self) -> u8 {
        self.conf as u8 | self.position as u8 | self.strong_modulation as u8
    }
}

impl Default for MirrorByte {
    fn default() -> Self {
        Self {
            conf: MirrorConf::NoMirror,
            position: MirrorBytePosition::First,
            strong_modulation: StrongModulation::Enabled,
        }
    }
}

/// ACCESS byte of CFG1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessByte {
    pub protection: Protection,
    pub config_lock: ConfigLock,
    pub nfc_counter: NfcCounter,
    pub nfc_counter_protection: NfcCounterPasswordProtection,
    /// Clamped to `0..=MAX_AUTH_LIMIT` when encoded
    pub auth_limit: u8,
}

impl AccessByte {
    pub fn to_byte(&self) -> u8 {
        self.protection as u8
            | self.config_lock as u8
            | self.nfc_counter as u8
            | self.nfc_counter_protection as u8
            | crate::utils::clamp(self.auth_limit, 0, MAX_AUTH_LIMIT)
    }
}

impl Default for AccessByte {
    fn default() -> Self {
        Self {
            protection: Protection::ReadWriteProtected,
            config_lock: ConfigLock::Open,
            nfc_counter: NfcCounter::Disabled,
            nfc_counter_protection: NfcCounterPasswordProtection::Disabled,
            auth_limit: 0,
        }
    }
}

/// Full password-protection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityConfig {
    pub mirror: MirrorByte,
    pub mirror_page: u8,
    /// First page requiring authentication (AUTH0)
    pub first_protected_page: u8,
    pub access: AccessByte,
    pub password: Password,
    pub pack: Pack,
}

impl SecurityConfig {
    /// Protect every user page for reads and writes, config left open.
    pub fn new(password: Password, pack: Pack) -> Self {
        Self {
            mirror: MirrorByte::default(),
            mirror_page: 0,
            first_protected_page: super::config::FIRST_USER_PAGE,
            access: AccessByte::default(),
            password,
            pack,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![
            self.mirror.to_byte(),
            0x00,
            self.mirror_page,
            self.first_protected_page,
            self.access.to_byte(),
            0x00,
            0x00,
            0x00,
        ];
        bytes.extend_from_slice(self.password.as_bytes());
        bytes.extend_from_slice(self.pack.as_bytes());
        bytes.extend_from_slice(&[0x00, 0x00]);
        bytes
    }
}
