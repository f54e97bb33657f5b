// nfc-validator/src/device/models/mod.rs
//! Per-model command tables, extractors and configuration constants.

pub mod acr122;
pub mod ntag215;
pub mod pn532;
