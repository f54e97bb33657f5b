// nfc-validator/tests/common/fixtures.rs

use chrono::{DateTime, TimeZone, Utc};
use nfc_validator::device::CardModel;
use nfc_validator::reader::Reader;
use nfc_validator::test_support::{SharedAudit, SharedLog, SimulatedTag, simulated_reader};
use nfc_validator::ticketing::{
    CipherKey, FixedLocation, TicketCipher, TicketingService, TierTable,
};

pub const UID: [u8; 7] = [0x04, 0x15, 0x91, 0x8A, 0xCB, 0x42, 0x20];

pub const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f";

pub fn key() -> CipherKey {
    CipherKey::from_hex(KEY_HEX).unwrap()
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 7, 30, 0).unwrap()
}

pub fn blank_tag() -> SimulatedTag {
    SimulatedTag::new(UID.to_vec())
}

pub fn connected_reader(tag: &SimulatedTag) -> (Reader, SharedLog) {
    let (mut reader, log) = simulated_reader(tag);
    reader.connect_card(CardModel::Ntag215).unwrap();
    (reader, log)
}

pub fn ticketing_service(tag: &SimulatedTag) -> (TicketingService, SharedAudit) {
    let (reader, _) = connected_reader(tag);
    let audit = SharedAudit::new();
    let service = TicketingService::new(
        reader,
        TicketCipher::new(key()),
        TierTable::default(),
        Box::new(FixedLocation::new("Roma Termini")),
    )
    .with_audit(Box::new(audit.clone()));
    (service, audit)
}

/// `03 len D1 01 plen 54 02 65 6E text FE` for short texts.
pub fn text_message_bytes(text: &[u8]) -> Vec<u8> {
    let payload_len = text.len() + 3;
    let mut out = vec![0x03, (payload_len + 4) as u8, 0xD1, 0x01, payload_len as u8, 0x54, 0x02];
    out.extend_from_slice(b"en");
    out.extend_from_slice(text);
    out.push(0xFE);
    out
}

/// READ BINARY answer: the block followed by `90 00`.
pub fn read_reply(block: &[u8]) -> Vec<u8> {
    let mut out = block.to_vec();
    out.extend([0x90, 0x00]);
    out
}
