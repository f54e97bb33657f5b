#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{read_reply, text_message_bytes};
use nfc_validator::device::CardModel;
use nfc_validator::test_support::mock_reader;
use nfc_validator::Error;

#[test]
fn reads_text_message_from_two_blocks() {
    let mut memory = text_message_bytes(b"sixteen+ chars!!");
    memory.resize(32, 0);
    let (mut reader, transport, log) = mock_reader(vec![
        vec![0x04, 0x01, 0x02, 0x03, 0x90, 0x00],
        read_reply(&memory[..16]),
        read_reply(&memory[16..32]),
    ]);
    reader.connect_card(CardModel::Ntag215).unwrap();

    let readout = reader.read_ndef_message(4).unwrap();
    assert_eq!(readout.pages, vec![4, 8]);
    let payload = readout.message.payload().unwrap();
    assert_eq!(payload.text(), Some("sixteen+ chars!!"));

    let sent = transport.sent();
    assert_eq!(sent[1], vec![0xFF, 0xB0, 0x00, 0x04, 0x10]);
    assert_eq!(sent[2], vec![0xFF, 0xB0, 0x00, 0x08, 0x10]);
    assert!(log.messages().iter().any(|m| m == "Reading NDEF Message"));
    assert!(log.commits() >= 1);
}

#[test]
fn transport_failure_mid_stream() {
    let memory = text_message_bytes(&[b'x'; 30]);
    let (mut reader, _, log) = mock_reader(vec![
        vec![0x04, 0x01, 0x02, 0x03, 0x90, 0x00],
        read_reply(&memory[..16]),
    ]);
    reader.connect_card(CardModel::Ntag215).unwrap();
    assert!(matches!(
        reader.read_ndef_message(4),
        Err(Error::TransportFailure(_))
    ));
    assert_eq!(log.errors().len(), 1);
}

#[test]
fn missing_terminator_is_logged() {
    let mut memory = text_message_bytes(b"abc");
    let last = memory.len() - 1;
    memory[last] = 0x00;
    memory.resize(16, 0xAA);
    let (mut reader, _, log) = mock_reader(vec![
        vec![0x04, 0x01, 0x02, 0x03, 0x90, 0x00],
        read_reply(&memory),
    ]);
    reader.connect_card(CardModel::Ntag215).unwrap();
    assert!(matches!(
        reader.read_ndef_message(4),
        Err(Error::MalformedMessage(_))
    ));
    assert!(log.errors().iter().any(|e| e.contains("malformed")));
}
