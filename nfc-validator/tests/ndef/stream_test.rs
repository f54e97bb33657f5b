#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{blank_tag, connected_reader};
use nfc_validator::device::CardModel;
use nfc_validator::ndef::{NdefMessage, NdefStreamReader};
use nfc_validator::Result;

#[test]
fn message_streams_over_several_blocks() {
    let text: Vec<u8> = (0..100u8).collect();
    let encoded = NdefMessage::text(&text).unwrap().to_bytes().unwrap();

    let mut image = encoded;
    image.resize(504, 0);
    let mut source = |page: u8| -> Result<Vec<u8>> {
        let start = (usize::from(page) - 4) * 4;
        Ok(image[start..start + 16].to_vec())
    };
    let stream = NdefStreamReader::new(&CardModel::Ntag215.geometry(), 4);
    let readout = stream.read(&mut source).unwrap();

    // 2 + 4 + 103 + 1 bytes, 16 per read
    assert_eq!(readout.pages, vec![4, 8, 12, 16, 20, 24, 28]);
    assert_eq!(readout.message.record().unwrap().record_type().content(), text.as_slice());
}

#[test]
fn tag_round_trip_from_later_page() {
    let tag = blank_tag();
    let (mut reader, _) = connected_reader(&tag);
    let text = vec![b'z'; 120];
    reader.write_text_ndef_message(&text, 0x10, None).unwrap();

    let readout = reader.read_ndef_message(0x10).unwrap();
    assert_eq!(readout.pages.first(), Some(&0x10));
    assert!(readout.pages.len() >= 3);
    assert_eq!(readout.message.payload().unwrap().bytes(), text.as_slice());

    // page 4 still blank
    assert!(reader.read_ndef_payload().unwrap().is_none());
}

#[test]
fn overwrite_with_shorter_message() {
    let tag = blank_tag();
    let (mut reader, _) = connected_reader(&tag);
    reader.write_text_ndef_message(&[b'L'; 200], 4, None).unwrap();
    reader.write_text_ndef_message(b"short", 4, None).unwrap();
    let payload = reader.read_ndef_payload().unwrap().unwrap();
    assert_eq!(payload.text(), Some("short"));
}

#[test]
fn capacity_is_checked_before_writing() {
    let tag = blank_tag();
    let (mut reader, _) = connected_reader(&tag);
    let before = tag.memory();
    assert!(reader.write_text_ndef_message(&[0u8; 498], 4, None).is_err());
    assert_eq!(tag.memory(), before);
    assert!(reader.write_text_ndef_message(&[0u8; 40], 0x80, None).is_err());
}
