use nfc_validator::ndef::{NdefMessage, length_from_bytes, value_length_bytes};
use proptest::prelude::*;

#[test]
fn tlv_length_boundaries() {
    for &(len, field) in &[(0usize, 1usize), (1, 1), (254, 1), (255, 3), (256, 3), (65535, 3)] {
        let bytes = value_length_bytes(len).unwrap();
        assert_eq!(bytes.len(), field, "length {}", len);
        assert_eq!(length_from_bytes(&bytes).unwrap(), (len, field));
    }
    assert_eq!(value_length_bytes(255).unwrap(), vec![0xFF, 0x00, 0xFF]);
    assert!(value_length_bytes(65536).is_err());
}

#[test]
fn record_length_switches_at_short_record_limit() {
    // 252 text bytes + status + "en" = 255, still a short record
    let short = NdefMessage::text(&[b'a'; 252]).unwrap().to_bytes().unwrap();
    assert_eq!(short[0], 0x03);
    assert_eq!(&short[1..4], &[0xFF, 0x01, 0x03]);
    assert_eq!(short[4], 0xD1);

    let long = NdefMessage::text(&[b'a'; 253]).unwrap().to_bytes().unwrap();
    assert_eq!(long[4], 0xC1);
    assert_eq!(&long[6..10], &[0x00, 0x00, 0x01, 0x00]);
}

proptest! {
    #[test]
    fn text_message_roundtrip_prop(text in prop::collection::vec(any::<u8>(), 0..600)) {
        let encoded = NdefMessage::text(&text).unwrap().to_bytes().unwrap();
        prop_assert_eq!(encoded.last().copied(), Some(0xFE));
        let decoded = NdefMessage::from_bytes(&encoded).unwrap();
        prop_assert!(decoded.is_complete());
        let record = decoded.record().unwrap();
        prop_assert_eq!(record.record_type().content(), text.as_slice());
    }

    #[test]
    fn uri_message_roundtrip_prop(path in "[a-z0-9/]{0,200}") {
        let uri = format!("https://www.{}", path);
        let encoded = NdefMessage::uri(&uri).unwrap().to_bytes().unwrap();
        let decoded = NdefMessage::from_bytes(&encoded).unwrap();
        let payload = decoded.payload().unwrap();
        prop_assert_eq!(payload.text(), Some(uri.as_str()));
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        let _ = NdefMessage::from_bytes(&bytes);
        let _ = NdefMessage::parse_header(&bytes);
        let _ = length_from_bytes(&bytes);
    }

    #[test]
    fn arbitrary_tail_after_ndef_tag_never_panics(tail in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut bytes = vec![0x03];
        bytes.extend(tail);
        let _ = NdefMessage::from_bytes(&bytes);
    }
}
