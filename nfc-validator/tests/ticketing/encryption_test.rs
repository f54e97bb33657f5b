#[path = "../common/mod.rs"]
mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::fixtures::{UID, key, t0};
use nfc_validator::ticketing::{Ticket, TicketCipher, padded_iv};
use nfc_validator::Error;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn ticket(card_id: Vec<u8>, cents: i64, at: DateTime<Utc>) -> Ticket {
    let mut t = Ticket::new(card_id, "ROMA48", at);
    t.credit = Decimal::new(cents, 2);
    t.session_expense = Decimal::new(1250, 2);
    t.session_validation = Some(at);
    t.current_validation = Some(at);
    t
}

#[test]
fn ciphertext_is_whole_blocks_and_hides_json() {
    let cipher = TicketCipher::new(key());
    let bytes = cipher.encrypt_ticket(&ticket(UID.to_vec(), 500, t0()), &UID).unwrap();
    assert_eq!(bytes.len() % 16, 0);
    assert!(!bytes.windows(6).any(|w| w == b"credit"));
}

#[test]
fn decrypting_with_another_uid_fails_or_differs() {
    let cipher = TicketCipher::new(key());
    let original = ticket(UID.to_vec(), 500, t0());
    let bytes = cipher.encrypt_ticket(&original, &UID).unwrap();
    // CBC with a wrong IV only garbles the first block, which holds JSON
    match cipher.decrypt_ticket(&bytes, &[0x04, 0x00, 0x00, 0x00]) {
        Ok(t) => assert_ne!(t, original),
        Err(err) => assert!(matches!(err, Error::Serialization(_) | Error::Cipher(_))),
    }
}

#[test]
fn seventeen_byte_uid_rejected() {
    assert!(matches!(
        padded_iv(&[0u8; 17]),
        Err(Error::OversizedIdentifier { actual: 17, max: 16 })
    ));
}

proptest! {
    #[test]
    fn ticket_roundtrip_prop(
        uid in prop::collection::vec(any::<u8>(), 1..=16),
        cents in 0i64..10_000_000,
        secs in 0i64..2_000_000_000,
    ) {
        let at = Utc.timestamp_opt(secs, 0).unwrap();
        let cipher = TicketCipher::new(key());
        let original = ticket(uid.clone(), cents, at);
        let bytes = cipher.encrypt_ticket(&original, &uid).unwrap();
        prop_assert_eq!(cipher.decrypt_ticket(&bytes, &uid).unwrap(), original);
    }
}
