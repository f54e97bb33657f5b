#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{KEY_HEX, UID, t0};
use nfc_validator::config::ValidatorConfig;
use nfc_validator::test_support::{SharedAudit, SimulatedTag};
use nfc_validator::ticketing::ValidationOutcome;
use nfc_validator::validator::Validator;
use nfc_validator::Error;
use rust_decimal::Decimal;

fn config_json(extra: &str) -> String {
    format!(r#"{{ "key": "{}", "location": "Piazza Venezia"{} }}"#, KEY_HEX, extra)
}

#[test]
fn full_lifecycle_from_json_config() {
    let config = ValidatorConfig::from_json(&config_json("")).unwrap();
    let tag = SimulatedTag::new(UID.to_vec());
    let audit = SharedAudit::new();
    let mut validator = Validator::with_transport(&config, Box::new(tag.clone()))
        .unwrap()
        .with_audit(Box::new(audit.clone()));

    assert!(validator.on_card_connected().unwrap().is_none());
    validator.init_new_ticket().unwrap();
    validator.add_credit(Decimal::new(20, 0)).unwrap();
    assert_eq!(validator.validate_at(t0()).unwrap(), ValidationOutcome::Restarted);
    validator.on_card_removed().unwrap();

    let ticket = validator.on_card_connected().unwrap().unwrap().clone();
    assert_eq!(ticket.credit, Decimal::new(1850, 2));
    assert_eq!(ticket.tier, "BIT");
    assert_eq!(audit.snapshot().validations[0].location, "Piazza Venezia");
}

#[test]
fn password_protected_card_with_custom_tiers() {
    let extra = r#", "password": "tk01",
        "tiers": [
            { "name": "SINGLE", "cost": "2.00", "duration_minutes": 75 },
            { "name": "DAY", "cost": "5.00", "duration_minutes": 1440 }
        ]"#;
    let config = ValidatorConfig::from_json(&config_json(extra)).unwrap();
    let tag = SimulatedTag::new(UID.to_vec());
    tag.protect(*b"tk01", [0x4F, 0x4B]);
    let mut validator = Validator::with_transport(&config, Box::new(tag.clone())).unwrap();

    assert!(validator.on_card_connected().unwrap().is_none());
    validator.init_new_ticket().unwrap();
    validator.add_credit(Decimal::new(10, 0)).unwrap();
    validator.validate_at(t0()).unwrap();
    validator
        .validate_at(t0() + chrono::Duration::minutes(80))
        .unwrap();
    // 2.00 + 2.00 then the third tap upgrades for 1.00
    let outcome = validator
        .validate_at(t0() + chrono::Duration::minutes(160))
        .unwrap();
    assert_eq!(outcome, ValidationOutcome::Upgraded);
    let ticket = validator.connected_ticket().unwrap();
    assert_eq!(ticket.tier, "DAY");
    assert_eq!(ticket.credit, Decimal::new(5, 0));
}

#[test]
fn wrong_password_is_reported() {
    let config = ValidatorConfig::from_json(&config_json(r#", "password": "nope""#)).unwrap();
    let tag = SimulatedTag::new(UID.to_vec());
    tag.protect(*b"tk01", [0x4F, 0x4B]);
    let mut validator = Validator::with_transport(&config, Box::new(tag)).unwrap();
    assert!(matches!(
        validator.on_card_connected(),
        Err(Error::ProtocolStatus { .. })
    ));
}

#[test]
fn operations_without_a_card() {
    let config = ValidatorConfig::from_json(&config_json("")).unwrap();
    let tag = SimulatedTag::new(UID.to_vec());
    let mut validator = Validator::with_transport(&config, Box::new(tag)).unwrap();
    assert!(matches!(validator.validate_at(t0()), Err(Error::NoTicket)));
    assert!(matches!(
        validator.init_new_ticket(),
        Err(Error::NoCardConnected)
    ));
}
