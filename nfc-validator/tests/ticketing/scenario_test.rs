#[path = "../common/mod.rs"]
mod common;

use chrono::Duration;
use common::fixtures::{UID, blank_tag, t0, ticketing_service};
use nfc_validator::ticketing::ValidationOutcome;
use nfc_validator::Error;
use rust_decimal::Decimal;

fn dec(units: i64, scale: u32) -> Decimal {
    Decimal::new(units, scale)
}

#[test]
fn first_tap_then_free_tap() {
    let tag = blank_tag();
    let (mut svc, audit) = ticketing_service(&tag);
    svc.init_new_ticket().unwrap();
    svc.add_credit_at(dec(10, 0), t0()).unwrap();

    assert_eq!(svc.validate_ticket_at(t0()).unwrap(), ValidationOutcome::Restarted);
    let ticket = svc.connected_ticket().unwrap().clone();
    assert_eq!(ticket.credit, dec(850, 2));
    assert_eq!(ticket.current_validation, Some(t0()));
    assert_eq!(ticket.session_validation, Some(t0()));

    let outcome = svc
        .validate_ticket_at(t0() + Duration::seconds(30))
        .unwrap();
    assert_eq!(outcome, ValidationOutcome::StillValid { refreshed: false });
    let again = svc.connected_ticket().unwrap();
    assert_eq!(again.credit, dec(850, 2));
    assert_eq!(again.current_validation, Some(t0()));
    assert_eq!(audit.snapshot().validations.len(), 1);
}

#[test]
fn repeated_base_fares_then_upgrade() {
    let tag = blank_tag();
    let (mut svc, audit) = ticketing_service(&tag);
    svc.init_new_ticket().unwrap();
    svc.add_credit_at(dec(10, 0), t0()).unwrap();

    let mut credits = Vec::new();
    for minutes in [0, 101, 202, 303] {
        svc.validate_ticket_at(t0() + Duration::minutes(minutes)).unwrap();
        credits.push(svc.connected_ticket().unwrap().credit);
    }
    assert_eq!(credits, vec![dec(850, 2), dec(7, 0), dec(550, 2), dec(4, 0)]);
    assert_eq!(svc.connected_ticket().unwrap().session_expense, dec(6, 0));

    // one more base fare would reach the 24h price
    let outcome = svc
        .validate_ticket_at(t0() + Duration::minutes(404))
        .unwrap();
    assert_eq!(outcome, ValidationOutcome::Upgraded);
    let ticket = svc.connected_ticket().unwrap();
    assert_eq!(ticket.tier, "ROMA24");
    assert_eq!(ticket.credit, dec(3, 0));
    assert_eq!(ticket.session_expense, dec(7, 0));
    assert_eq!(ticket.current_validation, Some(t0() + Duration::minutes(303)));

    // the upgrade does not restart the base window
    let outcome = svc
        .validate_ticket_at(t0() + Duration::minutes(454))
        .unwrap();
    assert_eq!(outcome, ValidationOutcome::StillValid { refreshed: true });
    assert_eq!(
        svc.connected_ticket().unwrap().current_validation,
        Some(t0() + Duration::minutes(454))
    );

    // inside the 24h window everything is free
    let outcome = svc
        .validate_ticket_at(t0() + Duration::minutes(1000))
        .unwrap();
    assert_eq!(outcome, ValidationOutcome::StillValid { refreshed: true });
    assert_eq!(svc.connected_ticket().unwrap().credit, dec(3, 0));

    // four base fares and two refreshes, the upgrade itself is not a validation
    let audit = audit.snapshot();
    assert_eq!(audit.validations.len(), 6);
    assert!(audit.validations.iter().all(|v| v.card_id == UID.to_vec()));
    assert!(audit.validations.iter().all(|v| v.location == "Roma Termini"));
}

#[test]
fn session_expires_after_next_tier_window() {
    let tag = blank_tag();
    let (mut svc, _) = ticketing_service(&tag);
    svc.init_new_ticket().unwrap();
    svc.add_credit_at(dec(10, 0), t0()).unwrap();
    svc.validate_ticket_at(t0()).unwrap();

    let outcome = svc
        .validate_ticket_at(t0() + Duration::minutes(1441))
        .unwrap();
    assert_eq!(outcome, ValidationOutcome::Restarted);
    let ticket = svc.connected_ticket().unwrap();
    assert_eq!(ticket.credit, dec(7, 0));
    assert_eq!(ticket.session_expense, dec(150, 2));
    assert_eq!(
        ticket.session_validation,
        Some(t0() + Duration::minutes(1441))
    );
}

#[test]
fn add_credit_survives_round_trip() {
    let tag = blank_tag();
    let (mut svc, audit) = ticketing_service(&tag);
    svc.init_new_ticket().unwrap();
    svc.add_credit_at(dec(1234, 2), t0()).unwrap();
    svc.add_credit_at(dec(1, 2), t0()).unwrap();

    let ticket = svc.read_ticket().unwrap();
    assert_eq!(ticket.credit, dec(1235, 2));
    assert_eq!(ticket.card_id, UID.to_vec());
    let tx = audit.snapshot().transactions;
    assert_eq!(tx.len(), 2);
    assert_eq!(tx[1].amount, dec(1, 2));
}

#[test]
fn insufficient_credit_changes_nothing() {
    let tag = blank_tag();
    let (mut svc, audit) = ticketing_service(&tag);
    svc.init_new_ticket().unwrap();
    svc.add_credit_at(dec(1, 0), t0()).unwrap();
    let memory = tag.memory();
    let updates = audit.snapshot().ticket_updates.len();

    match svc.validate_ticket_at(t0()) {
        Err(Error::InsufficientCredit { credit, amount }) => {
            assert_eq!(credit, dec(1, 0));
            assert_eq!(amount, dec(150, 2));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(tag.memory(), memory);
    assert_eq!(svc.read_ticket().unwrap().session_expense, Decimal::ZERO);
    assert_eq!(audit.snapshot().ticket_updates.len(), updates);
}

#[test]
fn non_positive_credit_rejected() {
    let tag = blank_tag();
    let (mut svc, _) = ticketing_service(&tag);
    svc.init_new_ticket().unwrap();
    assert!(matches!(
        svc.add_credit_at(Decimal::ZERO, t0()),
        Err(Error::InvalidAmount(_))
    ));
    assert!(matches!(
        svc.add_credit_at(dec(-5, 0), t0()),
        Err(Error::InvalidAmount(_))
    ));
}
