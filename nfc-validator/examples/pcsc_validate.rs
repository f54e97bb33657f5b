// Single-tap validation with the first PC/SC reader.
//
// Run with a JSON configuration file (see `ValidatorConfig`):
//   cargo run --example pcsc_validate --features pcsc -- validator.json [credit]
//
// A blank card is provisioned first. With a second argument the amount is
// added to the credit before validating.

use std::str::FromStr;

use anyhow::Context;
use nfc_validator::prelude::*;
use nfc_validator::transport::PcscTransport;
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: pcsc_validate <config.json> [credit]")?;
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let config = ValidatorConfig::from_json(&json)?;

    let transport = PcscTransport::open_first()?;
    let mut validator = Validator::with_transport(&config, Box::new(transport))?;

    println!("Waiting for the card to be read...");
    if validator.on_card_connected()?.is_none() {
        println!("Blank card, provisioning a new ticket");
        validator.init_new_ticket()?;
    }

    if let Some(amount) = args.next() {
        let amount = Decimal::from_str(&amount).context("credit must be a decimal amount")?;
        let ticket = validator.add_credit(amount)?;
        println!("Credit added, balance {}", ticket.credit);
    }

    match validator.validate() {
        Ok(outcome) => {
            let ticket = validator.connected_ticket()?;
            println!(
                "{:?}: tier {}, credit {}, session expense {}",
                outcome, ticket.tier, ticket.credit, ticket.session_expense
            );
        }
        Err(err) if err.is_business_rule() => println!("Validation refused: {}", err),
        Err(err) => return Err(err.into()),
    }

    validator.on_card_removed()?;
    Ok(())
}
