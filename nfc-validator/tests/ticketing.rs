// Aggregator for ticketing integration tests located in `tests/ticketing/`.

#[path = "ticketing/scenario_test.rs"]
mod scenario_test;

#[path = "ticketing/encryption_test.rs"]
mod encryption_test;

#[path = "ticketing/validator_test.rs"]
mod validator_test;
