// nfc-validator/src/device/models/pn532/mod.rs

pub mod config;

use crate::protocol::command::{
    Command, CommandResponse, CommandTemplate, Extraction, Payload, ResponseLayout, Status,
};

pub const IN_DATA_EXCHANGE: CommandTemplate = CommandTemplate::new(
    "IN_DATA_EXCHANGE",
    config::IN_DATA_EXCHANGE,
    ResponseLayout::new(config::IN_DATA_EXCHANGE_RESPONSE, config::MIN_RESPONSE_LEN),
    extract_status_byte,
);

pub const IN_COMMUNICATE_THRU: CommandTemplate = CommandTemplate::new(
    "IN_COMMUNICATE_THRU",
    config::IN_COMMUNICATE_THRU,
    ResponseLayout::new(config::IN_COMMUNICATE_THRU_RESPONSE, config::MIN_RESPONSE_LEN),
    extract_status_byte,
);

/// PN532 error codes (UM0701-02, 7.1 Error handling)
pub fn describe_status(code: u8) -> &'static str {
    match code {
        0x00 => "Operation successful",
        0x01 => "Time Out, the target has not answered",
        0x02 => "A CRC Error has been detected by the CIU",
        0x03 => "A Parity error has been detected by the CIU",
        0x04 => "During an anti-collision/select operation an erroneous Bit Count has been detected",
        0x05 => "Framing error during MIFARE operation",
        0x06 => "An abnormal bit-collision has been detected during bit wise anti-collision at 106 kbps",
        0x07 => "Communication buffer size insufficient",
        0x09 => "RF Buffer overflow has been detected by the CIU",
        0x0A => "In active communication mode, the RF field has not been switched on in time by the counterpart",
        0x0B => "RF Protocol Error",
        0x0D => "Temperature error: the internal temperature sensor has detected overheating",
        0x0E => "Internal buffer overflow",
        0x10 => "Invalid parameter (range, format, ...)",
        0x12 => "DEP Protocol: the PN532 configured in target mode does not support the command received from the initiator",
        0x13 => "DEP Protocol, MIFARE or ISO/IEC14443-4: the data format does not match to the specification",
        0x14 => "MIFARE: authentication error",
        0x18 => "Target or Initiator does not support NFC Secure",
        0x19 => "I2C bus line is Busy. A TDA transaction is on going",
        0x23 => "ISO/IEC14443-4: UID Check byte is wrong",
        0x25 => "DEP Protocol: invalid device state, the system is in a state which does not allow operation",
        0x26 => "Operation not allowed in this configuration (host controller interface)",
        0x27 => "This command is not acceptable due to the current context of the PN532",
        0x29 => "The PN532 configured as target has been released by the initiator",
        0x2A => "ISO/IEC14443-3B only: the ID of the card does not match, the expected card has been exchanged with another one",
        0x2B => "ISO/IEC14443-3B only: the card previously activated has disappeared",
        0x2C => "Mismatch between the NFCID3 initiator and the NFCID3 target in DEP 212/424 kbps passive",
        0x2D => "An over-current event has been detected",
        0x2E => "NAD missing in DEP frame",
        _ => "Unknown controller status",
    }
}

/// Extractor for `D5 xx {status} {data...}` responses.
pub fn extract_status_byte(layout: &ResponseLayout, raw: &[u8]) -> Extraction {
    if !layout.header_matches(raw) {
        return Extraction::new(
            CommandResponse::from_status(Status::HeaderMismatch),
            Payload::default(),
        );
    }
    let Some(&status) = raw.get(config::STATUS_OFFSET) else {
        return Extraction::new(
            CommandResponse::failure(Status::Failure.code(), "Response shorter than expected"),
            Payload::default(),
        );
    };

    let code = status & config::STATUS_ERROR_MASK;
    let payload = Payload::new(raw[config::STATUS_OFFSET + 1..].to_vec());
    let response = if code == 0 {
        CommandResponse::success(u16::from(code), describe_status(code))
    } else {
        CommandResponse::failure(u16::from(code), describe_status(code))
    };
    Extraction::new(response, payload)
}

pub fn data_exchange() -> Command {
    IN_DATA_EXCHANGE.instantiate()
}

pub fn communicate_thru() -> Command {
    IN_COMMUNICATE_THRU.instantiate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_slices_after_status() {
        let ex = extract_status_byte(IN_DATA_EXCHANGE.layout(), &[0xD5, 0x41, 0x00, 0xAA, 0xBB]);
        assert!(ex.response.is_success());
        assert_eq!(ex.payload.bytes(), &[0xAA, 0xBB]);
    }

    #[test]
    fn error_code_is_described() {
        let ex = extract_status_byte(IN_COMMUNICATE_THRU.layout(), &[0xD5, 0x43, 0x14]);
        assert_eq!(ex.response.status(), Status::Failure);
        assert_eq!(ex.response.code(), 0x14);
        assert_eq!(ex.response.message(), "MIFARE: authentication error");
    }

    #[test]
    fn more_information_flag_is_not_an_error() {
        let ex = extract_status_byte(IN_DATA_EXCHANGE.layout(), &[0xD5, 0x41, 0x40, 0x01]);
        assert!(ex.response.is_success());
    }

    #[test]
    fn wrong_header() {
        let ex = extract_status_byte(IN_DATA_EXCHANGE.layout(), &[0xD5, 0x43, 0x00]);
        assert_eq!(ex.response.status(), Status::HeaderMismatch);
    }

    #[test]
    fn truncated_response() {
        let ex = extract_status_byte(IN_DATA_EXCHANGE.layout(), &[0xD5, 0x41]);
        assert_eq!(ex.response.status(), Status::Failure);
    }
}
