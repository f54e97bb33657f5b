use nfc_validator::device::{CardModel, ControllerModel, ReaderModel};
use nfc_validator::protocol::{Operation, OperationType};
use nfc_validator::types::Password;

fn wrapped(controller: nfc_validator::protocol::Command, card: nfc_validator::protocol::Command) -> Operation {
    let mut inner = controller.bytes().to_vec();
    inner.extend_from_slice(card.bytes());
    let reader = ReaderModel::Acr122.direct_transmit_command(&inner).unwrap();
    Operation::card(reader, controller, card)
}

#[test]
fn password_auth_is_wrapped_in_communicate_thru() {
    let pwd = Password::try_from("ab12").unwrap();
    let op = wrapped(
        ControllerModel::Pn532.communicate_thru_command(),
        CardModel::Ntag215.password_auth_command(&pwd).unwrap(),
    );
    assert_eq!(op.operation_type(), OperationType::Card);
    assert_eq!(
        op.wrapped_command_hex(),
        "FF 00 00 00 07 D4 42 1B 61 62 31 32"
    );
    assert_eq!(op.card_command().unwrap().bytes(), &[0x1B, b'a', b'b', b'1', b'2']);
}

#[test]
fn successive_commands_do_not_share_state() {
    let first = CardModel::Ntag215.password_auth_command(&Password::from_bytes(*b"aaaa")).unwrap();
    let second = CardModel::Ntag215.password_auth_command(&Password::from_bytes(*b"bbbb")).unwrap();
    assert_eq!(&first.bytes()[1..], b"aaaa");
    assert_eq!(&second.bytes()[1..], b"bbbb");

    let a = ReaderModel::Acr122.read_binary_command(0x04, 16).unwrap();
    let b = ReaderModel::Acr122.read_binary_command(0x08, 16).unwrap();
    assert_eq!(a.bytes()[3], 0x04);
    assert_eq!(b.bytes()[3], 0x08);
}

#[test]
fn pack_is_the_card_payload() {
    let mut op = wrapped(
        ControllerModel::Pn532.communicate_thru_command(),
        CardModel::Ntag215.password_auth_command(&Password::from_bytes(*b"pass")).unwrap(),
    );
    op.elaborate_response(&[0xD5, 0x43, 0x00, 0x80, 0x80, 0x90, 0x00, 0x00]);
    assert!(op.check().is_ok());
    assert_eq!(op.payload_bytes(), &[0x80, 0x80]);
    assert_eq!(op.response_hex(), "D5 43 00 80 80 90");
}

#[test]
fn update_binary_pads_short_pages() {
    let cmd = ReaderModel::Acr122.update_binary_command(0x20, &[0xFE]).unwrap();
    assert_eq!(cmd.bytes(), &[0xFF, 0xD6, 0x00, 0x20, 0x04, 0xFE, 0x00, 0x00, 0x00]);
    assert!(ReaderModel::Acr122.update_binary_command(0x20, &[0; 6]).is_err());
}
