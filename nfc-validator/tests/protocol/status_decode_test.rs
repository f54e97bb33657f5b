use nfc_validator::device::{CardModel, ControllerModel, ReaderModel};
use nfc_validator::protocol::Operation;
use nfc_validator::types::Layer;
use nfc_validator::Error;

fn version_op() -> Operation {
    let controller = ControllerModel::Pn532.data_exchange_command();
    let card = CardModel::Ntag215.version_command();
    let mut inner = controller.bytes().to_vec();
    inner.extend_from_slice(card.bytes());
    let reader = ReaderModel::Acr122.direct_transmit_command(&inner).unwrap();
    Operation::card(reader, controller, card)
}

#[test]
fn reader_error_wins_over_inner_layers() {
    let mut op = version_op();
    op.elaborate_response(&[0x63, 0x00]);
    match op.check() {
        Err(Error::ProtocolStatus { layer, code, .. }) => {
            assert_eq!(layer, Layer::Reader);
            assert_eq!(code, 0x63);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn not_supported_status_word() {
    let mut op = Operation::reader(ReaderModel::Acr122.read_value_command(0x05).unwrap());
    op.elaborate_response(&[0x6A, 0x81]);
    match op.check() {
        Err(Error::ProtocolStatus { code, message, .. }) => {
            assert_eq!(code, 0xEB);
            assert_eq!(message, "Function not supported");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn wrong_controller_header() {
    let mut op = version_op();
    op.elaborate_response(&[0xD5, 0x43, 0x00, 0x00, 0x04, 0x90, 0x00]);
    assert!(matches!(
        op.check(),
        Err(Error::HeaderMismatch { layer: Layer::Controller })
    ));
}

#[test]
fn short_version_reply_fails_at_card_layer() {
    let mut op = version_op();
    op.elaborate_response(&[0xD5, 0x41, 0x00, 0x00, 0x04, 0x90, 0x00]);
    assert!(matches!(
        op.check(),
        Err(Error::ProtocolStatus { layer: Layer::Card, .. })
    ));
}

#[test]
fn crc_error_is_described() {
    let mut op = version_op();
    op.elaborate_response(&[0xD5, 0x41, 0x02, 0x90, 0x00]);
    let err = op.check().unwrap_err();
    assert_eq!(
        err.to_string(),
        "controller reported status 0x02: A CRC Error has been detected by the CIU"
    );
}
