// nfc-validator/src/transport/traits.rs

use crate::device::CardModel;
use crate::types::SessionHandle;
use crate::Result;

/// Transport trait abstracts the platform smart-card service away from the
/// reader orchestrator.
///
/// Implementations own timeouts and cancellation; a call either returns the
/// device's answer or an error. Callers never retry.
pub trait Transport {
    /// Establish a session with the card currently on the reader. `card`
    /// is a hint for transports that need to pick a protocol.
    fn connect(&mut self, card: CardModel) -> Result<SessionHandle>;

    /// Send one APDU and return the raw response, at most
    /// `max_response_len` bytes.
    fn transmit(&mut self, command: &[u8], max_response_len: usize) -> Result<Vec<u8>>;

    /// Vendor-specific control exchange with the reader itself (LEDs,
    /// buzzer, escape commands).
    fn control(&mut self, command: &[u8], control_code: u32) -> Result<Vec<u8>>;

    /// Tear down the current card session. Default is a no-op for transports
    /// without session state.
    fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, card: CardModel) -> Result<SessionHandle> {
        (**self).connect(card)
    }

    fn transmit(&mut self, command: &[u8], max_response_len: usize) -> Result<Vec<u8>> {
        (**self).transmit(command, max_response_len)
    }

    fn control(&mut self, command: &[u8], control_code: u32) -> Result<Vec<u8>> {
        (**self).control(command, control_code)
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }
}
