// nfc-validator/src/transport/mock.rs

use crate::device::CardModel;
use crate::transport::traits::Transport;
use crate::types::SessionHandle;
use crate::{Error, Result};

/// Mock transport for unit tests. It records sent APDUs and returns queued
/// responses in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub sent: Vec<Vec<u8>>,
    pub responses: Vec<Vec<u8>>,
    /// Record control calls: (control code, data)
    pub control_calls: Vec<(u32, Vec<u8>)>,
    /// Card hints passed to connect
    pub connects: Vec<CardModel>,
    pub disconnects: usize,
    /// Testing hook: fail the next `connect` calls
    pub connect_failures: usize,
    /// Testing hook: fail the next `disconnect` calls
    pub disconnect_failures: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&mut self, resp: Vec<u8>) {
        self.responses.push(resp);
    }

    pub fn pop_sent(&mut self) -> Option<Vec<u8>> {
        self.sent.pop()
    }

    /// Set how many subsequent connect calls should fail (for tests).
    pub fn set_connect_failures(&mut self, n: usize) {
        self.connect_failures = n;
    }

    pub fn set_disconnect_failures(&mut self, n: usize) {
        self.disconnect_failures = n;
    }

    fn next_response(&mut self) -> Result<Vec<u8>> {
        if self.responses.is_empty() {
            Err(Error::TransportFailure("no response queued".into()))
        } else {
            Ok(self.responses.remove(0))
        }
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, card: CardModel) -> Result<SessionHandle> {
        if self.connect_failures > 0 {
            self.connect_failures -= 1;
            return Err(Error::TransportFailure("no card present".into()));
        }
        self.connects.push(card);
        Ok(SessionHandle::new(self.connects.len() as u64))
    }

    fn transmit(&mut self, command: &[u8], max_response_len: usize) -> Result<Vec<u8>> {
        self.sent.push(command.to_vec());
        let mut resp = self.next_response()?;
        resp.truncate(max_response_len);
        Ok(resp)
    }

    fn control(&mut self, command: &[u8], control_code: u32) -> Result<Vec<u8>> {
        self.control_calls.push((control_code, command.to_vec()));
        self.next_response()
    }

    fn disconnect(&mut self) -> Result<()> {
        self.disconnects += 1;
        if self.disconnect_failures > 0 {
            self.disconnect_failures -= 1;
            return Err(Error::TransportFailure("card already removed".into()));
        }
        Ok(())
    }
}
