// nfc-validator/src/transport/pcsc.rs
//! PC/SC transport. Enabled by the `pcsc` feature.
//!
//! Uses the first reader the PC/SC service lists and talks to the card in
//! shared mode with whatever protocol the reader negotiates.

use std::ffi::CString;

use log::{debug, info};
use pcsc::{Card, Context, Disposition, Protocols, Scope, ShareMode};

use crate::device::CardModel;
use crate::transport::traits::Transport;
use crate::types::SessionHandle;
use crate::{Error, Result};

pub struct PcscTransport {
    ctx: Context,
    reader: CString,
    card: Option<Card>,
    sessions: u64,
}

impl PcscTransport {
    /// Establish a user-scope context and pick the first listed reader.
    pub fn open_first() -> Result<Self> {
        let ctx = Context::establish(Scope::User)?;
        let mut buf = [0u8; 2048];
        let reader = ctx
            .list_readers(&mut buf)?
            .next()
            .ok_or_else(|| Error::TransportFailure("no PC/SC reader found".into()))?
            .to_owned();
        info!("using reader {}", reader.to_string_lossy());
        Ok(Self {
            ctx,
            reader,
            card: None,
            sessions: 0,
        })
    }

    fn card(&self) -> Result<&Card> {
        self.card.as_ref().ok_or(Error::NoCardConnected)
    }
}

impl Transport for PcscTransport {
    fn connect(&mut self, card: CardModel) -> Result<SessionHandle> {
        debug!("connecting {} on {}", card.name(), self.reader.to_string_lossy());
        let handle = self
            .ctx
            .connect(&self.reader, ShareMode::Shared, Protocols::ANY)?;
        self.card = Some(handle);
        self.sessions += 1;
        Ok(SessionHandle::new(self.sessions))
    }

    fn transmit(&mut self, command: &[u8], max_response_len: usize) -> Result<Vec<u8>> {
        let mut rx = vec![0u8; max_response_len.min(pcsc::MAX_BUFFER_SIZE)];
        let resp = self.card()?.transmit(command, &mut rx)?;
        Ok(resp.to_vec())
    }

    fn control(&mut self, command: &[u8], control_code: u32) -> Result<Vec<u8>> {
        let mut rx = [0u8; pcsc::MAX_BUFFER_SIZE];
        let code = pcsc::ctl_code(control_code as _);
        let resp = self.card()?.control(code, command, &mut rx)?;
        Ok(resp.to_vec())
    }

    fn disconnect(&mut self) -> Result<()> {
        if let Some(card) = self.card.take() {
            card.disconnect(Disposition::LeaveCard)
                .map_err(|(_, err)| Error::Pcsc(err))?;
        }
        Ok(())
    }
}
