// nfc-validator/src/reader/ndef.rs
//! NDEF reads and writes on the connected card.

use crate::ndef::{BlockSource, NdefMessage, NdefReadout, NdefStreamReader};
use crate::protocol::command::Payload;
use crate::protocol::operation::Operation;
use crate::reader::Reader;
use crate::types::Password;
use crate::{Error, Result};

impl BlockSource for Reader {
    fn read_block(&mut self, page: u8) -> Result<Vec<u8>> {
        Ok(self.read_blocks(page)?.payload_bytes().to_vec())
    }
}

impl Reader {
    /// Stream the NDEF message stored from `start_page`.
    pub fn read_ndef_message(&mut self, start_page: u8) -> Result<NdefReadout> {
        self.log.record("Reading NDEF Message");
        let stream = NdefStreamReader::new(&self.geometry()?, start_page);
        let result = stream.read(self);
        if let Err(err) = &result {
            // transport and status failures are already recorded
            if matches!(err, Error::MalformedMessage(_) | Error::UnknownRecordType(_)) {
                self.log.record_error(err);
            }
        }
        self.log.commit();
        result
    }

    /// Content of the record stored from the first user page, `None` for a
    /// tag without an NDEF message.
    pub fn read_ndef_payload(&mut self) -> Result<Option<Payload>> {
        let page = self.geometry()?.first_user_page;
        Ok(self.read_ndef_message(page)?.message.payload())
    }

    /// Write `text` as a Text record from `start_page`, authenticating
    /// before every page when a password is given.
    pub fn write_text_ndef_message(
        &mut self,
        text: &[u8],
        start_page: u8,
        password: Option<&Password>,
    ) -> Result<Vec<Operation>> {
        self.log.record("Writing Text NDEF Message");
        let result = self.write_text_checked(text, start_page, password);
        self.log.commit();
        result
    }

    fn write_text_checked(
        &mut self,
        text: &[u8],
        start_page: u8,
        password: Option<&Password>,
    ) -> Result<Vec<Operation>> {
        let geometry = self.geometry()?;
        let bytes = NdefMessage::text(text)?.to_bytes()?;
        if start_page < geometry.first_user_page {
            let err = Error::InvalidStartingPage {
                page: start_page,
                first: geometry.first_user_page,
            };
            self.log.record_error(&err);
            return Err(err);
        }
        let available = geometry.capacity_from(start_page);
        if bytes.len() > available {
            let err = Error::CapacityExceeded {
                required: bytes.len(),
                available,
            };
            self.log.record_error(&err);
            return Err(err);
        }
        self.write_bytes(&bytes, start_page, password)
    }
}
