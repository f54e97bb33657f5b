// nfc-validator/src/ndef/stream.rs
//! Multi-block NDEF reads.
//!
//! A message rarely fits one READ BINARY, so the reader walks the user
//! memory block by block: the first block(s) provide the headers, the
//! following ones are fed to the record until the declared content length
//! is reached.

use log::debug;

use crate::constants::TLV_TERMINATOR;
use crate::device::CardGeometry;
use crate::ndef::message::NdefMessage;
use crate::{Error, Result};

/// Something that returns the bytes of one read starting at a page.
pub trait BlockSource {
    fn read_block(&mut self, page: u8) -> Result<Vec<u8>>;
}

impl<F> BlockSource for F
where
    F: FnMut(u8) -> Result<Vec<u8>>,
{
    fn read_block(&mut self, page: u8) -> Result<Vec<u8>> {
        self(page)
    }
}

/// Result of a streamed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefReadout {
    pub message: NdefMessage,
    /// Start page of every block read, in order
    pub pages: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdefStreamReader {
    start_page: u8,
    pages_per_read: u8,
    last_page: u8,
}

impl NdefStreamReader {
    pub fn new(geometry: &CardGeometry, start_page: u8) -> Self {
        Self {
            start_page,
            pages_per_read: geometry.pages_per_read().max(1),
            last_page: geometry.last_user_page,
        }
    }

    pub fn read<S: BlockSource + ?Sized>(&self, source: &mut S) -> Result<NdefReadout> {
        let mut pages = Vec::new();
        let mut next_page = self.start_page;
        let mut buffer = Vec::new();

        // headers may straddle blocks
        let mut message = loop {
            buffer.extend(self.next_chunk(source, &mut next_page, &mut pages)?);
            match NdefMessage::parse_header(&buffer) {
                Ok(message) => break message,
                Err(Error::InvalidLength { .. }) if next_page <= self.last_page => continue,
                Err(err) => return Err(err),
            }
        };
        if message.is_empty() {
            return Ok(NdefReadout { message, pages });
        }

        let first = buffer.get(message.total_header_length()..).unwrap_or(&[]);
        let mut flush = message.absorb(first)? == first.len();
        while !message.is_complete() {
            if next_page > self.last_page {
                return Err(Error::MalformedMessage(format!(
                    "{} payload bytes past the last user page",
                    message.remaining()
                )));
            }
            let chunk = self.next_chunk(source, &mut next_page, &mut pages)?;
            flush = message.absorb(&chunk)? == chunk.len();
        }
        // content ended on a block boundary, the terminator is in the next one
        if flush && next_page <= self.last_page {
            let chunk = self.next_chunk(source, &mut next_page, &mut pages)?;
            if chunk.first() != Some(&TLV_TERMINATOR) {
                return Err(Error::MalformedMessage(format!(
                    "expected terminator at page {:#04x}",
                    pages.last().copied().unwrap_or_default()
                )));
            }
        }
        debug!(
            "ndef message of {} bytes read in {} blocks",
            message.content_payload_length(),
            pages.len()
        );
        Ok(NdefReadout { message, pages })
    }

    fn next_chunk<S: BlockSource + ?Sized>(
        &self,
        source: &mut S,
        page: &mut u8,
        pages: &mut Vec<u8>,
    ) -> Result<Vec<u8>> {
        let chunk = source.read_block(*page)?;
        if chunk.is_empty() {
            return Err(Error::MalformedMessage(format!(
                "empty read at page {:#04x}",
                page
            )));
        }
        pages.push(*page);
        *page = page.saturating_add(self.pages_per_read);
        Ok(chunk)
    }
}
