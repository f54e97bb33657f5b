// nfc-validator/src/protocol/parser.rs

use crate::{Error, Result};

/// Ensure the slice has at least `min` bytes.
pub fn ensure_len(data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::InvalidLength {
            expected: min,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Read a big-endian u16 at given index, with bounds checking.
pub fn be_u16_at(data: &[u8], idx: usize) -> Result<u16> {
    ensure_len(data, idx + 2)?;
    Ok(u16::from_be_bytes([data[idx], data[idx + 1]]))
}

/// Read a big-endian u32 at given index, with bounds checking.
pub fn be_u32_at(data: &[u8], idx: usize) -> Result<u32> {
    let s = slice_at(data, idx, 4)?;
    Ok(u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
}

/// Return a subslice with bounds checking.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    ensure_len(data, idx + len)?;
    Ok(&data[idx..idx + len])
}

/// Read a single byte at `idx` with bounds checking.
pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    ensure_len(data, idx + 1)?;
    Ok(data[idx])
}

/// Cursor over a byte buffer that advances as fields are read.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn peek(&self) -> Result<u8> {
        byte_at(self.data, self.pos)
    }

    pub fn u8(&mut self) -> Result<u8> {
        let b = byte_at(self.data, self.pos)?;
        self.pos += 1;
        Ok(b)
    }

    pub fn be_u16(&mut self) -> Result<u16> {
        let v = be_u16_at(self.data, self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub fn be_u32(&mut self) -> Result<u32> {
        let v = be_u32_at(self.data, self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let s = slice_at(self.data, self.pos, len)?;
        self.pos += len;
        Ok(s)
    }
}
