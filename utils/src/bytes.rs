//! Little-endian wire codec used by the Dash P2P protocol.
//!
//! [`ByteReader`] consumes a borrowed buffer and fails with [`ReadError`]
//! instead of panicking on truncated input. [`ByteWriter`] appends to an
//! owned buffer.

use thiserror::Error;

/// Failure while decoding a byte buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("length {0} exceeds the remaining input")]
    LengthOverflow(u64),

    #[error("invalid utf-8 in string")]
    InvalidUtf8,
}

/// Sequential reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed between `start` and the current position.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.position)..self.position]
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        if n > self.remaining() {
            return Err(ReadError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, ReadError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Ports are the one big-endian field of the masternode entry.
    pub fn read_u16_be(&mut self) -> Result<u16, ReadError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32, ReadError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, ReadError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64_le(&mut self) -> Result<i64, ReadError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Bitcoin `CompactSize` integer.
    pub fn read_var_int(&mut self) -> Result<u64, ReadError> {
        match self.read_u8()? {
            0xfd => Ok(u64::from(self.read_u16_le()?)),
            0xfe => Ok(u64::from(self.read_u32_le()?)),
            0xff => self.read_u64_le(),
            n => Ok(u64::from(n)),
        }
    }

    /// Reads a `CompactSize` count and checks that at least `count * item_size`
    /// bytes remain, so hostile counts cannot trigger huge allocations.
    pub fn read_count(&mut self, item_size: usize) -> Result<usize, ReadError> {
        let count = self.read_var_int()?;
        let needed = count.saturating_mul(item_size.max(1) as u64);
        if needed > self.remaining() as u64 {
            return Err(ReadError::LengthOverflow(count));
        }
        Ok(count as usize)
    }

    /// `CompactSize`-prefixed byte string.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], ReadError> {
        let len = self.read_count(1)?;
        self.read_bytes(len)
    }

    pub fn read_var_string(&mut self) -> Result<String, ReadError> {
        let bytes = self.read_var_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReadError::InvalidUtf8)
    }
}

/// Appending writer producing wire bytes.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn write_u16_le(&mut self, v: u16) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u16_be(&mut self, v: u16) -> &mut Self {
        self.write_bytes(&v.to_be_bytes())
    }

    pub fn write_u32_le(&mut self, v: u32) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i32_le(&mut self, v: i32) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u64_le(&mut self, v: u64) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i64_le(&mut self, v: i64) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_var_int(&mut self, v: u64) -> &mut Self {
        match v {
            0..=0xfc => self.write_u8(v as u8),
            0xfd..=0xffff => self.write_u8(0xfd).write_u16_le(v as u16),
            0x1_0000..=0xffff_ffff => self.write_u8(0xfe).write_u32_le(v as u32),
            _ => self.write_u8(0xff).write_u64_le(v),
        }
    }

    pub fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_var_int(bytes.len() as u64).write_bytes(bytes)
    }

    pub fn write_var_string(&mut self, s: &str) -> &mut Self {
        self.write_var_bytes(s.as_bytes())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
