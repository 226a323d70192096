use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("read of {wanted} byte(s) at offset {at} exceeds buffer of {len}")]
    OutOfBounds { at: usize, wanted: usize, len: usize },
    #[error("sector payload is {len} bytes, expected {expected}")]
    MalformedSector { len: usize, expected: usize },
}

/// Sequential bounds-checked reader over a raw entry payload.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let b = *self.buf.get(self.pos).ok_or(DecodeError::OutOfBounds {
            at: self.pos,
            wanted: 1,
            len: self.buf.len(),
        })?;
        self.pos += 1;
        Ok(b)
    }

    /// Big-endian two's complement, matching the archive serializer.
    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let end = self.pos + 4;
        let bytes = self
            .buf
            .get(self.pos..end)
            .ok_or(DecodeError::OutOfBounds {
                at: self.pos,
                wanted: 4,
                len: self.buf.len(),
            })?;
        let v = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        self.pos = end;
        Ok(v)
    }
}
