//! Protobuf wire-format primitives
//!
//! Just enough of the wire format to unwrap the two envelope messages the
//! store carries: LEB128 varints, field tags, length-delimited slices, and
//! skipping for unknown fields. No message schemas live here.

use super::errors::{EnvelopeError, EnvelopeResult};

pub const WIRE_VARINT: u8 = 0;
pub const WIRE_FIXED64: u8 = 1;
pub const WIRE_LEN: u8 = 2;
pub const WIRE_FIXED32: u8 = 5;

/// Cursor over a protobuf-encoded buffer
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    /// Reads one LEB128 varint, rejecting encodings past 64 bits
    pub fn read_varint(&mut self) -> EnvelopeResult<u64> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or(EnvelopeError::Truncated(start))?;
            self.pos += 1;

            let payload = u64::from(byte & 0x7F);
            if shift >= 63 && payload > 1 {
                return Err(EnvelopeError::VarintOverflow(start));
            }
            result |= payload << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift > 63 {
                return Err(EnvelopeError::VarintOverflow(start));
            }
        }
    }

    /// Reads a field tag, split into (field number, wire type)
    pub fn read_tag(&mut self) -> EnvelopeResult<(u32, u8)> {
        let start = self.pos;
        let tag = self.read_varint()?;
        let field = (tag >> 3) as u32;
        if field == 0 {
            return Err(EnvelopeError::InvalidTag(start));
        }
        Ok((field, (tag & 0x7) as u8))
    }

    /// Reads a length-delimited slice
    pub fn read_bytes(&mut self) -> EnvelopeResult<&'a [u8]> {
        let start = self.pos;
        let len = self.read_varint()? as usize;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(EnvelopeError::Truncated(start))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Skips one field of the given wire type (for unknown field numbers)
    pub fn skip(&mut self, field: u32, wire_type: u8) -> EnvelopeResult<()> {
        match wire_type {
            WIRE_VARINT => {
                self.read_varint()?;
            }
            WIRE_FIXED64 => self.advance(8)?,
            WIRE_LEN => {
                self.read_bytes()?;
            }
            WIRE_FIXED32 => self.advance(4)?,
            other => {
                return Err(EnvelopeError::UnsupportedWireType {
                    field,
                    wire_type: other,
                    offset: self.pos,
                })
            }
        }
        Ok(())
    }

    fn advance(&mut self, len: usize) -> EnvelopeResult<()> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(EnvelopeError::Truncated(self.pos))?;
        self.pos = end;
        Ok(())
    }
}

/// Rejects a known field read with the wrong wire type
pub fn expect_wire_type(
    field: u32,
    wire_type: u8,
    expected: u8,
    offset: usize,
) -> EnvelopeResult<()> {
    if wire_type == expected {
        Ok(())
    } else {
        Err(EnvelopeError::UnsupportedWireType {
            field,
            wire_type,
            offset,
        })
    }
}
