//! Fixed-size record buffers
//!
//! [`Canvas`] is the encode side: a buffer of the exact record length,
//! optionally seeded from the bytes the record was decoded from, onto which
//! each field paints its own offset range. Bytes no field paints (reserved
//! areas, spare bits) keep whatever the seed held.
//!
//! [`RecordReader`] is the decode side: a position-tracking view over one
//! record's bytes.

use crate::datatypes::{decode_time_real, encode_time_real, TimeReal};
use crate::enums::WireEnum;
use crate::error::{TachoError, TachoResult};

/// Encode buffer for one fixed-size record
#[derive(Debug, Clone)]
pub struct Canvas {
    context: &'static str,
    buffer: Vec<u8>,
    position: usize,
}

impl Canvas {
    /// Create a canvas of `length` bytes
    ///
    /// When `raw` is present and has exactly `length` bytes it becomes the
    /// starting content; otherwise the canvas starts zeroed.
    pub fn new(context: &'static str, length: usize, raw: Option<&[u8]>) -> Self {
        let buffer = match raw {
            Some(raw) if raw.len() == length => raw.to_vec(),
            _ => vec![0u8; length],
        };
        Self {
            context,
            buffer,
            position: 0,
        }
    }

    /// Create a zeroed canvas of `length` bytes
    pub fn zeroed(context: &'static str, length: usize) -> Self {
        Self::new(context, length, None)
    }

    /// Total length of the canvas
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current write offset
    pub fn position(&self) -> usize {
        self.position
    }

    fn check_room(&self, width: usize) -> TachoResult<()> {
        if self.position + width > self.buffer.len() {
            return Err(TachoError::InvalidLength {
                context: self.context,
                expected: self.buffer.len(),
                actual: self.position + width,
            });
        }
        Ok(())
    }

    /// Paint a field of `width` bytes at the current offset
    ///
    /// `bytes` must be exactly `width` long.
    pub fn paint(&mut self, width: usize, bytes: &[u8]) -> TachoResult<()> {
        if bytes.len() != width {
            return Err(TachoError::InvalidLength {
                context: self.context,
                expected: width,
                actual: bytes.len(),
            });
        }
        self.check_room(width)?;
        self.buffer[self.position..self.position + width].copy_from_slice(bytes);
        self.position += width;
        Ok(())
    }

    /// Paint bytes whose width is their own length
    pub fn paint_bytes(&mut self, bytes: &[u8]) -> TachoResult<()> {
        self.paint(bytes.len(), bytes)
    }

    pub fn paint_u8(&mut self, value: u8) -> TachoResult<()> {
        self.paint(1, &[value])
    }

    pub fn paint_u16(&mut self, value: u16) -> TachoResult<()> {
        self.paint(2, &value.to_be_bytes())
    }

    /// Paint the low 24 bits of `value`, big-endian
    pub fn paint_u24(&mut self, value: u32) -> TachoResult<()> {
        if value > 0x00FF_FFFF {
            return Err(TachoError::ValueTooLarge {
                context: self.context,
                message: format!("{} does not fit in 3 bytes", value),
            });
        }
        let bytes = value.to_be_bytes();
        self.paint(3, &bytes[1..])
    }

    pub fn paint_u32(&mut self, value: u32) -> TachoResult<()> {
        self.paint(4, &value.to_be_bytes())
    }

    /// Paint a one-byte enumeration code
    pub fn paint_enum<E: WireEnum>(&mut self, value: &E) -> TachoResult<()> {
        self.paint_u8(value.to_wire()?)
    }

    /// Paint a TimeReal, zero when absent
    pub fn paint_time_real(&mut self, value: Option<TimeReal>) -> TachoResult<()> {
        self.paint(4, &encode_time_real(value))
    }

    /// Leave `width` bytes as seeded and move on
    pub fn skip(&mut self, width: usize) -> TachoResult<()> {
        self.check_room(width)?;
        self.position += width;
        Ok(())
    }

    /// Read back `width` bytes of the current content at the write offset
    ///
    /// Used by bit-field writers that must merge into seeded bits.
    pub fn peek(&self, width: usize) -> TachoResult<&[u8]> {
        self.check_room(width)?;
        Ok(&self.buffer[self.position..self.position + width])
    }

    /// Finish painting; every byte offset must have been visited
    pub fn finish(self) -> TachoResult<Vec<u8>> {
        if self.position != self.buffer.len() {
            return Err(TachoError::InvalidLength {
                context: self.context,
                expected: self.buffer.len(),
                actual: self.position,
            });
        }
        Ok(self.buffer)
    }
}

/// Decode cursor over one record's bytes
#[derive(Debug, Clone)]
pub struct RecordReader<'a> {
    context: &'static str,
    buffer: &'a [u8],
    position: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(context: &'static str, buffer: &'a [u8]) -> Self {
        Self {
            context,
            buffer,
            position: 0,
        }
    }

    /// Current read offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Read `count` bytes
    pub fn read_bytes(&mut self, count: usize) -> TachoResult<&'a [u8]> {
        if self.remaining() < count {
            return Err(TachoError::InsufficientData {
                context: self.context,
                expected: count,
                actual: self.remaining(),
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..start + count])
    }

    /// Read a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> TachoResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> TachoResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> TachoResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a 3-byte big-endian unsigned value
    pub fn read_u24(&mut self) -> TachoResult<u32> {
        let bytes = self.read_bytes(3)?;
        Ok(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    pub fn read_u32(&mut self) -> TachoResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_enum<E: WireEnum>(&mut self) -> TachoResult<E> {
        Ok(E::from_wire(self.read_u8()?))
    }

    /// Read a TimeReal; all-zero is absent
    pub fn read_time_real(&mut self) -> TachoResult<Option<TimeReal>> {
        decode_time_real(self.read_bytes(4)?)
    }

    /// Read everything left
    pub fn read_rest(&mut self) -> &'a [u8] {
        let start = self.position.min(self.buffer.len());
        self.position = self.buffer.len();
        &self.buffer[start..]
    }

    /// Check that every byte has been consumed
    pub fn finish(self) -> TachoResult<()> {
        if self.has_remaining() {
            return Err(TachoError::InvalidLength {
                context: self.context,
                expected: self.position,
                actual: self.buffer.len(),
            });
        }
        Ok(())
    }
}
