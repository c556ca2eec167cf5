//! Block framing of card dump files
//!
//! A card dump is a sequence of blocks `fid (2) || appendix (1) ||
//! length (2) || value`, all big-endian. Appendix 0x00/0x02 marks the data
//! of a generation 1/2 file, 0x01/0x03 the signature of the data block
//! that precedes it.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tacho_core::error::{TachoError, TachoResult};
use tacho_core::version::{Generation, Version};

use crate::file_id::ElementaryFileId;

/// Header length: fid, appendix, length
pub const BLOCK_HEADER_LENGTH: usize = 5;

pub const APPENDIX_DATA_GEN1: u8 = 0x00;
pub const APPENDIX_SIGNATURE_GEN1: u8 = 0x01;
pub const APPENDIX_DATA_GEN2: u8 = 0x02;
pub const APPENDIX_SIGNATURE_GEN2: u8 = 0x03;

/// One framed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub file: ElementaryFileId,
    pub appendix: u8,
    pub value: Bytes,
}

impl Block {
    pub fn new(file: ElementaryFileId, appendix: u8, value: impl Into<Bytes>) -> Self {
        Self {
            file,
            appendix,
            value: value.into(),
        }
    }

    pub fn data(file: ElementaryFileId, generation: Generation, value: impl Into<Bytes>) -> Self {
        Self::new(file, data_appendix(generation), value)
    }

    pub fn signature(file: ElementaryFileId, generation: Generation, value: impl Into<Bytes>) -> Self {
        Self::new(file, signature_appendix(generation), value)
    }

    /// Whether the block holds the signature of the preceding data block
    pub fn is_signature(&self) -> bool {
        self.appendix & 0x01 != 0
    }

    /// Generation/version context selected by the appendix
    pub fn version(&self) -> Version {
        Version::from_appendix(self.appendix)
    }

    pub fn generation(&self) -> Generation {
        self.version().generation
    }

    /// Total length on the wire, header included
    pub fn wire_length(&self) -> usize {
        BLOCK_HEADER_LENGTH + self.value.len()
    }

    pub fn encode_into(&self, buffer: &mut BytesMut) -> TachoResult<()> {
        let length = u16::try_from(self.value.len()).map_err(|_| TachoError::ValueTooLarge {
            context: "Block",
            message: format!("{} value of {} bytes exceeds 65535", self.file, self.value.len()),
        })?;
        buffer.reserve(self.wire_length());
        buffer.put_u16(self.file.to_u16());
        buffer.put_u8(self.appendix);
        buffer.put_u16(length);
        buffer.put_slice(&self.value);
        Ok(())
    }

    pub fn encode(&self) -> TachoResult<Vec<u8>> {
        let mut buffer = BytesMut::with_capacity(self.wire_length());
        self.encode_into(&mut buffer)?;
        Ok(buffer.to_vec())
    }
}

pub fn data_appendix(generation: Generation) -> u8 {
    match generation {
        Generation::Generation1 => APPENDIX_DATA_GEN1,
        Generation::Generation2 => APPENDIX_DATA_GEN2,
    }
}

pub fn signature_appendix(generation: Generation) -> u8 {
    data_appendix(generation) | 0x01
}

/// Split a dump into its blocks
///
/// Block values share the input buffer.
///
/// # Errors
/// [`TachoError::InsufficientData`] when a header or value runs past the end.
pub fn split_blocks(data: &Bytes) -> TachoResult<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let remaining = data.len() - offset;
        if remaining < BLOCK_HEADER_LENGTH {
            return Err(TachoError::InsufficientData {
                context: "Block header",
                expected: BLOCK_HEADER_LENGTH,
                actual: remaining,
            });
        }
        let header = &data[offset..offset + BLOCK_HEADER_LENGTH];
        let file = ElementaryFileId::from_u16(u16::from_be_bytes([header[0], header[1]]));
        let appendix = header[2];
        let length = usize::from(u16::from_be_bytes([header[3], header[4]]));
        let start = offset + BLOCK_HEADER_LENGTH;
        if data.len() - start < length {
            return Err(TachoError::InsufficientData {
                context: "Block value",
                expected: length,
                actual: data.len() - start,
            });
        }
        blocks.push(Block {
            file,
            appendix,
            value: data.slice(start..start + length),
        });
        offset = start + length;
    }
    Ok(blocks)
}

/// Concatenate blocks back into a dump
pub fn join_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> TachoResult<Vec<u8>> {
    let mut buffer = BytesMut::new();
    for block in blocks {
        block.encode_into(&mut buffer)?;
    }
    Ok(buffer.to_vec())
}
