//! Fixed-size composite records

use crate::error::{TachoError, TachoResult};
use crate::version::Version;

/// A composite record with a fixed size per generation
///
/// Implementors decode from exactly [`Record::size`] bytes and encode onto a
/// [`Canvas`](crate::canvas::Canvas) seeded from the bytes they were decoded
/// from, so untouched fields keep their original bytes.
pub trait Record: Sized {
    /// Name used in error context
    const NAME: &'static str;

    /// Whether the size differs between generation 1 and generation 2
    const GENERATION_DEPENDENT: bool = false;

    /// Exact wire size under `version`
    fn size(version: &Version) -> usize;

    /// Decode from exactly [`Record::size`] bytes
    fn decode(data: &[u8], version: &Version) -> TachoResult<Self>;

    /// Encode to exactly [`Record::size`] bytes
    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>>;

    /// Drop the originating bytes kept for canvas encoding, recursively
    ///
    /// Afterwards [`Record::encode`] starts from a zeroed canvas, so
    /// reserved bits and padding come out as zero.
    fn clear_raw_data(&mut self) {}

    /// Encode a missing record
    ///
    /// Produces an all-zero buffer of the record's size. When the size
    /// depends on the generation, a version must be given.
    ///
    /// # Errors
    /// [`TachoError::UnknownGeneration`] for a generation-dependent record
    /// without a version.
    fn encode_absent(version: Option<&Version>) -> TachoResult<Vec<u8>> {
        match version {
            Some(version) => Ok(vec![0u8; Self::size(version)]),
            None if !Self::GENERATION_DEPENDENT => Ok(vec![0u8; Self::size(&Version::default())]),
            None => Err(TachoError::UnknownGeneration { context: Self::NAME }),
        }
    }

    /// Encode an optional record, zero-filling when absent
    fn encode_optional(value: Option<&Self>, version: Option<&Version>) -> TachoResult<Vec<u8>> {
        match value {
            Some(record) => record.encode(&Version::or_default(version.copied())),
            None => Self::encode_absent(version),
        }
    }

    /// Decode `count` consecutive records
    fn decode_many(data: &[u8], version: &Version) -> TachoResult<Vec<Self>> {
        let size = Self::size(version);
        if size == 0 || data.len() % size != 0 {
            return Err(TachoError::InvalidLength {
                context: Self::NAME,
                expected: data.len() - data.len() % size.max(1),
                actual: data.len(),
            });
        }
        data.chunks_exact(size)
            .map(|chunk| Self::decode(chunk, version))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, RecordReader};
    use crate::error::expect_length;

    #[derive(Debug, PartialEq)]
    struct Pair {
        first: u8,
        second: Option<u8>,
    }

    impl Record for Pair {
        const NAME: &'static str = "Pair";
        const GENERATION_DEPENDENT: bool = true;

        fn size(version: &Version) -> usize {
            if version.is_gen2() { 2 } else { 1 }
        }

        fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
            expect_length(Self::NAME, data, Self::size(version))?;
            let mut reader = RecordReader::new(Self::NAME, data);
            let first = reader.read_u8()?;
            let second = if version.is_gen2() { Some(reader.read_u8()?) } else { None };
            reader.finish()?;
            Ok(Self { first, second })
        }

        fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
            let mut canvas = Canvas::zeroed(Self::NAME, Self::size(version));
            canvas.paint_u8(self.first)?;
            if version.is_gen2() {
                canvas.paint_u8(self.second.unwrap_or_default())?;
            }
            canvas.finish()
        }
    }

    #[test]
    fn test_encode_absent_needs_generation() {
        assert_eq!(
            Pair::encode_absent(None),
            Err(TachoError::UnknownGeneration { context: "Pair" })
        );
        assert_eq!(Pair::encode_absent(Some(&Version::GEN2)).unwrap(), vec![0, 0]);
        assert_eq!(Pair::encode_optional(None, Some(&Version::GEN1)).unwrap(), vec![0]);
    }

    #[test]
    fn test_decode_many() {
        let records = Pair::decode_many(&[1, 2, 3, 4], &Version::GEN2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], Pair { first: 3, second: Some(4) });
        assert!(Pair::decode_many(&[1, 2, 3], &Version::GEN2).is_err());
    }
}
