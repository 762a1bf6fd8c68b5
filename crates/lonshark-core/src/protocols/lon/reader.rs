use super::error::LonError;

pub struct LonReader<'a> {
    payload: &'a [u8],
}

impl<'a> LonReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), LonError> {
        if self.payload.len() < needed {
            return Err(LonError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, LonError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(LonError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    /// Low 7 bits of the byte at `offset` (node numbers).
    pub fn read_node(&self, offset: usize) -> Result<u8, LonError> {
        Ok(self.read_u8(offset)? & super::layout::NODE_MASK)
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], LonError> {
        self.payload.get(range.clone()).ok_or(LonError::TooShort {
            needed: range.end,
            actual: self.payload.len(),
        })
    }

    /// Big-endian unsigned value of up to eight bytes; an empty range yields 0.
    pub fn read_uint_be(&self, range: std::ops::Range<usize>) -> Result<u64, LonError> {
        let bytes = self.read_slice(range)?;
        debug_assert!(bytes.len() <= 8);
        Ok(bytes
            .iter()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
    }
}
