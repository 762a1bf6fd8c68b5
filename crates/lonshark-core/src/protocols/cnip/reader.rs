use super::error::CnipError;

pub struct CnipReader<'a> {
    payload: &'a [u8],
}

impl<'a> CnipReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), CnipError> {
        if self.payload.len() < needed {
            return Err(CnipError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, CnipError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(CnipError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, CnipError> {
        let bytes: [u8; 2] = self.read_array(range)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u32_be(&self, range: std::ops::Range<usize>) -> Result<u32, CnipError> {
        let bytes: [u8; 4] = self.read_array(range)?;
        Ok(u32::from_be_bytes(bytes))
    }

    fn read_array<const N: usize>(
        &self,
        range: std::ops::Range<usize>,
    ) -> Result<[u8; N], CnipError> {
        let bytes = self.payload.get(range.clone()).ok_or(CnipError::TooShort {
            needed: range.end,
            actual: self.payload.len(),
        })?;
        bytes.try_into().map_err(|_| CnipError::TooShort {
            needed: N,
            actual: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::CnipReader;
    use crate::protocols::cnip::error::CnipError;

    #[test]
    fn reads_big_endian_fields() {
        let bytes = [0x12, 0x34, 0xde, 0xad, 0xbe, 0xef];
        let reader = CnipReader::new(&bytes);
        assert_eq!(reader.read_u16_be(0..2).unwrap(), 0x1234);
        assert_eq!(reader.read_u32_be(2..6).unwrap(), 0xdead_beef);
        assert_eq!(reader.read_u8(1).unwrap(), 0x34);
    }

    #[test]
    fn out_of_range_read_reports_needed_len() {
        let bytes = [0u8; 3];
        let reader = CnipReader::new(&bytes);
        let err = reader.read_u32_be(0..4).unwrap_err();
        assert_eq!(
            err,
            CnipError::TooShort {
                needed: 4,
                actual: 3
            }
        );
    }
}
