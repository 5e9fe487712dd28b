use super::error::PayloadError;
use super::layout;

pub struct GeigerReader<'a> {
    payload: &'a [u8],
}

impl<'a> GeigerReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), PayloadError> {
        if self.payload.len() < needed {
            return Err(PayloadError::InvalidPayloadLength {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    /// Little-endian u16 at the start of `range`.
    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, PayloadError> {
        let bytes = self.read_slice(range.start..range.start + 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], PayloadError> {
        self.payload
            .get(range.clone())
            .ok_or(PayloadError::InvalidPayloadLength {
                needed: range.end.max(layout::PAYLOAD_LEN),
                actual: self.payload.len(),
            })
    }
}
