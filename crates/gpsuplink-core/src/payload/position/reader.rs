use super::error::DecodeError;
use crate::payload::common::reader::{F64_WIDTH, f64_from_le};

pub struct PositionReader<'a> {
    payload: &'a [u8],
}

impl<'a> PositionReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.payload.len() < needed {
            return Err(DecodeError::MalformedPayload {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.payload
            .get(range.clone())
            .ok_or(DecodeError::MalformedPayload {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    /// `range` must be exactly `F64_WIDTH` wide; the layout ranges always are.
    pub fn read_f64_le(&self, range: std::ops::Range<usize>) -> Result<f64, DecodeError> {
        debug_assert_eq!(range.len(), F64_WIDTH, "f64 read range must be 8 bytes wide");
        let bytes = self.read_slice(range)?;
        f64_from_le(bytes).ok_or(DecodeError::MalformedPayload {
            needed: F64_WIDTH,
            actual: bytes.len(),
        })
    }
}
