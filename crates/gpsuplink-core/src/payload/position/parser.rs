use super::error::DecodeError;
use super::layout;
use super::reader::PositionReader;
use crate::DecodedPosition;

pub fn parse_position(payload: &[u8]) -> Result<DecodedPosition, DecodeError> {
    let reader = PositionReader::new(payload);
    reader.require_len(layout::PAYLOAD_LEN)?;

    let lat = reader.read_f64_le(layout::LAT_RANGE.clone())?;
    let long = reader.read_f64_le(layout::LONG_RANGE.clone())?;

    Ok(DecodedPosition { lat, long })
}
