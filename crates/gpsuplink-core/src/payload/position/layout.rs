use crate::payload::common::reader::F64_WIDTH;

pub const LAT_RANGE: std::ops::Range<usize> = 0..F64_WIDTH;
pub const LONG_RANGE: std::ops::Range<usize> = F64_WIDTH..2 * F64_WIDTH;

pub const PAYLOAD_LEN: usize = LONG_RANGE.end;

/// Application port the tracker firmware transmits on.
pub const TRACKER_FPORT: u8 = 1;
