/// Width of an IEEE-754 binary64 value on the wire.
pub(crate) const F64_WIDTH: usize = 8;

pub(crate) fn f64_from_le(bytes: &[u8]) -> Option<f64> {
    let raw: [u8; F64_WIDTH] = bytes.try_into().ok()?;
    Some(f64::from_le_bytes(raw))
}
