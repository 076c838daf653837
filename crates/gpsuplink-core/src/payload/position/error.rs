use thiserror::Error;

/// Errors returned by position decoding.
///
/// # Examples
/// ```
/// use gpsuplink_core::DecodeError;
///
/// let err = DecodeError::MalformedPayload { needed: 16, actual: 3 };
/// assert!(err.to_string().contains("malformed payload"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed payload: need {needed} bytes, got {actual}")]
    MalformedPayload { needed: usize, actual: usize },
}
