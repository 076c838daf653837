//! gpsuplink core library: ChirpStack uplink decoding for GPS trackers.
//!
//! The tracker firmware sends its last valid fix as a 16-byte payload: the
//! latitude double followed by the longitude double, both little-endian.
//! This crate turns that payload into the `{ data: { lat, long } }` object
//! the network server expects from a `decodeUplink` codec.
//!
//! Decoding is byte-oriented and side-effect free. The payload layers
//! (layout/reader/parser) live in `payload`; plausibility checks that never
//! alter the decoded values live in `compliance`.
//!
//! Invariants:
//! - Payloads shorter than 16 bytes fail with `MalformedPayload`; no partial
//!   or zero-filled position is ever produced.
//! - Bytes past the first 16 are ignored.
//! - `fPort` and `variables` do not influence the decoded values.
//!
//! # Examples
//! ```
//! use gpsuplink_core::{UplinkInput, decode_uplink};
//!
//! let mut bytes = 37.7749f64.to_le_bytes().to_vec();
//! bytes.extend_from_slice(&(-122.4194f64).to_le_bytes());
//! let input = UplinkInput::new(bytes, 1);
//!
//! let output = decode_uplink(&input)?;
//! assert_eq!(output.data.lat, 37.7749);
//! assert_eq!(output.data.long, -122.4194);
//! # Ok::<(), gpsuplink_core::DecodeError>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod compliance;
mod payload;

pub use compliance::{Inspection, Severity, Violation, check_position, inspect_uplink};
pub use payload::position::error::DecodeError;
pub use payload::position::layout::{PAYLOAD_LEN, TRACKER_FPORT};

/// Host input object passed to `decodeUplink`.
///
/// Field names follow the host's camelCase wire shape. Unknown fields such
/// as `recvTime` are ignored.
///
/// # Examples
/// ```
/// use gpsuplink_core::UplinkInput;
///
/// let input: UplinkInput =
///     serde_json::from_str(r#"{"bytes":[1,2,3],"fPort":1,"variables":{"a":"b"}}"#).unwrap();
/// assert_eq!(input.f_port, 1);
/// assert_eq!(input.variables["a"], "b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkInput {
    /// Raw uplink payload.
    pub bytes: Vec<u8>,
    /// LoRaWAN application port.
    #[serde(default)]
    pub f_port: u8,
    /// Device-configured key/value pairs.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl UplinkInput {
    pub fn new(bytes: Vec<u8>, f_port: u8) -> Self {
        Self {
            bytes,
            f_port,
            variables: BTreeMap::new(),
        }
    }
}

/// Decoded tracker position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodedPosition {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub long: f64,
}

/// Host output object returned from `decodeUplink`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UplinkOutput {
    pub data: DecodedPosition,
}

/// Decode a raw tracker payload.
///
/// `f_port` and `variables` are part of the host calling convention and do
/// not affect the result.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use gpsuplink_core::{DecodeError, decode};
///
/// let err = decode(&[0u8; 15], 1, &BTreeMap::new()).unwrap_err();
/// assert_eq!(err, DecodeError::MalformedPayload { needed: 16, actual: 15 });
/// ```
pub fn decode(
    bytes: &[u8],
    _f_port: u8,
    _variables: &BTreeMap<String, String>,
) -> Result<DecodedPosition, DecodeError> {
    payload::position::parse_position(bytes)
}

/// Host-shaped entry point: `decodeUplink(input) -> { data }`.
pub fn decode_uplink(input: &UplinkInput) -> Result<UplinkOutput, DecodeError> {
    tracing::debug!(
        f_port = input.f_port,
        len = input.bytes.len(),
        "decoding uplink"
    );
    match decode(&input.bytes, input.f_port, &input.variables) {
        Ok(data) => Ok(UplinkOutput { data }),
        Err(err) => {
            tracing::debug!(%err, "uplink rejected");
            Err(err)
        }
    }
}
