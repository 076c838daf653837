//! Plausibility checks for decoded tracker positions.
//!
//! The tracker only transmits after acquiring a valid fix, always on its
//! application port, and always with a 16-byte payload. Anything else is
//! reported as a violation next to the decoded data; the data itself is
//! never altered or withheld.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::payload::position::layout::{PAYLOAD_LEN, TRACKER_FPORT};
use crate::{DecodeError, DecodedPosition, UplinkInput, UplinkOutput, decode_uplink};

pub const NON_FINITE: &str = "GPS-NON-FINITE";
pub const LAT_RANGE: &str = "GPS-LAT-RANGE";
pub const LONG_RANGE: &str = "GPS-LONG-RANGE";
pub const NULL_ISLAND: &str = "GPS-NULL-ISLAND";
pub const TRAILING_BYTES: &str = "GPS-TRAILING-BYTES";
pub const FPORT: &str = "GPS-FPORT";

const MAX_LAT: f64 = 90.0;
const MAX_LONG: f64 = 180.0;

/// Violation severity; errors sort before warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Single plausibility finding.
///
/// # Examples
/// ```
/// use gpsuplink_core::{Severity, Violation};
///
/// let violation = Violation {
///     id: "GPS-FPORT".to_string(),
///     severity: Severity::Warning,
///     message: "unexpected fPort 2".to_string(),
/// };
/// assert_eq!(violation.severity.to_string(), "warning");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Stable violation identifier (e.g., `GPS-LAT-RANGE`).
    pub id: String,
    pub severity: Severity,
    /// Human-readable message explaining the violation.
    pub message: String,
}

impl Violation {
    fn new(id: &str, severity: Severity, message: String) -> Self {
        Self {
            id: id.to_string(),
            severity,
            message,
        }
    }
}

/// Decoded output together with its violations, sorted by severity and ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub output: UplinkOutput,
    pub violations: Vec<Violation>,
}

impl Inspection {
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// Check a decoded position against what the tracker can plausibly send.
pub fn check_position(input: &UplinkInput, position: &DecodedPosition) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !position.lat.is_finite() || !position.long.is_finite() {
        violations.push(Violation::new(
            NON_FINITE,
            Severity::Error,
            format!(
                "coordinates are not finite (lat {}, long {})",
                position.lat, position.long
            ),
        ));
    }
    if position.lat.is_finite() && position.lat.abs() > MAX_LAT {
        violations.push(Violation::new(
            LAT_RANGE,
            Severity::Error,
            format!("latitude {} outside -90..=90", position.lat),
        ));
    }
    if position.long.is_finite() && position.long.abs() > MAX_LONG {
        violations.push(Violation::new(
            LONG_RANGE,
            Severity::Error,
            format!("longitude {} outside -180..=180", position.long),
        ));
    }
    if position.lat == 0.0 && position.long == 0.0 {
        violations.push(Violation::new(
            NULL_ISLAND,
            Severity::Warning,
            "position is exactly 0,0 (missing fix?)".to_string(),
        ));
    }
    if input.bytes.len() > PAYLOAD_LEN {
        violations.push(Violation::new(
            TRAILING_BYTES,
            Severity::Warning,
            format!(
                "{} trailing bytes ignored",
                input.bytes.len() - PAYLOAD_LEN
            ),
        ));
    }
    if input.f_port != TRACKER_FPORT {
        violations.push(Violation::new(
            FPORT,
            Severity::Warning,
            format!(
                "unexpected fPort {} (tracker sends on {})",
                input.f_port, TRACKER_FPORT
            ),
        ));
    }

    violations.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| a.id.cmp(&b.id)));
    violations
}

/// Decode an uplink and attach its plausibility violations.
pub fn inspect_uplink(input: &UplinkInput) -> Result<Inspection, DecodeError> {
    let output = decode_uplink(input)?;
    let violations = check_position(input, &output.data);
    for violation in &violations {
        tracing::debug!(id = %violation.id, severity = %violation.severity, "{}", violation.message);
    }
    Ok(Inspection { output, violations })
}
