use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use gpsuplink_core::{TRACKER_FPORT, UplinkInput};

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_fixture(
        &root.join("san_francisco"),
        FixtureSpec::fix(37.7749, -122.4194),
    )?;
    write_fixture(&root.join("zero_payload"), FixtureSpec::fix(0.0, 0.0))?;
    write_fixture(
        &root.join("trailing_bytes"),
        FixtureSpec::fix(-33.8688, 151.2093)
            .with_trailer(&[0xde, 0xad, 0xbe, 0xef])
            .with_variable("model", "t-beam"),
    )?;
    Ok(())
}

struct FixtureSpec {
    lat: f64,
    long: f64,
    trailer: Vec<u8>,
    variables: BTreeMap<String, String>,
}

impl FixtureSpec {
    fn fix(lat: f64, long: f64) -> Self {
        Self {
            lat,
            long,
            trailer: Vec::new(),
            variables: BTreeMap::new(),
        }
    }

    fn with_trailer(mut self, trailer: &[u8]) -> Self {
        self.trailer.extend_from_slice(trailer);
        self
    }

    fn with_variable(mut self, key: &str, value: &str) -> Self {
        self.variables.insert(key.to_string(), value.to_string());
        self
    }
}

fn write_fixture(dir: &Path, spec: FixtureSpec) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|err| format!("failed to create {}: {}", dir.display(), err))?;

    let mut input = UplinkInput::new(tracker_payload(spec.lat, spec.long), TRACKER_FPORT);
    input.bytes.extend_from_slice(&spec.trailer);
    input.variables = spec.variables;

    let json = serde_json::to_string(&input)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    let path = dir.join("input.json");
    fs::write(&path, json).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

// Same packing as the tracker firmware: two native (little-endian) doubles.
fn tracker_payload(lat: f64, long: f64) -> Vec<u8> {
    let mut payload = Vec::with_capacity(16);
    payload.extend_from_slice(&lat.to_le_bytes());
    payload.extend_from_slice(&long.to_le_bytes());
    payload
}
