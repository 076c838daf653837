//! GPS tracker position payloads.
//!
//! The tracker packs its last valid fix as two IEEE-754 doubles, latitude
//! then longitude, each little-endian, for a fixed 16-byte payload. Bytes
//! past the second double are ignored. Shorter payloads are rejected with
//! `MalformedPayload` rather than decoded from a truncated window.
//!
//! Byte ranges live in `layout`; bounds-checked reads live in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::parse_position;
