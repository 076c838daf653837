//! Uplink payload decoding.
//!
//! Each payload format follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`: bounds-checked byte access and wire conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and never mutate the caller's buffer; the crate root
//! wraps them in the host-shaped `decode_uplink` entry point.

pub(crate) mod common;
pub mod position;
