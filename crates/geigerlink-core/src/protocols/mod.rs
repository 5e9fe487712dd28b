//! Payload decoding modules.
//!
//! Each payload format follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`: safe byte access and payload conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; the uplink layer handles input text
//! and aggregation.

pub(crate) mod common;
pub mod geiger;
pub mod sflt16;
