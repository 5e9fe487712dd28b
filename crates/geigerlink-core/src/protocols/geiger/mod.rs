//! Geiger counter uplink payload decoding.
//!
//! The payload is a fixed 6-byte little-endian frame: CPM, dose rate
//! (sflt16 scaled by 10) and sensor mode. Each field is filtered on its own:
//! zero CPM, non-positive dose rates and modes outside 1..=4 are dropped
//! rather than reported as errors, so a reading may come back sparse.
//!
//! Only a buffer shorter than the frame is an error. Byte offsets live in
//! `layout`, safe reads in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::decode_payload;
