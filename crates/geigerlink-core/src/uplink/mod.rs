//! The Things Network (v3) Storage Integration uplink records.
//!
//! Each line of a storage export is a JSON object wrapping one uplink. The
//! reading is decoded from the raw `frm_payload` when the uplink carries it,
//! and otherwise taken from the network-side `decoded_payload`, with the same
//! presence filters applied so both paths yield identical readings.

pub mod download;
pub mod error;
pub mod layout;
pub mod parser;

pub use parser::parse_uplink_line;
