//! geigerlink core library for LoRaWAN Geiger counter uplinks.
//!
//! The crate decodes the 6-byte payload sent by a Geiger counter node (CPM,
//! dose rate as a semi-float 16, sensor mode) and turns exports of The Things
//! Network Storage Integration into deterministic uplink reports. Decoding is
//! byte-oriented and side-effect free; file access is isolated in `source`.
//! Export helpers build Safecast measurements and GMC Map log URLs without
//! touching the network.
//!
//! Invariants:
//! - A decoded reading only carries a field when its value is meaningful:
//!   CPM > 0, µSv/h > 0, mode in 1..=4.
//! - Semi-float 16 values lie in (-1.0, 1.0); `0x8000` is negative zero.
//! - Report records are ordered by reception time, ties kept in input order.
//!
//! Version française (résumé):
//! Cette crate décode la trame de 6 octets d'un compteur Geiger LoRaWAN (CPM,
//! débit de dose en semi-flottant 16 bits, mode) et transforme les exports TTN
//! en rapport déterministe. Les champs non significatifs sont omis.
//!
//! # Examples
//! ```
//! use geigerlink_core::decode_payload;
//!
//! let reading = decode_payload(&[0x64, 0x00, 0x00, 0x7C, 0x02, 0x00], 1)?;
//! assert_eq!(reading.cpm, Some(100));
//! assert_eq!(reading.usv_h, Some(5.0));
//! # Ok::<(), geigerlink_core::PayloadError>(())
//! ```

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

mod analysis;
pub mod export;
mod protocols;
mod source;
mod uplink;

pub use analysis::{AnalysisError, analyze_source, analyze_uplink_file, analyze_uplink_text};
pub use protocols::geiger::decode_payload;
pub use protocols::geiger::error::PayloadError;
pub use protocols::geiger::layout::PAYLOAD_LEN;
pub use protocols::sflt16::{decode_sflt16, decode_sflt16_masked};
pub use source::{JsonLinesFileSource, SourceError, TextSource, UplinkLine, UplinkSource};
pub use uplink::error::UplinkError;
pub use uplink::download::{
    DEFAULT_CLUSTER, STORAGE_RETENTION, storage_download_window, ttn_storage_url,
};
pub use uplink::parse_uplink_line;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Decoded Geiger counter reading.
///
/// Absent fields are omitted from JSON output rather than written as `null`.
///
/// # Examples
/// ```
/// use geigerlink_core::Reading;
///
/// let reading = Reading { cpm: Some(16), usv_h: None, mode: Some(1) };
/// let json = serde_json::to_string(&reading).unwrap();
/// assert_eq!(json, r#"{"cpm":16,"mode":1}"#);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Counts per minute, present when non-zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpm: Option<u16>,
    /// Dose rate in µSv/h, present when strictly positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usv_h: Option<f64>,
    /// Sensor mode code, present when in 1..=4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u16>,
}

impl Reading {
    /// True when no field survived decoding.
    pub fn is_empty(&self) -> bool {
        self.cpm.is_none() && self.usv_h.is_none() && self.mode.is_none()
    }

    /// Both CPM and dose rate are present.
    pub fn is_complete(&self) -> bool {
        self.cpm.is_some() && self.usv_h.is_some()
    }

    /// Mode as a `SensorMode`, `None` when the mode field is absent.
    pub fn sensor_mode(&self) -> Option<SensorMode> {
        self.mode.and_then(SensorMode::from_code)
    }
}

/// Typed view of the sensor mode code.
///
/// # Examples
/// ```
/// use geigerlink_core::SensorMode;
///
/// assert_eq!(SensorMode::from_code(3), Some(SensorMode::Mode3));
/// assert_eq!(SensorMode::from_code(0), None);
/// assert_eq!(SensorMode::Mode4.code(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorMode {
    Mode1,
    Mode2,
    Mode3,
    Mode4,
}

impl SensorMode {
    /// Map a raw mode code; codes outside 1..=4 have no mode.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::Mode1),
            2 => Some(Self::Mode2),
            3 => Some(Self::Mode3),
            4 => Some(Self::Mode4),
            _ => None,
        }
    }

    /// Raw code as carried in the payload.
    pub fn code(self) -> u16 {
        match self {
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
            Self::Mode4 => 4,
        }
    }
}

/// Which part of the uplink the reading was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSource {
    /// Raw `frm_payload`, decoded locally.
    FrmPayload,
    /// Network-side `decoded_payload`.
    DecodedPayload,
}

/// One uplink from a storage export with its decoded reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UplinkRecord {
    /// Reception time at the network server (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_port: Option<u8>,
    pub source: ReadingSource,
    pub reading: Reading,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use geigerlink_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "geigerlink".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "geigerlink");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "geigerlink").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Uplink report built from a storage export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    /// Decoded uplinks ordered by reception time.
    pub records: Vec<UplinkRecord>,
    /// Lines that could not be turned into a record.
    pub skipped: u64,
    /// Latest reception time seen; resume point for the next download.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_received_at: Option<OffsetDateTime>,
}

impl UplinkReport {
    /// Latest record that carries both CPM and dose rate.
    pub fn latest_complete(&self) -> Option<&UplinkRecord> {
        self.records
            .iter()
            .rev()
            .find(|record| record.reading.is_complete())
    }
}

/// Build a stub report with base fields filled and no records.
///
/// # Examples
/// ```
/// use geigerlink_core::make_stub_report;
///
/// let report = make_stub_report("uplinks.jsonl", 123);
/// assert_eq!(report.report_version, geigerlink_core::REPORT_VERSION);
/// assert!(report.records.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> UplinkReport {
    UplinkReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "geigerlink".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        records: vec![],
        skipped: 0,
        latest_received_at: None,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn reading_omits_absent_fields() {
        let value = serde_json::to_value(Reading::default()).expect("reading json");
        assert_eq!(value, serde_json::json!({}));

        let reading = Reading {
            cpm: None,
            usv_h: Some(0.25),
            mode: None,
        };
        let value = serde_json::to_value(reading).expect("reading json");
        assert!(value.get("cpm").is_none());
        assert_eq!(value["usv_h"], 0.25);
        assert!(value.get("mode").is_none());
    }

    #[test]
    fn reading_helpers() {
        let reading = Reading {
            cpm: Some(10),
            usv_h: Some(0.1),
            mode: Some(2),
        };
        assert!(reading.is_complete());
        assert!(!reading.is_empty());
        assert_eq!(reading.sensor_mode(), Some(SensorMode::Mode2));
        assert!(Reading::default().is_empty());
        assert!(!Reading::default().is_complete());
    }

    #[test]
    fn sensor_mode_codes_round_trip() {
        for code in 1..=4 {
            let mode = SensorMode::from_code(code).expect("valid mode");
            assert_eq!(mode.code(), code);
        }
        assert_eq!(SensorMode::from_code(5), None);
    }

    #[test]
    fn report_serializes_timestamps_as_rfc3339() {
        let mut report = make_stub_report("uplinks.jsonl", 1);
        report.records.push(UplinkRecord {
            received_at: datetime!(2021-03-05 12:00:00 UTC),
            device_id: None,
            f_port: Some(1),
            source: ReadingSource::FrmPayload,
            reading: Reading::default(),
        });
        report.latest_received_at = Some(datetime!(2021-03-05 12:00:00 UTC));

        let value = serde_json::to_value(&report).expect("report json");
        let record = &value["records"][0];
        assert_eq!(record["received_at"], "2021-03-05T12:00:00Z");
        assert_eq!(record["source"], "frm_payload");
        assert!(record.get("device_id").is_none());
        assert_eq!(value["latest_received_at"], "2021-03-05T12:00:00Z");
    }

    #[test]
    fn report_omits_latest_when_none() {
        let value = serde_json::to_value(make_stub_report("x", 0)).expect("report json");
        assert!(value.get("latest_received_at").is_none());
    }
}
