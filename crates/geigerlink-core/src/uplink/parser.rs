use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use super::error::UplinkError;
use super::layout;
use crate::protocols::common::reader::{
    optional_member_u16, optional_positive_f64, optional_positive_u16,
};
use crate::protocols::geiger::decode_payload;
use crate::protocols::geiger::layout::VALID_MODES;
use crate::{Reading, ReadingSource, UplinkRecord};

#[derive(Debug, Deserialize)]
struct StorageLine {
    result: Option<StorageResult>,
}

#[derive(Debug, Deserialize)]
struct StorageResult {
    end_device_ids: Option<EndDeviceIds>,
    received_at: Option<String>,
    uplink_message: Option<UplinkMessage>,
}

#[derive(Debug, Deserialize)]
struct EndDeviceIds {
    device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UplinkMessage {
    f_port: Option<u8>,
    frm_payload: Option<String>,
    decoded_payload: Option<Map<String, Value>>,
}

/// Parse one line of a TTN storage export.
///
/// Returns `Ok(None)` for blank lines.
///
/// # Examples
/// ```
/// use geigerlink_core::parse_uplink_line;
///
/// let line = r#"{"result":{"received_at":"2021-03-05T12:00:00.123456789Z",
///     "uplink_message":{"f_port":1,"frm_payload":"EAAAAAEA"}}}"#;
/// let record = parse_uplink_line(&line.replace('\n', ""))?.expect("record");
/// assert_eq!(record.reading.cpm, Some(16));
/// assert_eq!(record.reading.mode, Some(1));
/// # Ok::<(), geigerlink_core::UplinkError>(())
/// ```
pub fn parse_uplink_line(line: &str) -> Result<Option<UplinkRecord>, UplinkError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parsed: StorageLine = serde_json::from_str(line)?;
    let result = parsed
        .result
        .ok_or(UplinkError::MissingField(layout::FIELD_RESULT))?;
    let received_at = result
        .received_at
        .as_deref()
        .ok_or(UplinkError::MissingField(layout::FIELD_RECEIVED_AT))
        .and_then(parse_received_at)?;
    let message = result
        .uplink_message
        .ok_or(UplinkError::MissingField(layout::FIELD_UPLINK_MESSAGE))?;
    let device_id = result.end_device_ids.and_then(|ids| ids.device_id);

    let (reading, source) = match (&message.frm_payload, &message.decoded_payload) {
        (Some(frm_payload), _) => {
            let bytes = STANDARD.decode(frm_payload.trim())?;
            let port = message.f_port.unwrap_or(layout::DEFAULT_F_PORT);
            (decode_payload(&bytes, port)?, ReadingSource::FrmPayload)
        }
        (None, Some(decoded)) => (reading_from_decoded(decoded), ReadingSource::DecodedPayload),
        (None, None) => return Err(UplinkError::NoPayload),
    };
    debug!(?device_id, %received_at, ?reading, "parsed uplink");

    Ok(Some(UplinkRecord {
        received_at,
        device_id,
        f_port: message.f_port,
        source,
        reading,
    }))
}

/// Parse an RFC 3339 timestamp of any sub-second precision and move it to UTC.
///
/// TTN reports nanoseconds most of the time and milliseconds occasionally.
pub(crate) fn parse_received_at(value: &str) -> Result<OffsetDateTime, UplinkError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map(|ts| ts.to_offset(UtcOffset::UTC))
        .map_err(|err| UplinkError::InvalidTimestamp {
            value: value.to_string(),
            message: err.to_string(),
        })
}

fn reading_from_decoded(decoded: &Map<String, Value>) -> Reading {
    let cpm = decoded
        .get(layout::DECODED_CPM)
        .and_then(integral_u16)
        .and_then(optional_positive_u16);
    let usv_h = decoded
        .get(layout::DECODED_USV_H)
        .and_then(Value::as_f64)
        .and_then(optional_positive_f64);
    let mode = decoded
        .get(layout::DECODED_MODE)
        .and_then(integral_u16)
        .and_then(|value| optional_member_u16(value, &VALID_MODES));
    Reading { cpm, usv_h, mode }
}

/// Integer fields may arrive as JSON floats (`16.0`) depending on the
/// payload formatter; fractional or out-of-range values are dropped.
fn integral_u16(value: &Value) -> Option<u16> {
    if let Some(int) = value.as_u64() {
        return u16::try_from(int).ok();
    }
    let float = value.as_f64()?;
    if float.fract() != 0.0 || !(0.0..=f64::from(u16::MAX)).contains(&float) {
        return None;
    }
    Some(float as u16)
}
