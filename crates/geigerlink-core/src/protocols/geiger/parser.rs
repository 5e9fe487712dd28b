use tracing::trace;

use super::error::PayloadError;
use super::layout;
use super::reader::GeigerReader;
use crate::Reading;
use crate::protocols::common::reader::{
    optional_member_u16, optional_positive_f64, optional_positive_u16,
};
use crate::protocols::sflt16::decode_sflt16;

/// Decode a Geiger counter uplink payload.
///
/// `port` is the LoRaWAN FPort the frame arrived on; it does not affect
/// decoding. Bytes past the 6-byte frame are ignored.
///
/// # Examples
/// ```
/// use geigerlink_core::decode_payload;
///
/// let reading = decode_payload(&[0x10, 0x00, 0x00, 0x00, 0x01, 0x00], 1)?;
/// assert_eq!(reading.cpm, Some(16));
/// assert_eq!(reading.usv_h, None);
/// assert_eq!(reading.mode, Some(1));
/// # Ok::<(), geigerlink_core::PayloadError>(())
/// ```
pub fn decode_payload(payload: &[u8], port: u8) -> Result<Reading, PayloadError> {
    let reader = GeigerReader::new(payload);
    reader.require_len(layout::PAYLOAD_LEN)?;

    let cpm_raw: u16 = reader.read_u16_le(layout::CPM_RANGE)?;
    let usv_raw: u16 = reader.read_u16_le(layout::USV_RANGE)?;
    let mode_raw: u16 = reader.read_u16_le(layout::MODE_RANGE)?;
    trace!(port, cpm_raw, usv_raw, mode_raw, "decoding geiger payload");

    let usv_h: f64 = decode_sflt16(usv_raw) * layout::USV_SCALE;

    Ok(Reading {
        cpm: optional_positive_u16(cpm_raw),
        usv_h: optional_positive_f64(usv_h),
        mode: optional_member_u16(mode_raw, &layout::VALID_MODES),
    })
}
