//! Builders for the public radiation maps fed by Geiger counter nodes.
//!
//! Nothing here talks to the network: callers get the Safecast measurement
//! documents and the GMC Map log URL and decide how to deliver them. Both
//! services only receive complete readings (CPM and dose rate together).

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Reading, UplinkRecord};

pub const SAFECAST_UNIT_CPM: &str = "cpm";
pub const SAFECAST_UNIT_USV: &str = "usv";
pub const GMCMAP_LOG_ENDPOINT: &str = "http://www.GMCmap.com/log2.asp";

/// Fixed location metadata of a Safecast device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafecastSite {
    pub latitude: f64,
    pub longitude: f64,
    pub device_id: u32,
    pub location_name: String,
}

/// Body of a Safecast `POST /measurements` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafecastMeasurement {
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
    pub unit: String,
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
    pub device_id: u32,
    pub location_name: String,
}

/// Safecast measurements for one uplink: dose rate first, then CPM.
///
/// Returns an empty list unless the reading carries both values.
pub fn safecast_measurements(
    record: &UplinkRecord,
    site: &SafecastSite,
) -> Vec<SafecastMeasurement> {
    let (Some(cpm), Some(usv_h)) = (record.reading.cpm, record.reading.usv_h) else {
        return Vec::new();
    };
    [(usv_h, SAFECAST_UNIT_USV), (f64::from(cpm), SAFECAST_UNIT_CPM)]
        .into_iter()
        .map(|(value, unit)| SafecastMeasurement {
            latitude: site.latitude,
            longitude: site.longitude,
            value,
            unit: unit.to_string(),
            captured_at: record.received_at,
            device_id: site.device_id,
            location_name: site.location_name.clone(),
        })
        .collect()
}

/// GMC Map user account and counter identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmcMapAccount {
    pub account_id: String,
    pub geiger_counter_id: String,
}

/// GMC Map log URL for a reading.
///
/// GMC Map takes no timestamp, so only the most recent reading is worth
/// sending.
///
/// # Examples
/// ```
/// use geigerlink_core::Reading;
/// use geigerlink_core::export::{GmcMapAccount, gmcmap_log_url};
///
/// let account = GmcMapAccount {
///     account_id: "02376".to_string(),
///     geiger_counter_id: "22044260632".to_string(),
/// };
/// let reading = Reading { cpm: Some(18), usv_h: Some(0.1234), mode: None };
/// assert_eq!(
///     gmcmap_log_url(&account, &reading).as_deref(),
///     Some("http://www.GMCmap.com/log2.asp?AID=02376&GID=22044260632&CPM=18&uSV=0.123"),
/// );
/// assert!(gmcmap_log_url(&account, &Reading::default()).is_none());
/// ```
pub fn gmcmap_log_url(account: &GmcMapAccount, reading: &Reading) -> Option<String> {
    let (cpm, usv_h) = (reading.cpm?, reading.usv_h?);
    Some(format!(
        "{GMCMAP_LOG_ENDPOINT}?AID={}&GID={}&CPM={}&uSV={:.3}",
        account.account_id, account.geiger_counter_id, cpm, usv_h
    ))
}
