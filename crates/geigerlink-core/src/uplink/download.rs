use time::{Duration, OffsetDateTime};

/// How long TTN's Storage Integration keeps uplinks.
pub const STORAGE_RETENTION: Duration = Duration::days(7);
pub const DEFAULT_CLUSTER: &str = "nam1";
pub const STORAGE_FIELD_MASK: &str = "up.uplink_message.decoded_payload";

/// History window for the next storage download.
///
/// Without a previous uplink the whole retention period is requested;
/// otherwise the time elapsed since the latest uplink, capped at the
/// retention period. A latest timestamp in the future yields a zero window.
///
/// # Examples
/// ```
/// use geigerlink_core::{STORAGE_RETENTION, storage_download_window};
/// use time::Duration;
/// use time::macros::datetime;
///
/// let now = datetime!(2021-03-05 12:00:00 UTC);
/// assert_eq!(storage_download_window(None, now), STORAGE_RETENTION);
/// let latest = datetime!(2021-03-05 11:00:00 UTC);
/// assert_eq!(storage_download_window(Some(latest), now), Duration::hours(1));
/// ```
pub fn storage_download_window(latest: Option<OffsetDateTime>, now: OffsetDateTime) -> Duration {
    match latest {
        None => STORAGE_RETENTION,
        Some(latest) => (now - latest).clamp(Duration::ZERO, STORAGE_RETENTION),
    }
}

/// Storage Integration uplink URL for one device.
///
/// The window is sent in whole seconds, sub-second remainders are dropped.
///
/// # Examples
/// ```
/// use geigerlink_core::ttn_storage_url;
/// use time::Duration;
///
/// assert_eq!(
///     ttn_storage_url("nam1", "geiger-app", "geiger-1", Duration::seconds(90)),
///     "https://nam1.cloud.thethings.network/api/v3/as/applications/geiger-app/devices/geiger-1/packages/storage/uplink_message?last=90s&field_mask=up.uplink_message.decoded_payload",
/// );
/// ```
pub fn ttn_storage_url(
    cluster: &str,
    application_id: &str,
    device_id: &str,
    window: Duration,
) -> String {
    format!(
        "https://{cluster}.cloud.thethings.network/api/v3/as/applications/{application_id}/devices/{device_id}/packages/storage/uplink_message?last={}s&field_mask={STORAGE_FIELD_MASK}",
        window.whole_seconds().max(0)
    )
}
