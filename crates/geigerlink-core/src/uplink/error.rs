use thiserror::Error;

use crate::protocols::geiger::error::PayloadError;

/// Errors returned while turning a storage line into an uplink record.
///
/// # Examples
/// ```
/// use geigerlink_core::UplinkError;
///
/// let err = UplinkError::MissingField("result");
/// assert!(err.to_string().contains("missing field"));
/// ```
#[derive(Debug, Error)]
pub enum UplinkError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },
    #[error("invalid base64 frm_payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),
    #[error("uplink carries neither frm_payload nor decoded_payload")]
    NoPayload,
}
