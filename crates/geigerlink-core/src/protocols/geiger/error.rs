use thiserror::Error;

/// Errors returned by Geiger payload decoding.
///
/// # Examples
/// ```
/// use geigerlink_core::PayloadError;
///
/// let err = PayloadError::InvalidPayloadLength { needed: 6, actual: 4 };
/// assert!(err.to_string().contains("invalid payload length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("invalid payload length: need {needed} bytes, got {actual}")]
    InvalidPayloadLength { needed: usize, actual: usize },
}
