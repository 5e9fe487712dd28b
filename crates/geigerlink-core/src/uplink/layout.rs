pub const FIELD_RESULT: &str = "result";
pub const FIELD_RECEIVED_AT: &str = "result.received_at";
pub const FIELD_UPLINK_MESSAGE: &str = "result.uplink_message";

pub const DECODED_CPM: &str = "cpm";
pub const DECODED_USV_H: &str = "usv_h";
pub const DECODED_MODE: &str = "mode";

/// FPort assumed when an uplink omits it.
pub const DEFAULT_F_PORT: u8 = 1;
