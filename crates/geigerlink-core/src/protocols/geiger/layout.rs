pub const CPM_RANGE: std::ops::Range<usize> = 0..2;
pub const USV_RANGE: std::ops::Range<usize> = 2..4;
pub const MODE_RANGE: std::ops::Range<usize> = 4..6;

pub const PAYLOAD_LEN: usize = 6;

/// Dose rate is transmitted as sflt16 of (µSv/h / 10).
pub const USV_SCALE: f64 = 10.0;

pub const VALID_MODES: [u16; 4] = [1, 2, 3, 4];
