//! Semi-float 16 (`sflt16`) decoding.
//!
//! Layout of the 16-bit word:
//! - bit 15: sign
//! - bits 14..=11: exponent, effective bias 15
//! - bits 10..=0: mantissa, transmitted with its leading bit (no implicit 1)
//!
//! Values lie in the open interval (-1.0, 1.0). Unlike IEEE half floats there
//! are no subnormals, infinities or NaNs; the only special encoding is
//! `0x8000`, which stands for negative zero.

pub const SIGN_MASK: u16 = 0x8000;
pub const EXPONENT_SHIFT: u32 = 11;
pub const EXPONENT_MASK: u16 = 0x000F;
pub const MANTISSA_MASK: u16 = 0x07FF;
pub const MANTISSA_SCALE: f64 = 2048.0;
pub const EXPONENT_BIAS: i32 = 15;
pub const NEGATIVE_ZERO: u16 = 0x8000;

/// Decode a semi-float 16 word.
///
/// # Examples
/// ```
/// use geigerlink_core::decode_sflt16;
///
/// assert_eq!(decode_sflt16(0x0000), 0.0);
/// assert!(decode_sflt16(0x8000).is_sign_negative());
/// assert_eq!(decode_sflt16(0x7C00), 0.5);
/// ```
pub fn decode_sflt16(raw: u16) -> f64 {
    if raw == NEGATIVE_ZERO {
        return -0.0;
    }

    let sign: f64 = if raw & SIGN_MASK != 0 { -1.0 } else { 1.0 };
    let exponent: u16 = (raw >> EXPONENT_SHIFT) & EXPONENT_MASK;
    let mantissa: f64 = f64::from(raw & MANTISSA_MASK) / MANTISSA_SCALE;

    sign * mantissa * 2f64.powi(i32::from(exponent) - EXPONENT_BIAS)
}

/// Decode a semi-float 16 carried in a wider integer.
///
/// Bits above 15 are discarded before decoding.
pub fn decode_sflt16_masked(raw: u32) -> f64 {
    let masked: u16 = (raw & 0xFFFF) as u16;
    decode_sflt16(masked)
}
