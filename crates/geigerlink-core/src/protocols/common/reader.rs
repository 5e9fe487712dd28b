pub(crate) fn optional_positive_u16(value: u16) -> Option<u16> {
    if value > 0 { Some(value) } else { None }
}

/// Negative zero and NaN are dropped along with zero and negatives.
pub(crate) fn optional_positive_f64(value: f64) -> Option<f64> {
    if value > 0.0 { Some(value) } else { None }
}

pub(crate) fn optional_member_u16(value: u16, allowed: &[u16]) -> Option<u16> {
    if allowed.contains(&value) {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{optional_member_u16, optional_positive_f64, optional_positive_u16};

    #[test]
    fn optional_positive_u16_zero() {
        assert_eq!(optional_positive_u16(0), None);
    }

    #[test]
    fn optional_positive_u16_value() {
        assert_eq!(optional_positive_u16(12), Some(12));
    }

    #[test]
    fn optional_positive_f64_drops_signed_zero_and_negatives() {
        assert_eq!(optional_positive_f64(0.0), None);
        assert_eq!(optional_positive_f64(-0.0), None);
        assert_eq!(optional_positive_f64(-1.5), None);
        assert_eq!(optional_positive_f64(f64::NAN), None);
        assert_eq!(optional_positive_f64(0.25), Some(0.25));
    }

    #[test]
    fn optional_member_u16_whitelist() {
        assert_eq!(optional_member_u16(2, &[1, 2, 3]), Some(2));
        assert_eq!(optional_member_u16(0, &[1, 2, 3]), None);
    }
}
