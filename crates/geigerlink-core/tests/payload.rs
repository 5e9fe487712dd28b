use geigerlink_core::{PayloadError, decode_payload, decode_sflt16, decode_sflt16_masked};

#[test]
fn sflt16_stays_inside_unit_interval_except_negative_zero() {
    for raw in 0..=u16::MAX {
        let value = decode_sflt16(raw);
        if raw == 0x8000 {
            assert_eq!(value.to_bits(), (-0.0f64).to_bits());
        } else {
            assert!(value > -1.0 && value < 1.0);
        }
    }
}

#[test]
fn sflt16_masking_discards_high_bits() {
    for high in [0u32, 1, 0x7FFF, 0xFFFF] {
        for low in [0u32, 0x0400, 0x7C00, 0x8000, 0xFFFF] {
            let raw = (high << 16) | low;
            assert_eq!(
                decode_sflt16_masked(raw).to_bits(),
                decode_sflt16(low as u16).to_bits()
            );
        }
    }
}

#[test]
fn mode_whitelist_holds_for_every_code() {
    for mode in 0..=u16::MAX {
        let [lo, hi] = mode.to_le_bytes();
        let reading = decode_payload(&[1, 0, 0, 0, lo, hi], 1).expect("decode");
        assert_eq!(reading.mode.is_some(), (1..=4).contains(&mode), "mode {mode}");
    }
}

#[test]
fn cpm_presence_follows_raw_value() {
    for cpm in [0u16, 1, 255, 256, u16::MAX] {
        let [lo, hi] = cpm.to_le_bytes();
        let reading = decode_payload(&[lo, hi, 0, 0, 0, 0], 1).expect("decode");
        assert_eq!(reading.cpm, if cpm == 0 { None } else { Some(cpm) });
    }
}

#[test]
fn reading_json_matches_uplink_contract() {
    let reading = decode_payload(&[0x10, 0x00, 0x00, 0x00, 0x01, 0x00], 1).expect("decode");
    let value = serde_json::to_value(reading).expect("json");
    assert_eq!(value, serde_json::json!({"cpm": 16, "mode": 1}));
}

#[test]
fn short_buffers_fail_atomically() {
    for len in 0..geigerlink_core::PAYLOAD_LEN {
        let payload = vec![0xFFu8; len];
        assert_eq!(
            decode_payload(&payload, 1),
            Err(PayloadError::InvalidPayloadLength {
                needed: 6,
                actual: len
            })
        );
    }
}
