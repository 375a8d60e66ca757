use course_checkout::domain::order_code::{GATEWAY_FIELD_LIMIT, OrderCode, RegistrationId, decode};
use rand::Rng;

#[test]
fn test_decode_inverts_encode_for_random_inputs() {
    let mut rng = rand::thread_rng();
    for _ in 0..10_000 {
        let id = RegistrationId::new(rng.gen_range(1..=999_999)).unwrap();
        let millis: i64 = rng.gen_range(0..=4_102_444_800_000);
        let code = OrderCode::encode_at(id, millis);

        assert_eq!(decode(code.as_str()).unwrap(), id);
        assert!(code.len() <= GATEWAY_FIELD_LIMIT);
        assert_eq!(code.as_str().rsplit('_').next().unwrap().len(), 8);
    }
}

#[test]
fn test_length_bound_at_extremes() {
    for raw in [1, 9, 10, 99_999, 100_000, 999_999, u32::MAX] {
        let id = RegistrationId::new(raw).unwrap();
        for millis in [0, 1, 99_999_999, 100_000_000, i64::MAX, i64::MIN] {
            let code = OrderCode::encode_at(id, millis);
            assert!(code.len() <= GATEWAY_FIELD_LIMIT, "{code}");
            assert_eq!(decode(code.as_str()).unwrap(), id);
        }
    }
}

#[test]
fn test_same_millisecond_codes() {
    let a = RegistrationId::new(1).unwrap();
    let b = RegistrationId::new(2).unwrap();
    let millis = 1_769_000_744_772;

    assert_ne!(OrderCode::encode_at(a, millis), OrderCode::encode_at(b, millis));
    // Same registration in the same millisecond yields the same label
    assert_eq!(OrderCode::encode_at(a, millis), OrderCode::encode_at(a, millis));
}

#[test]
fn test_legacy_codes_decode_for_random_ids() {
    let mut rng = rand::thread_rng();
    for _ in 0..1_000 {
        let raw: u32 = rng.gen_range(1..=999_999);
        let millis: u64 = rng.gen_range(1_000_000_000_000..10_000_000_000_000);
        let legacy = format!("COURSE2026_{raw}_{millis}");
        assert_eq!(decode(&legacy).unwrap().value(), raw);
    }
}
