use super::*;
use crate::foundation::error::ScrubError;

#[test]
fn success_with_data_yields_payload() {
    let body = br#"{ "success": true, "data": [{ "id": "p1", "name": "Lamp", "price_cents": 4900 }] }"#;
    let products: Vec<Product> = parse_envelope(body).unwrap().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price_cents, 4900);
    assert!(products[0].image.is_none());
}

#[test]
fn failure_or_missing_data_is_no_data() {
    let failed = br#"{ "success": false, "data": [1, 2] }"#;
    assert_eq!(parse_envelope::<Vec<u32>>(failed).unwrap(), None);

    let missing = br#"{ "success": true }"#;
    assert_eq!(parse_envelope::<Vec<u32>>(missing).unwrap(), None);

    let empty = br#"{}"#;
    assert_eq!(parse_envelope::<Vec<u32>>(empty).unwrap(), None);
}

#[test]
fn malformed_body_is_a_serde_error() {
    let err = parse_envelope::<Vec<u32>>(b"<html>").unwrap_err();
    assert!(matches!(err, ScrubError::Serde(_)));
}

#[test]
fn ok_constructor_round_trips() {
    let env = ApiEnvelope::ok(7u32);
    let json = serde_json::to_vec(&env).unwrap();
    assert_eq!(parse_envelope::<u32>(&json).unwrap(), Some(7));
}
