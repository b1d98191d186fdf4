use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(16, 9).unwrap();
    assert_eq!(c.size(), Size::new(16.0, 9.0));
    assert_eq!(c.byte_len(), 16 * 9 * 4);
}

