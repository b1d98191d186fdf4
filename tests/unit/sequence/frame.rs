use std::io::Cursor;

use super::*;

#[test]
fn decode_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let frame = decode_frame(&buf).unwrap();
    assert_eq!(frame.width, 1);
    assert_eq!(frame.height, 1);
    assert_eq!(
        frame.pixel(0, 0),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_frame(b"definitely not an image").is_err());
}

#[test]
fn fully_transparent_pixels_are_zeroed() {
    let frame = PreparedFrame::from_straight_rgba8(1, 1, vec![9, 9, 9, 0]).unwrap();
    assert_eq!(frame.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(frame.size(), Size::new(1.0, 1.0));
}

#[test]
fn mismatched_buffer_is_rejected() {
    let err = PreparedFrame::from_straight_rgba8(2, 2, vec![0; 12]).unwrap_err();
    assert!(matches!(err, ScrubError::Validation(_)));
    assert!(PreparedFrame::from_straight_rgba8(1, 1, vec![0; 8]).is_err());

    let forged = PreparedFrame {
        width: 4,
        height: 4,
        rgba8_premul: Arc::new(vec![0; 4]),
    };
    assert!(!forged.is_well_formed());
}
