use super::*;

fn sample() -> RgbaImage {
    RgbaImage::from_raw(2, 1, vec![10, 20, 30, 255, 200, 100, 50, 0]).unwrap()
}

#[test]
fn rgba8_layouts_roundtrip_losslessly() {
    let img = sample();
    for format in [PixelFormat::CommonRgba8, PixelFormat::WinRgba8] {
        let bytes = encode_pixels(&img, format).unwrap();
        assert_eq!(bytes.len(), 8);
        let back = decode_pixels(&bytes, 2, 1, format).unwrap();
        assert_eq!(back, img);
    }
}

#[test]
fn win_layout_is_bgra() {
    let bytes = encode_pixels(&sample(), PixelFormat::WinRgba8).unwrap();
    assert_eq!(&bytes[..4], &[30, 20, 10, 255]);
}

#[test]
fn rgba4444_roundtrips_values_on_the_4bit_grid() {
    let img = RgbaImage::from_raw(1, 1, vec![0x11, 0x22, 0xEE, 0xFF]).unwrap();
    for format in [PixelFormat::CommonRgba4444, PixelFormat::WinRgba4444] {
        let bytes = encode_pixels(&img, format).unwrap();
        assert_eq!(bytes.len(), 2);
        assert_eq!(decode_pixels(&bytes, 1, 1, format).unwrap(), img);
    }
    let common = encode_pixels(&img, PixelFormat::CommonRgba4444).unwrap();
    assert_eq!(u16::from_le_bytes([common[0], common[1]]), 0x12EF);
    let win = encode_pixels(&img, PixelFormat::WinRgba4444).unwrap();
    assert_eq!(u16::from_le_bytes([win[0], win[1]]), 0xF12E);
}

#[test]
fn encode_image_applies_run_length() {
    let img = RgbaImage::from_pixel(8, 1, image::Rgba([1, 2, 3, 4]));
    let packed = encode_image(&img, PixelFormat::CommonRgba8, CompressKind::RunLength).unwrap();
    assert_eq!(packed, vec![0x80 | 5, 1, 2, 3, 4]);
    let plain = encode_image(&img, PixelFormat::CommonRgba8, CompressKind::None).unwrap();
    assert_eq!(plain.len(), 32);
}

#[test]
fn swap_red_blue_is_an_involution() {
    let mut bytes = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
    swap_red_blue(&mut bytes);
    assert_eq!(bytes, vec![3, 2, 1, 4, 7, 6, 5, 8, 9]);
    swap_red_blue(&mut bytes);
    assert_eq!(bytes, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn unsupported_formats_are_codec_errors() {
    assert!(matches!(
        encode_pixels(&sample(), PixelFormat::Dxt5),
        Err(PsbError::Codec(_))
    ));
    assert!(matches!(
        decode_pixels(&[0; 8], 2, 1, PixelFormat::None),
        Err(PsbError::Codec(_))
    ));
    assert!(matches!(
        decode_pixels(&[0; 7], 2, 1, PixelFormat::WinRgba8),
        Err(PsbError::Codec(_))
    ));
}

#[test]
fn payload_length_must_match_exactly() {
    let four = [0u8, 0xFF, 0x00, 0xFF];
    assert!(matches!(
        decode_pixels(&four, 1, 1, PixelFormat::CommonRgba4444),
        Err(PsbError::Codec(_))
    ));
    assert!(matches!(
        decode_pixels(&four, 0, 0, PixelFormat::WinRgba4444),
        Err(PsbError::Codec(_))
    ));
    assert!(matches!(
        decode_pixels(&four[..3], 1, 1, PixelFormat::CommonRgba8),
        Err(PsbError::Codec(_))
    ));
    assert!(decode_pixels(&four, 1, 1, PixelFormat::CommonRgba8).is_ok());
}

#[test]
fn huge_dimensions_are_an_error_not_a_panic() {
    assert!(matches!(
        decode_pixels(&[0; 8], u32::MAX, u32::MAX, PixelFormat::WinRgba8),
        Err(PsbError::Codec(_))
    ));
}
