use super::*;

#[test]
fn platform_parses_case_insensitively() {
    assert_eq!("krkr".parse::<Platform>().unwrap(), Platform::Krkr);
    assert_eq!("WIN".parse::<Platform>().unwrap(), Platform::Win);
    assert_eq!(" Ems ".parse::<Platform>().unwrap(), Platform::Ems);
    assert!("psp".parse::<Platform>().is_err());
}

#[test]
fn platform_serde_is_lowercase() {
    let s = serde_json::to_string(&Platform::Common).unwrap();
    assert_eq!(s, "\"common\"");
    let p: Platform = serde_json::from_str("\"krkr\"").unwrap();
    assert_eq!(p, Platform::Krkr);
}

#[test]
fn rgba8_tag_depends_on_platform() {
    assert_eq!(
        PixelFormat::from_psb("RGBA8", Platform::Win),
        PixelFormat::WinRgba8
    );
    assert_eq!(
        PixelFormat::from_psb("RGBA8", Platform::Krkr),
        PixelFormat::WinRgba8
    );
    assert_eq!(
        PixelFormat::from_psb("RGBA8", Platform::Ems),
        PixelFormat::CommonRgba8
    );
    assert_eq!(
        PixelFormat::from_psb("DXT5", Platform::Common),
        PixelFormat::Dxt5
    );
    assert_eq!(
        PixelFormat::from_psb("A8L8", Platform::Win),
        PixelFormat::None
    );
}

#[test]
fn psb_name_drops_platform() {
    assert_eq!(PixelFormat::WinRgba8.psb_name(), "RGBA8");
    assert_eq!(PixelFormat::CommonRgba8.psb_name(), "RGBA8");
    assert_eq!(PixelFormat::CommonRgba4444.psb_name(), "RGBA4444");
    assert_eq!(PixelFormat::Dxt5.psb_name(), "DXT5");
}

#[test]
fn for_platform_keeps_depth() {
    assert_eq!(
        PixelFormat::WinRgba4444.for_platform(Platform::Common),
        PixelFormat::CommonRgba4444
    );
    assert_eq!(
        PixelFormat::CommonRgba8.for_platform(Platform::Krkr),
        PixelFormat::WinRgba8
    );
    assert_eq!(PixelFormat::Dxt5.for_platform(Platform::Win), PixelFormat::Dxt5);
}

#[test]
fn byte_len_rounds_dxt5_blocks_up() {
    assert_eq!(PixelFormat::WinRgba8.byte_len(3, 2), Some(24));
    assert_eq!(PixelFormat::CommonRgba4444.byte_len(3, 2), Some(12));
    assert_eq!(PixelFormat::Dxt5.byte_len(5, 4), Some(32));
    assert_eq!(PixelFormat::None.byte_len(5, 4), None);
}

#[test]
fn byte_len_overflow_is_none() {
    assert_eq!(PixelFormat::WinRgba8.byte_len(u32::MAX, u32::MAX), None);
    assert_eq!(PixelFormat::Dxt5.byte_len(u32::MAX, u32::MAX), None);
}

#[test]
fn platform_conventions() {
    assert!(Platform::Krkr.uses_run_length());
    assert!(!Platform::Win.uses_run_length());
    assert_eq!(Platform::Ems.default_pixel_format(), PixelFormat::CommonRgba8);
    assert_eq!(CompressKind::from_psb("RL"), CompressKind::RunLength);
    assert_eq!(CompressKind::from_psb(""), CompressKind::None);
    assert_eq!(CompressKind::RunLength.label(), Some("RL"));
    assert_eq!(CompressKind::None.label(), None);
}
