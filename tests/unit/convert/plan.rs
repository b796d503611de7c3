use super::*;

fn names(from: Platform, to: Platform) -> Vec<&'static str> {
    plan_conversion(from, to, &ConversionSettings::default())
        .unwrap()
        .iter()
        .map(|s| s.name())
        .collect()
}

#[test]
fn direct_and_chained_plans() {
    assert!(names(Platform::Win, Platform::Win).is_empty());
    assert_eq!(names(Platform::Win, Platform::Common), vec!["CommonWinConverter"]);
    assert_eq!(names(Platform::Win, Platform::Ems), vec!["EmsWinConverter"]);
    assert_eq!(names(Platform::Ems, Platform::Win), vec!["EmsWinConverter"]);
    assert_eq!(names(Platform::Win, Platform::Krkr), vec!["WinKrkrConverter"]);
    assert_eq!(
        names(Platform::Common, Platform::Krkr),
        vec!["CommonWinConverter", "WinKrkrConverter"]
    );
}

#[test]
fn unsupported_pairs_are_rejected() {
    for (from, to) in [
        (Platform::Krkr, Platform::Win),
        (Platform::Common, Platform::Ems),
        (Platform::Ems, Platform::Common),
    ] {
        let err = plan_conversion(from, to, &ConversionSettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, PsbError::UnsupportedPlatform { platform, .. } if platform == from));
    }
}

#[test]
fn overrides_reach_the_final_step() {
    let settings = ConversionSettings {
        option: ConvertOption::Minimum,
        use_run_length: Some(false),
        target_pixel_format: Some(PixelFormat::WinRgba4444),
    };
    let steps = plan_conversion(Platform::Common, Platform::Krkr, &settings).unwrap();
    assert_eq!(steps[0].options().option, ConvertOption::Minimum);
    assert!(!steps[0].options().use_run_length);
    assert_eq!(steps[1].options().option, ConvertOption::Minimum);
    assert!(!steps[1].options().use_run_length);
    assert_eq!(
        steps[1].options().target_pixel_format,
        PixelFormat::WinRgba4444
    );
}

#[test]
fn convert_document_to_same_platform_is_a_no_op() {
    let mut doc = Document::new(Platform::Krkr);
    convert_document(&mut doc, Platform::Krkr, &ConversionSettings::default()).unwrap();
    assert_eq!(doc.platform(), Platform::Krkr);
}
