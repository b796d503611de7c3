use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PsbError::unsupported_platform("CommonWinConverter", Platform::Krkr)
            .to_string()
            .contains("unsupported platform:")
    );
    assert!(
        PsbError::missing_section("object")
            .to_string()
            .contains("missing section:")
    );
    assert!(
        PsbError::malformed("x")
            .to_string()
            .contains("malformed field:")
    );
    assert!(PsbError::codec("x").to_string().contains("codec error:"));
    assert!(
        PsbError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn unsupported_platform_names_converter_and_platform() {
    let msg = PsbError::unsupported_platform("WinKrkrConverter", Platform::Ems).to_string();
    assert!(msg.contains("WinKrkrConverter"));
    assert!(msg.contains("'ems'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PsbError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
