use super::*;

#[test]
fn target_depends_on_source_and_ems_flag() {
    let common = CommonWinConverter::new();
    assert_eq!(common.produced_target(Platform::Win), Platform::Common);
    assert_eq!(common.produced_target(Platform::Common), Platform::Win);
    assert_eq!(common.produced_target(Platform::Ems), Platform::Win);

    let ems = CommonWinConverter::ems();
    assert_eq!(ems.produced_target(Platform::Win), Platform::Ems);
    assert_eq!(ems.name(), "EmsWinConverter");
}

#[test]
fn krkr_is_not_a_source() {
    let conv = CommonWinConverter::new();
    assert!(conv.supports(Platform::Win));
    assert!(conv.supports(Platform::Ems));
    assert!(!conv.supports(Platform::Krkr));
}

#[test]
fn run_length_is_off_by_default() {
    assert!(!CommonWinConverter::new().options().use_run_length);
}
