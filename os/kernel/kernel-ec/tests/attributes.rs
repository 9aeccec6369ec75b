mod common;

use common::FakeBoard;
use kernel_ec::attr::GROUP_NAME;
use kernel_ec::{Attribute, EcError, FanController};
use kernel_ports::PortRegistry;

fn show<P, A>(attr: Attribute, ctl: &FanController<'_, P, A>) -> String
where
    P: kernel_ports::PortIo,
    A: kernel_ports::PortArbiter + ?Sized,
{
    let mut out = String::new();
    attr.show(ctl, &mut out).unwrap();
    out
}

#[test]
fn group_lists_every_node() {
    let names: Vec<_> = Attribute::ALL.iter().map(|a| a.name()).collect();
    assert_eq!(GROUP_NAME, "wujie_fan");
    assert_eq!(names, ["fan1", "fan2", "fanctl_en", "cpu_temp", "env_temp"]);
}

#[test]
fn fans_show_rpm_and_store_clamped_duty() {
    let ports = PortRegistry::<2>::new();
    let board = FakeBoard::new();
    board.set_tach(0x181e, 1000);
    let ctl = FanController::init(board.clone(), &ports).unwrap();

    let fan1 = Attribute::from_name("fan1").unwrap();
    assert_eq!(show(fan1, &ctl), "2156");
    assert_eq!(show(Attribute::Fan2, &ctl), "0");

    assert_eq!(fan1.store(&ctl, "200\n"), Ok(4));
    assert_eq!(board.ec(0xd16f), 127);

    assert_eq!(Attribute::Fan2.store(&ctl, "-5"), Ok(2));
    assert_eq!(board.ec(0xd133), 0);

    assert_eq!(Attribute::Fan2.store(&ctl, " 64 rpm"), Ok(7));
    assert_eq!(board.ec(0xd133), 64);
}

#[test]
fn control_flag_shows_zero_or_one() {
    let ports = PortRegistry::<2>::new();
    let board = FakeBoard::new();
    let ctl = FanController::init(board.clone(), &ports).unwrap();

    assert_eq!(show(Attribute::FanCtlEn, &ctl), "0");
    Attribute::FanCtlEn.store(&ctl, "7").unwrap();
    assert_eq!(board.ec(0xd130), 1);
    assert_eq!(show(Attribute::FanCtlEn, &ctl), "1");
    Attribute::FanCtlEn.store(&ctl, "0").unwrap();
    assert_eq!(show(Attribute::FanCtlEn, &ctl), "0");
}

#[test]
fn malformed_text_never_reaches_the_controller() {
    let ports = PortRegistry::<2>::new();
    let board = FakeBoard::new();
    let ctl = FanController::init(board.clone(), &ports).unwrap();

    for input in ["", "fast", "-", "\n"] {
        assert_eq!(Attribute::Fan1.store(&ctl, input), Err(EcError::InvalidInput));
        assert_eq!(Attribute::FanCtlEn.store(&ctl, input), Err(EcError::InvalidInput));
    }
    assert!(board.ops().is_empty());
}

#[test]
fn temperatures_are_read_only() {
    let ports = PortRegistry::<2>::new();
    let board = FakeBoard::new();
    board.set_ec(0xd118, 61);
    board.set_ec(0xd115, 29);
    let ctl = FanController::init(board.clone(), &ports).unwrap();

    assert_eq!(show(Attribute::CpuTemp, &ctl), "61");
    assert_eq!(show(Attribute::EnvTemp, &ctl), "29");

    board.clear_ops();
    assert_eq!(
        Attribute::CpuTemp.store(&ctl, "10"),
        Err(EcError::ReadOnly("cpu_temp"))
    );
    assert!(board.ops().is_empty());
}
