//! Integration tests for the Robot → Scheduler → subsystems → motors
//! pipeline, driven through the gamepad the way the polling loop does.

use kitbot::adapters::dashboard::MemoryDashboard;
use kitbot::app::events::SchedulerEvent;
use kitbot::app::ports::SelectionPort;
use kitbot::command::AutoCommand;
use kitbot::config::RobotConfig;
use kitbot::input::{Axis, Button, GamepadState};
use kitbot::robot::{Robot, RobotMode};
use kitbot::selector::OptionName;
use kitbot::subsystems::Subsystem;

use crate::mock_hw::{MockHardware, RecordingSink, make_robot};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn teleop() -> (Robot, MockHardware, RecordingSink) {
    let (mut robot, hw) = make_robot(&RobotConfig::default());
    let mut sink = RecordingSink::new();
    robot
        .set_mode(RobotMode::Teleop, &MemoryDashboard::new(), &mut sink)
        .unwrap();
    (robot, hw, sink)
}

fn auto_selected(name: &str) -> SchedulerEvent {
    SchedulerEvent::AutoSelected {
        option: OptionName::try_from(name).unwrap(),
    }
}

fn claimant_name(robot: &Robot, sub: kitbot::subsystems::SubsystemId) -> Option<&'static str> {
    let sched = robot.scheduler();
    sched.claimant(sub).and_then(|id| sched.command_name(id))
}

// ── Wiring ───────────────────────────────────────────────────

#[test]
fn motors_are_configured_at_construction() {
    let (_robot, hw) = make_robot(&RobotConfig::default());
    let left = hw.left.config().unwrap();
    let right = hw.right.config().unwrap();
    let roller = hw.roller.config().unwrap();

    assert!(!left.inverted);
    assert!(right.inverted);
    assert_eq!(left.current_limit_amps, 60);
    assert_eq!(right.voltage_compensation, Some(12.0));
    assert_eq!(roller.voltage_compensation, Some(10.0));
}

#[test]
fn defaults_claim_both_subsystems_on_first_teleop_tick() {
    let (mut robot, _hw, mut sink) = teleop();
    robot.tick(&mut sink);

    let subs = robot.subsystems();
    assert_eq!(claimant_name(&robot, subs.drive.id()), Some("DriveCommand"));
    assert_eq!(claimant_name(&robot, subs.roller.id()), Some("RollerCommand"));
}

// ── Driver input ─────────────────────────────────────────────

#[test]
fn left_stick_forward_is_halved_without_bumper() {
    let (mut robot, hw, mut sink) = teleop();
    robot
        .driver()
        .update(GamepadState::default().with_axis(Axis::LeftY, -1.0));
    robot.tick(&mut sink);

    let request = robot.subsystems().drive.last_request();
    assert!(close(request.x_speed, 0.5));
    assert!(close(request.z_rotation, 0.0));
    // Squared inputs: 0.5² on both sides.
    assert!(close(hw.left.power(), 0.25));
    assert!(close(hw.right.power(), 0.25));
}

#[test]
fn right_bumper_selects_full_speed() {
    let (mut robot, _hw, mut sink) = teleop();
    robot.driver().update(
        GamepadState::default()
            .with_axis(Axis::LeftY, -1.0)
            .with_button(Button::RightBumper, true),
    );
    robot.tick(&mut sink);
    assert!(close(robot.subsystems().drive.last_request().x_speed, 1.0));
}

#[test]
fn right_stick_turns_counter_clockwise_positive() {
    let (mut robot, hw, mut sink) = teleop();
    robot
        .driver()
        .update(GamepadState::default().with_axis(Axis::RightX, -1.0));
    robot.tick(&mut sink);

    assert!(close(robot.subsystems().drive.last_request().z_rotation, 1.0));
    assert!(hw.left.power() < 0.0);
    assert!(hw.right.power() > 0.0);
}

#[test]
fn triggers_drive_the_roller() {
    let (mut robot, hw, mut sink) = teleop();
    robot
        .driver()
        .update(GamepadState::default().with_axis(Axis::RightTrigger, 0.8));
    robot.tick(&mut sink);
    assert!(close(robot.subsystems().roller.output(), 0.8));
    assert!(close(hw.roller.power(), 0.8));

    robot.driver().update(
        GamepadState::default()
            .with_axis(Axis::RightTrigger, 0.2)
            .with_axis(Axis::LeftTrigger, 0.7),
    );
    robot.tick(&mut sink);
    assert!(close(robot.subsystems().roller.output(), -0.5));
}

#[test]
fn a_button_ejects_while_held_then_default_resumes() {
    let (mut robot, hw, mut sink) = teleop();
    let roller = robot.subsystems().roller.id();
    let held = GamepadState::default()
        .with_axis(Axis::RightTrigger, 0.3)
        .with_button(Button::A, true);

    robot
        .driver()
        .update(GamepadState::default().with_axis(Axis::RightTrigger, 0.3));
    robot.tick(&mut sink);

    robot.driver().update(held);
    for _ in 0..3 {
        robot.tick(&mut sink);
        assert_eq!(claimant_name(&robot, roller), Some("RollerEject"));
        assert!(close(hw.roller.power(), 0.44));
    }
    assert!(sink.events.contains(&SchedulerEvent::Interrupted {
        command: "RollerCommand",
        by: Some("RollerEject"),
    }));

    robot.driver().update(held.with_button(Button::A, false));
    robot.tick(&mut sink);
    assert_eq!(claimant_name(&robot, roller), Some("RollerCommand"));
    assert!(close(hw.roller.power(), 0.3));
    assert_eq!(sink.scheduled("RollerEject"), 1);
    assert_eq!(sink.ended("RollerEject"), 1);
}

// ── Autonomous ───────────────────────────────────────────────

#[test]
fn autonomous_runs_the_default_option_then_finishes() {
    let (mut robot, hw) = make_robot(&RobotConfig::default());
    let mut ui = MemoryDashboard::new();
    let mut sink = RecordingSink::new();
    robot.publish_auto_options(&mut ui).unwrap();
    assert_eq!(ui.options(), ["Autonomous"]);

    robot
        .set_mode(RobotMode::Autonomous, &ui, &mut sink)
        .unwrap();
    assert!(sink.events.contains(&auto_selected("Autonomous")));
    let auto = robot.autonomous_command().unwrap();

    robot.tick(&mut sink);
    let drive = robot.subsystems().drive.id();
    assert_eq!(robot.scheduler().claimant(drive), Some(auto));
    assert!(close(robot.subsystems().drive.last_request().x_speed, 0.5));
    assert!(hw.left.power() > 0.0);

    // 50 ticks at the default config.
    for _ in 1..50 {
        robot.tick(&mut sink);
    }
    assert!(sink.events.contains(&SchedulerEvent::Finished {
        command: "AutoCommand",
    }));
    assert!(!robot.scheduler().is_scheduled(auto));

    robot.tick(&mut sink);
    assert_eq!(claimant_name(&robot, drive), Some("DriveCommand"));
}

#[test]
fn autonomous_runs_the_operator_choice() {
    let (mut robot, _hw) = make_robot(&RobotConfig::default());
    let drive = robot.subsystems().drive.id();
    let reverse = robot
        .add_auto_option("Reverse", AutoCommand::for_subsystem(drive, -0.3, 5))
        .unwrap();
    let mut ui = MemoryDashboard::new();
    let mut sink = RecordingSink::new();
    robot.publish_auto_options(&mut ui).unwrap();
    ui.choose("Reverse");

    robot
        .set_mode(RobotMode::Autonomous, &ui, &mut sink)
        .unwrap();
    assert_eq!(robot.autonomous_command(), Some(reverse));
    assert!(sink.events.contains(&auto_selected("Reverse")));

    robot.tick(&mut sink);
    assert!(close(robot.subsystems().drive.last_request().x_speed, -0.3));
}

#[test]
fn unknown_dashboard_choice_falls_back_to_default() {
    let (mut robot, _hw) = make_robot(&RobotConfig::default());
    let mut ui = MemoryDashboard::new();
    let mut sink = RecordingSink::new();
    ui.choose("Nonexistent");
    assert_eq!(ui.selected(), Some("Nonexistent"));

    robot
        .set_mode(RobotMode::Autonomous, &ui, &mut sink)
        .unwrap();
    assert_eq!(robot.selector().selected_name(), Ok("Autonomous"));
}

#[test]
fn entering_teleop_cancels_autonomous() {
    let (mut robot, _hw) = make_robot(&RobotConfig::default());
    let ui = MemoryDashboard::new();
    let mut sink = RecordingSink::new();

    robot
        .set_mode(RobotMode::Autonomous, &ui, &mut sink)
        .unwrap();
    for _ in 0..3 {
        robot.tick(&mut sink);
    }
    robot.set_mode(RobotMode::Teleop, &ui, &mut sink).unwrap();
    robot.tick(&mut sink);

    assert!(sink.events.contains(&SchedulerEvent::Interrupted {
        command: "AutoCommand",
        by: None,
    }));
    assert_eq!(robot.autonomous_command(), None);
    let drive = robot.subsystems().drive.id();
    assert_eq!(claimant_name(&robot, drive), Some("DriveCommand"));
}

#[test]
fn custom_default_option_name_from_config() {
    let mut config = RobotConfig::default();
    config.auto.default_option = String::from("Taxi");
    let (mut robot, _hw) = make_robot(&config);
    let mut sink = RecordingSink::new();

    robot
        .set_mode(RobotMode::Autonomous, &MemoryDashboard::new(), &mut sink)
        .unwrap();
    assert!(sink.events.contains(&auto_selected("Taxi")));
}

// ── Disabled ─────────────────────────────────────────────────

#[test]
fn disabling_cancels_everything_and_stops_motors() {
    let (mut robot, hw, mut sink) = teleop();
    robot.driver().update(
        GamepadState::default()
            .with_axis(Axis::LeftY, -1.0)
            .with_axis(Axis::RightTrigger, 1.0),
    );
    robot.tick(&mut sink);
    assert!(hw.left.power() > 0.0);

    robot
        .set_mode(RobotMode::Disabled, &MemoryDashboard::new(), &mut sink)
        .unwrap();
    assert!(robot.scheduler().running().is_empty());
    assert!(close(hw.left.power(), 0.0));
    assert!(close(hw.right.power(), 0.0));
    assert!(close(hw.roller.power(), 0.0));

    // Input is ignored while disabled.
    let ticks = robot.scheduler().tick_count();
    robot.tick(&mut sink);
    assert_eq!(robot.scheduler().tick_count(), ticks);
    assert!(close(hw.left.power(), 0.0));
}

#[test]
fn eject_held_through_disable_resumes_on_enable() {
    let (mut robot, hw, mut sink) = teleop();
    let roller = robot.subsystems().roller.id();
    let ui = MemoryDashboard::new();
    robot
        .driver()
        .update(GamepadState::default().with_button(Button::A, true));
    robot.tick(&mut sink);
    assert_eq!(claimant_name(&robot, roller), Some("RollerEject"));

    robot.set_mode(RobotMode::Disabled, &ui, &mut sink).unwrap();
    robot.tick(&mut sink);
    assert!(close(hw.roller.power(), 0.0));

    robot.set_mode(RobotMode::Teleop, &ui, &mut sink).unwrap();
    for _ in 0..3 {
        robot.tick(&mut sink);
        assert_eq!(claimant_name(&robot, roller), Some("RollerEject"));
        assert!(close(hw.roller.power(), 0.44));
    }
    assert_eq!(sink.scheduled("RollerEject"), 2);
    assert_eq!(sink.ended("RollerEject"), 1);
}

#[test]
fn eject_released_while_disabled_stays_off_on_enable() {
    let (mut robot, hw, mut sink) = teleop();
    let roller = robot.subsystems().roller.id();
    let ui = MemoryDashboard::new();
    robot
        .driver()
        .update(GamepadState::default().with_button(Button::A, true));
    robot.tick(&mut sink);

    robot.set_mode(RobotMode::Disabled, &ui, &mut sink).unwrap();
    robot.driver().update(GamepadState::default());
    robot.tick(&mut sink);

    robot.set_mode(RobotMode::Teleop, &ui, &mut sink).unwrap();
    robot.tick(&mut sink);
    assert_eq!(claimant_name(&robot, roller), Some("RollerCommand"));
    assert!(close(hw.roller.power(), 0.0));
    assert_eq!(sink.scheduled("RollerEject"), 1);
}

#[test]
fn every_start_is_paired_with_one_end_across_a_match() {
    let (mut robot, _hw) = make_robot(&RobotConfig::default());
    let ui = MemoryDashboard::new();
    let mut sink = RecordingSink::new();

    robot
        .set_mode(RobotMode::Autonomous, &ui, &mut sink)
        .unwrap();
    for _ in 0..10 {
        robot.tick(&mut sink);
    }
    robot.set_mode(RobotMode::Teleop, &ui, &mut sink).unwrap();
    for t in 0..30 {
        robot
            .driver()
            .update(GamepadState::default().with_button(Button::A, (5..15).contains(&t)));
        robot.tick(&mut sink);
    }
    robot.set_mode(RobotMode::Disabled, &ui, &mut sink).unwrap();

    for name in ["AutoCommand", "DriveCommand", "RollerCommand", "RollerEject"] {
        assert!(sink.scheduled(name) > 0, "{name} never ran");
        assert_eq!(sink.scheduled(name), sink.ended(name), "{name}");
    }
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| matches!(e, SchedulerEvent::ModeChanged { .. }))
            .count(),
        3
    );
}

#[test]
fn drive_safety_stops_when_nothing_drives() {
    let (mut robot, hw, mut sink) = teleop();
    robot
        .driver()
        .update(GamepadState::default().with_axis(Axis::LeftY, -1.0));
    robot.tick(&mut sink);
    robot
        .set_mode(RobotMode::Disabled, &MemoryDashboard::new(), &mut sink)
        .unwrap();

    // Default timeout is 5 ticks; periodic keeps running while disabled.
    for _ in 0..6 {
        robot.tick(&mut sink);
    }
    assert!(robot.subsystems().drive.is_safety_stopped());
    assert!(close(hw.left.power(), 0.0));
}
