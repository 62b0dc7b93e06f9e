//! Integration tests for the stock commands running under a bare
//! scheduler, without the robot container's bindings.

use kitbot::command::{AutoCommand, CommandState, DriveCommand, RollerCommand};
use kitbot::config::{DriveConfig, RollerConfig};
use kitbot::input::{Flag, Inverted, ScaledWhile};
use kitbot::robot::Subsystems;
use kitbot::scheduler::Scheduler;
use kitbot::subsystems::Subsystem;
use kitbot::subsystems::drive::DriveSubsystem;
use kitbot::subsystems::roller::RollerSubsystem;
use kitbot::trigger::Trigger;

use crate::mock_hw::{MockHardware, MotorCall, RecordingSink};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn rig() -> (Scheduler<Subsystems>, Subsystems, MockHardware) {
    let hw = MockHardware::new();
    let mut sched = Scheduler::new();
    let drive_id = sched.register_subsystem("drive").unwrap();
    let roller_id = sched.register_subsystem("roller").unwrap();
    let drive_config = DriveConfig {
        square_inputs: false,
        ..DriveConfig::default()
    };
    let ports = hw.ports();
    let subs = Subsystems {
        drive: DriveSubsystem::new(drive_id, ports.left_drive, ports.right_drive, &drive_config),
        roller: RollerSubsystem::new(roller_id, ports.roller, &RollerConfig::default()),
    };
    (sched, subs, hw)
}

#[test]
fn drive_command_reads_sources_every_tick_and_stops_on_cancel() {
    let (mut sched, mut subs, hw) = rig();
    let boost = Flag::new();
    let cmd = sched
        .register_command(DriveCommand::new(
            ScaledWhile::new(Inverted(-0.8), boost.clone(), 1.0, 0.5),
            0.0,
            &subs.drive,
        ))
        .unwrap();
    let mut sink = RecordingSink::new();

    sched.schedule(cmd).unwrap();
    sched.run(&mut subs, &mut sink);
    assert!(close(subs.drive.last_request().x_speed, 0.4));

    boost.set(true);
    sched.run(&mut subs, &mut sink);
    assert!(close(subs.drive.last_request().x_speed, 0.8));
    assert!(close(hw.left.power(), 0.8));

    sched.cancel(cmd).unwrap();
    sched.run(&mut subs, &mut sink);
    assert_eq!(sched.state(cmd), Some(CommandState::Idle));
    assert_eq!(hw.left.calls().last(), Some(&MotorCall::Stop));
    assert_eq!(hw.right.calls().last(), Some(&MotorCall::Stop));
}

#[test]
fn auto_command_drives_for_its_duration_then_stops() {
    let (mut sched, mut subs, hw) = rig();
    let auto = sched
        .register_command(AutoCommand::for_subsystem(subs.drive.id(), 0.6, 3))
        .unwrap();
    let mut sink = RecordingSink::new();

    sched.schedule(auto).unwrap();
    for _ in 0..2 {
        sched.run(&mut subs, &mut sink);
        assert!(sched.is_scheduled(auto));
        assert!(close(hw.left.power(), 0.6));
    }
    sched.run(&mut subs, &mut sink);
    assert!(!sched.is_scheduled(auto));
    assert_eq!(sink.ended("AutoCommand"), 1);
    assert_eq!(hw.left.calls().last(), Some(&MotorCall::Stop));
}

#[test]
fn zero_length_auto_finishes_without_driving() {
    let (mut sched, mut subs, hw) = rig();
    let auto = sched
        .register_command(AutoCommand::for_subsystem(subs.drive.id(), 1.0, 0))
        .unwrap();
    let mut sink = RecordingSink::new();

    sched.schedule(auto).unwrap();
    sched.run(&mut subs, &mut sink);
    assert!(!sched.is_scheduled(auto));
    assert!(!hw.left.calls().iter().any(|c| matches!(c, MotorCall::Set(_))));
}

#[test]
fn rescheduled_auto_starts_from_zero() {
    let (mut sched, mut subs, _hw) = rig();
    let auto = sched
        .register_command(AutoCommand::for_subsystem(subs.drive.id(), 0.5, 2))
        .unwrap();
    let mut sink = RecordingSink::new();

    for _ in 0..2 {
        sched.schedule(auto).unwrap();
        sched.run(&mut subs, &mut sink);
        sched.run(&mut subs, &mut sink);
    }
    assert_eq!(sink.scheduled("AutoCommand"), 2);
    assert_eq!(sink.ended("AutoCommand"), 2);
}

#[test]
fn toggle_and_cancel_bindings_on_the_roller() {
    let (mut sched, mut subs, hw) = rig();
    let intake = sched
        .register_command(RollerCommand::new(0.5, 0.0, &subs.roller).named("Intake"))
        .unwrap();
    let toggle = Flag::new();
    let stop = Flag::new();
    sched
        .add_trigger(Trigger::new("toggle", toggle.clone()).toggle_on_true(intake).unwrap())
        .unwrap();
    sched
        .add_trigger(Trigger::new("stop", stop.clone()).cancel_on_true(intake).unwrap())
        .unwrap();
    let mut sink = RecordingSink::new();

    toggle.set(true);
    sched.run(&mut subs, &mut sink);
    assert!(sched.is_scheduled(intake));
    assert!(close(hw.roller.power(), 0.5));

    // Releasing the toggle button changes nothing.
    toggle.set(false);
    sched.run(&mut subs, &mut sink);
    assert!(sched.is_scheduled(intake));

    stop.set(true);
    sched.run(&mut subs, &mut sink);
    assert!(!sched.is_scheduled(intake));
    assert!(close(subs.roller.output(), 0.0));
}

#[test]
fn on_false_schedules_when_condition_drops() {
    let (mut sched, mut subs, _hw) = rig();
    let spit = sched
        .register_command(RollerCommand::new(0.0, 1.0, &subs.roller).named("Spit"))
        .unwrap();
    let sensor = Flag::new();
    sched
        .add_trigger(Trigger::new("beam", sensor.clone()).on_false(spit).unwrap())
        .unwrap();
    let mut sink = RecordingSink::new();

    sched.run(&mut subs, &mut sink);
    assert!(!sched.is_scheduled(spit));
    sensor.set(true);
    sched.run(&mut subs, &mut sink);
    assert!(!sched.is_scheduled(spit));
    sensor.set(false);
    sched.run(&mut subs, &mut sink);
    assert!(sched.is_scheduled(spit));
    assert!(close(subs.roller.output(), -1.0));
}
