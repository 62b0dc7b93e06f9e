//! Fuzz target: trigger sequences through the robot
//!
//! Each input byte is one controller frame: the low bits press buttons,
//! the high bits pick stick and trigger positions, and a few values flip
//! the robot mode.  Asserts that the scheduler never panics, that no
//! subsystem ends a tick claimed by an idle command, and that disabling
//! always leaves nothing running.
//!
//! cargo fuzz run fuzz_trigger_sequence

#![no_main]

use kitbot::adapters::dashboard::MemoryDashboard;
use kitbot::adapters::sim::SimMotor;
use kitbot::app::events::SchedulerEvent;
use kitbot::app::ports::EventSink;
use kitbot::config::RobotConfig;
use kitbot::input::{Axis, Button, GamepadState};
use kitbot::robot::{HardwarePorts, Robot, RobotMode};
use kitbot::subsystems::Subsystem;
use libfuzzer_sys::fuzz_target;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &SchedulerEvent) {}
}

fn frame(byte: u8) -> GamepadState {
    let axis = f64::from(byte >> 4) / 7.5 - 1.0;
    GamepadState::default()
        .with_button(Button::A, byte & 0x01 != 0)
        .with_button(Button::RightBumper, byte & 0x02 != 0)
        .with_axis(Axis::LeftY, axis)
        .with_axis(Axis::RightX, -axis)
        .with_axis(Axis::RightTrigger, f64::from(byte & 0x0c) / 12.0)
}

fuzz_target!(|data: &[u8]| {
    let hw = HardwarePorts {
        left_drive: Box::new(SimMotor::new("left")),
        right_drive: Box::new(SimMotor::new("right")),
        roller: Box::new(SimMotor::new("roller")),
    };
    let Ok(mut robot) = Robot::new(&RobotConfig::default(), hw) else {
        return;
    };
    let ui = MemoryDashboard::new();
    let mut sink = Discard;

    for &byte in data {
        let mode = match byte {
            0xf0 => Some(RobotMode::Disabled),
            0xf1 => Some(RobotMode::Autonomous),
            0xf2 => Some(RobotMode::Teleop),
            _ => None,
        };
        if let Some(mode) = mode {
            let _ = robot.set_mode(mode, &ui, &mut sink);
            if mode == RobotMode::Disabled {
                assert!(robot.scheduler().running().is_empty());
            }
            continue;
        }

        robot.driver().update(frame(byte));
        robot.tick(&mut sink);

        let sched = robot.scheduler();
        let subs = robot.subsystems();
        for sub in [subs.drive.id(), subs.roller.id()] {
            if let Some(holder) = sched.claimant(sub) {
                assert!(sched.is_scheduled(holder));
            }
        }
        assert!(subs.roller.output().abs() <= 1.0);
    }
});
