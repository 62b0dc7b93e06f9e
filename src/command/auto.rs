//! Stock autonomous routine: drive straight for a fixed number of ticks.

use log::info;

use super::{Command, Requirements};
use crate::config::AutoConfig;
use crate::subsystems::drive::DriveSubsystem;
use crate::subsystems::{Subsystem, SubsystemId};

pub struct AutoCommand {
    speed: f64,
    duration_ticks: u32,
    elapsed_ticks: u32,
    requirements: Requirements,
}

impl AutoCommand {
    pub fn new(drive: &DriveSubsystem, config: &AutoConfig) -> Self {
        Self::for_subsystem(drive.id(), config.drive_speed, config.drive_ticks)
    }

    pub fn for_subsystem(drive: SubsystemId, speed: f64, duration_ticks: u32) -> Self {
        Self {
            speed,
            duration_ticks,
            elapsed_ticks: 0,
            requirements: Requirements::single(drive),
        }
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }
}

impl<R: AsMut<DriveSubsystem>> Command<R> for AutoCommand {
    fn name(&self) -> &'static str {
        "AutoCommand"
    }

    fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    fn on_start(&mut self, _robot: &mut R) {
        self.elapsed_ticks = 0;
        info!(
            "auto: driving at {:.2} for {} ticks",
            self.speed, self.duration_ticks
        );
    }

    fn on_tick(&mut self, robot: &mut R) {
        if self.elapsed_ticks < self.duration_ticks {
            robot.as_mut().drive_arcade(self.speed, 0.0);
        }
        self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
    }

    fn on_end(&mut self, robot: &mut R, _interrupted: bool) {
        robot.as_mut().stop();
    }

    fn is_finished(&self) -> bool {
        self.elapsed_ticks >= self.duration_ticks
    }
}
