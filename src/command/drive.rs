//! Teleoperated arcade drive.

use super::{Command, Requirements};
use crate::app::ports::AxisSource;
use crate::subsystems::drive::DriveSubsystem;
use crate::subsystems::{Subsystem, SubsystemId};

/// Reads a forward and a rotation source every tick and forwards them to
/// [`DriveSubsystem::drive_arcade`].  Runs until displaced or canceled.
pub struct DriveCommand {
    forward: Box<dyn AxisSource>,
    rotation: Box<dyn AxisSource>,
    requirements: Requirements,
}

impl DriveCommand {
    pub fn new(
        forward: impl AxisSource + 'static,
        rotation: impl AxisSource + 'static,
        drive: &DriveSubsystem,
    ) -> Self {
        Self::for_subsystem(forward, rotation, drive.id())
    }

    pub fn for_subsystem(
        forward: impl AxisSource + 'static,
        rotation: impl AxisSource + 'static,
        drive: SubsystemId,
    ) -> Self {
        Self {
            forward: Box::new(forward),
            rotation: Box::new(rotation),
            requirements: Requirements::single(drive),
        }
    }
}

impl<R: AsMut<DriveSubsystem>> Command<R> for DriveCommand {
    fn name(&self) -> &'static str {
        "DriveCommand"
    }

    fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    fn on_tick(&mut self, robot: &mut R) {
        let x = self.forward.value();
        let z = self.rotation.value();
        robot.as_mut().drive_arcade(x, z);
    }

    fn on_end(&mut self, robot: &mut R, _interrupted: bool) {
        robot.as_mut().stop();
    }
}
