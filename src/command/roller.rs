//! Roller control from two continuous sources.

use super::{Command, Requirements};
use crate::app::ports::AxisSource;
use crate::subsystems::roller::RollerSubsystem;
use crate::subsystems::{Subsystem, SubsystemId};

/// Drives the roller at `forward - reverse` every tick.  Used both as the
/// trigger-axis default and, with constant sources, for the eject button.
pub struct RollerCommand {
    name: &'static str,
    forward: Box<dyn AxisSource>,
    reverse: Box<dyn AxisSource>,
    requirements: Requirements,
}

impl RollerCommand {
    pub fn new(
        forward: impl AxisSource + 'static,
        reverse: impl AxisSource + 'static,
        roller: &RollerSubsystem,
    ) -> Self {
        Self::for_subsystem(forward, reverse, roller.id())
    }

    pub fn for_subsystem(
        forward: impl AxisSource + 'static,
        reverse: impl AxisSource + 'static,
        roller: SubsystemId,
    ) -> Self {
        Self {
            name: "RollerCommand",
            forward: Box::new(forward),
            reverse: Box::new(reverse),
            requirements: Requirements::single(roller),
        }
    }

    /// Override the label shown in logs (e.g. "RollerEject").
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<R: AsMut<RollerSubsystem>> Command<R> for RollerCommand {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    fn on_tick(&mut self, robot: &mut R) {
        let forward = self.forward.value();
        let reverse = self.reverse.value();
        robot.as_mut().run_roller(forward, reverse);
    }

    fn on_end(&mut self, robot: &mut R, _interrupted: bool) {
        robot.as_mut().stop();
    }
}
