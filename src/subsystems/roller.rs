//! Roller mechanism subsystem (single motor).
//!
//! Forward intakes, reverse ejects.  The net command is
//! `forward - reverse`, so two analog triggers can share one motor.

use log::debug;

use super::{Subsystem, SubsystemId};
use crate::app::ports::{MotorConfig, MotorPort};
use crate::config::RollerConfig;

pub struct RollerSubsystem {
    id: SubsystemId,
    motor: Box<dyn MotorPort>,
    output: f64,
}

impl RollerSubsystem {
    pub fn new(id: SubsystemId, mut motor: Box<dyn MotorPort>, config: &RollerConfig) -> Self {
        motor.configure(&MotorConfig {
            inverted: false,
            current_limit_amps: config.current_limit_amps,
            voltage_compensation: Some(config.voltage_compensation),
        });
        Self {
            id,
            motor,
            output: 0.0,
        }
    }

    /// Run the roller at `forward - reverse`, clamped to [-1, 1].
    pub fn run_roller(&mut self, forward: f64, reverse: f64) {
        let power = (forward - reverse).clamp(-1.0, 1.0);
        self.motor.set(power);
        self.output = power;
        debug!("roller: fwd={:.2} rev={:.2} -> {:.2}", forward, reverse, power);
    }

    pub fn stop(&mut self) {
        self.motor.stop();
        self.output = 0.0;
    }

    /// Last power written to the motor.
    pub fn output(&self) -> f64 {
        self.output
    }
}

impl Subsystem for RollerSubsystem {
    fn id(&self) -> SubsystemId {
        self.id
    }

    fn name(&self) -> &'static str {
        "roller"
    }
}
