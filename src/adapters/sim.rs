//! Simulated motor controller for host runs.
//!
//! Behaves like a smart controller: applies inversion, clamps power and
//! remembers its settings.  Clones share state, so the wiring code can
//! keep one clone as a read handle after boxing the other into a
//! subsystem.

use core::cell::Cell;
use std::rc::Rc;

use log::debug;

use crate::app::ports::{MotorConfig, MotorPort};

#[derive(Debug, Clone)]
pub struct SimMotor {
    name: &'static str,
    output: Rc<Cell<f64>>,
    config: Rc<Cell<Option<MotorConfig>>>,
}

impl SimMotor {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            output: Rc::new(Cell::new(0.0)),
            config: Rc::new(Cell::new(None)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Power at the motor terminals, after inversion.
    pub fn output(&self) -> f64 {
        self.output.get()
    }

    /// Settings applied by the owning subsystem, if any.
    pub fn config(&self) -> Option<MotorConfig> {
        self.config.get()
    }
}

impl MotorPort for SimMotor {
    fn configure(&mut self, config: &MotorConfig) {
        debug!("sim[{}]: configured {:?}", self.name, config);
        self.config.set(Some(*config));
    }

    fn set(&mut self, power: f64) {
        let power = if power.is_nan() { 0.0 } else { power.clamp(-1.0, 1.0) };
        let inverted = self.config.get().is_some_and(|c| c.inverted);
        self.output.set(if inverted { -power } else { power });
    }
}
