//! Brushed DC motor driver (H-bridge with PWM + direction pin).
//!
//! Variable-speed forward/reverse control: the magnitude of the requested
//! power becomes the PWM duty cycle, the sign drives the direction pin
//! (high = forward).  Generic over the `embedded-hal` 1.0 traits so any
//! HAL's PWM channel and GPIO output can back it.
//!
//! ## Failure contract
//!
//! Motor writes are fire-and-forget.  A failed PWM or GPIO write is logged
//! and the last good state is kept; nothing propagates to the scheduler.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{MotorConfig, MotorPort};

/// Duty-cycle resolution used when converting power to a fraction.
const DUTY_STEPS: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

pub struct HBridgeMotor<P, D> {
    pwm: P,
    dir: D,
    inverted: bool,
    power: f64,
    direction: Direction,
}

impl<P: SetDutyCycle, D: OutputPin> HBridgeMotor<P, D> {
    pub fn new(pwm: P, dir: D) -> Self {
        Self {
            pwm,
            dir,
            inverted: false,
            power: 0.0,
            direction: Direction::Forward,
        }
    }

    /// Last commanded power, before inversion.
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Physical rotation direction last written to the bridge.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn set_direction_hw(&mut self, dir: Direction) -> bool {
        let state = PinState::from(dir == Direction::Forward);
        match self.dir.set_state(state) {
            Ok(()) => {
                self.direction = dir;
                true
            }
            Err(e) => {
                warn!("motor: direction write failed: {:?}", e);
                false
            }
        }
    }

    fn set_duty_hw(&mut self, magnitude: f64) -> bool {
        let steps = (magnitude * f64::from(DUTY_STEPS)).round() as u16;
        match self.pwm.set_duty_cycle_fraction(steps.min(DUTY_STEPS), DUTY_STEPS) {
            Ok(()) => true,
            Err(e) => {
                warn!("motor: PWM write failed: {:?}", e);
                false
            }
        }
    }
}

impl<P: SetDutyCycle, D: OutputPin> MotorPort for HBridgeMotor<P, D> {
    fn configure(&mut self, config: &MotorConfig) {
        // Current limiting and voltage compensation live in smart
        // controllers; a bare bridge only honours inversion.
        self.inverted = config.inverted;
    }

    fn set(&mut self, power: f64) {
        let power = if power.is_nan() { 0.0 } else { power.clamp(-1.0, 1.0) };
        let physical = if self.inverted { -power } else { power };
        let dir = if physical < 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        };

        if self.set_direction_hw(dir) && self.set_duty_hw(physical.abs()) {
            self.power = power;
        }
    }

    fn stop(&mut self) {
        if self.set_duty_hw(0.0) {
            self.power = 0.0;
        }
    }
}
