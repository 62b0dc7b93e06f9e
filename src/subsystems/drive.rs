//! Differential drive subsystem (left + right motor groups).
//!
//! Arcade requests (forward speed, counter-clockwise rotation) are mixed
//! into left/right wheel powers and forwarded to the motor ports.
//!
//! ## Motor safety
//!
//! The drive must keep receiving requests while it is enabled.  If no
//! `drive_arcade` call arrives for `safety_timeout_ticks` consecutive
//! robot ticks, `periodic` stops both sides.

use log::{debug, warn};

use super::{Subsystem, SubsystemId};
use crate::app::ports::{MotorConfig, MotorPort};
use crate::config::DriveConfig;

/// Last arcade request, before mixing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArcadeRequest {
    pub x_speed: f64,
    pub z_rotation: f64,
}

/// MotorTap powers produced by the arcade mixer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

/// Arcade inverse kinematics.
///
/// Inputs are clamped to [-1, 1] and optionally squared (sign kept).  The
/// resulting wheel speeds are desaturated so that full throttle plus full
/// turn never exceeds unit power on either side.
pub fn arcade_ik(x_speed: f64, z_rotation: f64, square_inputs: bool) -> WheelSpeeds {
    let mut x = x_speed.clamp(-1.0, 1.0);
    let mut z = z_rotation.clamp(-1.0, 1.0);

    if square_inputs {
        x = x.abs() * x;
        z = z.abs() * z;
    }

    let greater = x.abs().max(z.abs());
    let lesser = x.abs().min(z.abs());
    if greater == 0.0 {
        return WheelSpeeds::default();
    }
    let saturated = (greater + lesser) / greater;

    WheelSpeeds {
        left: (x - z) / saturated,
        right: (x + z) / saturated,
    }
}

pub struct DriveSubsystem {
    id: SubsystemId,
    left: Box<dyn MotorPort>,
    right: Box<dyn MotorPort>,
    square_inputs: bool,
    safety_timeout_ticks: u32,
    /// Robot ticks since the last drive request.
    idle_ticks: u32,
    stopped_by_safety: bool,
    last_request: ArcadeRequest,
    last_output: WheelSpeeds,
}

impl DriveSubsystem {
    pub fn new(
        id: SubsystemId,
        mut left: Box<dyn MotorPort>,
        mut right: Box<dyn MotorPort>,
        config: &DriveConfig,
    ) -> Self {
        let base = MotorConfig {
            inverted: false,
            current_limit_amps: config.current_limit_amps,
            voltage_compensation: Some(config.voltage_compensation),
        };
        left.configure(&base);
        right.configure(&MotorConfig {
            inverted: config.right_inverted,
            ..base
        });

        Self {
            id,
            left,
            right,
            square_inputs: config.square_inputs,
            safety_timeout_ticks: config.safety_timeout_ticks,
            idle_ticks: 0,
            stopped_by_safety: false,
            last_request: ArcadeRequest::default(),
            last_output: WheelSpeeds::default(),
        }
    }

    /// Drive with a forward speed and a counter-clockwise rotation rate.
    pub fn drive_arcade(&mut self, x_speed: f64, z_rotation: f64) {
        self.last_request = ArcadeRequest {
            x_speed,
            z_rotation,
        };
        let speeds = arcade_ik(x_speed, z_rotation, self.square_inputs);
        self.write(speeds);
        self.idle_ticks = 0;
        self.stopped_by_safety = false;
        debug!(
            "drive: x={:.2} z={:.2} -> L={:.2} R={:.2}",
            x_speed, z_rotation, speeds.left, speeds.right
        );
    }

    pub fn stop(&mut self) {
        self.last_request = ArcadeRequest::default();
        self.left.stop();
        self.right.stop();
        self.last_output = WheelSpeeds::default();
    }

    pub fn last_request(&self) -> ArcadeRequest {
        self.last_request
    }

    pub fn last_output(&self) -> WheelSpeeds {
        self.last_output
    }

    /// Whether the motor-safety timeout has stopped the drive.
    pub fn is_safety_stopped(&self) -> bool {
        self.stopped_by_safety
    }

    fn write(&mut self, speeds: WheelSpeeds) {
        self.left.set(speeds.left);
        self.right.set(speeds.right);
        self.last_output = speeds;
    }
}

impl Subsystem for DriveSubsystem {
    fn id(&self) -> SubsystemId {
        self.id
    }

    fn name(&self) -> &'static str {
        "drive"
    }

    fn periodic(&mut self) {
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks > self.safety_timeout_ticks && !self.stopped_by_safety {
            warn!("drive: no request for {} ticks, stopping motors", self.idle_ticks);
            self.stop();
            self.stopped_by_safety = true;
        }
    }
}
