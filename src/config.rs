//! Robot configuration parameters
//!
//! All tunable parameters for the KitBot control core.
//! Defaults match the stock kit robot; a JSON file can override them.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::selector::MAX_NAME_LEN;

/// Core robot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Scheduler tick period (milliseconds)
    pub tick_period_ms: u32,
    pub operator: OperatorConfig,
    pub drive: DriveConfig,
    pub roller: RollerConfig,
    pub auto: AutoConfig,
}

/// Driver station ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    pub driver_port: u8,
    pub operator_port: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Forward scale while the right bumper is released
    pub slow_scale: f64,
    /// Forward scale while the right bumper is held
    pub fast_scale: f64,
    /// Square arcade inputs (sign-preserving) for finer low-speed control
    pub square_inputs: bool,
    /// Smart current limit per drive motor (amps)
    pub current_limit_amps: u8,
    /// Nominal voltage for voltage compensation
    pub voltage_compensation: f64,
    /// Invert the right side so positive power drives forward
    pub right_inverted: bool,
    /// Ticks without a drive request before the motors are stopped
    pub safety_timeout_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollerConfig {
    /// Fixed roller power used by the eject binding
    pub eject_value: f64,
    pub current_limit_amps: u8,
    pub voltage_compensation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoConfig {
    /// Option name shown on the dashboard for the stock routine
    pub default_option: String,
    /// Forward power while the routine drives
    pub drive_speed: f64,
    /// Number of ticks the routine drives before finishing
    pub drive_ticks: u32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 20, // 50 Hz
            operator: OperatorConfig::default(),
            drive: DriveConfig::default(),
            roller: RollerConfig::default(),
            auto: AutoConfig::default(),
        }
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            driver_port: 0,
            operator_port: 1,
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            slow_scale: 0.5,
            fast_scale: 1.0,
            square_inputs: true,
            current_limit_amps: 60,
            voltage_compensation: 12.0,
            right_inverted: true,
            safety_timeout_ticks: 5, // 100 ms at 50 Hz
        }
    }
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            eject_value: 0.44,
            current_limit_amps: 60,
            voltage_compensation: 10.0,
        }
    }
}

impl Default for AutoConfig {
    fn default() -> Self {
        Self {
            default_option: String::from("Autonomous"),
            drive_speed: 0.5,
            drive_ticks: 50, // 1 s at 50 Hz
        }
    }
}

impl RobotConfig {
    /// Parse and validate a JSON document.  Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            warn!("config parse failed: {e}");
            Error::Config("malformed JSON")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the robot misbehave.
    /// Invalid ranges are errors, never silently clamped.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be non-zero"));
        }
        if self.operator.driver_port == self.operator.operator_port {
            return Err(Error::Config("driver and operator ports must differ"));
        }
        if !within(self.drive.slow_scale, 0.0, 1.0) || !within(self.drive.fast_scale, 0.0, 1.0) {
            return Err(Error::Config("drive scales must be within [0, 1]"));
        }
        if !positive(self.drive.voltage_compensation) || !positive(self.roller.voltage_compensation)
        {
            return Err(Error::Config("voltage compensation must be positive"));
        }
        if self.drive.safety_timeout_ticks == 0 {
            return Err(Error::Config("safety_timeout_ticks must be non-zero"));
        }
        if !within(self.roller.eject_value, -1.0, 1.0) {
            return Err(Error::Config("eject_value must be within [-1, 1]"));
        }
        if !within(self.auto.drive_speed, -1.0, 1.0) {
            return Err(Error::Config("auto drive_speed must be within [-1, 1]"));
        }
        if self.auto.default_option.is_empty() {
            return Err(Error::Config("auto default_option must be named"));
        }
        if self.auto.default_option.len() > MAX_NAME_LEN {
            return Err(Error::Config("auto default_option name too long"));
        }
        Ok(())
    }

    /// Tick period in seconds.
    pub fn tick_period_secs(&self) -> f64 {
        f64::from(self.tick_period_ms) / 1000.0
    }
}

// NaN and infinities fail both checks.
fn within(value: f64, lo: f64, hi: f64) -> bool {
    value.is_finite() && (lo..=hi).contains(&value)
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
