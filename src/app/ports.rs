//! Port traits: the boundary between the command core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Scheduler / Commands / Subsystems
//! ```
//!
//! Input adapters (gamepad axes, buttons, virtual flags), motor drivers,
//! event sinks and the dashboard chooser implement these traits.  The core
//! consumes them through generics or boxed trait objects injected at
//! construction, so nothing in the scheduler touches hardware directly.

use crate::app::events::SchedulerEvent;

// ───────────────────────────────────────────────────────────────
// Input ports (driven adapter: operator input → core)
// ───────────────────────────────────────────────────────────────

/// Produces a continuous value on demand, typically in [-1.0, 1.0].
///
/// Commands hold these as constructor-injected dependencies and read them
/// once per tick.
pub trait AxisSource {
    fn value(&self) -> f64;
}

/// Produces a boolean on demand.  Triggers sample one of these per tick.
pub trait BooleanSource {
    fn get(&self) -> bool;
}

/// A fixed value is the simplest axis source.
impl AxisSource for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

impl BooleanSource for bool {
    fn get(&self) -> bool {
        *self
    }
}

impl<A: AxisSource + ?Sized> AxisSource for Box<A> {
    fn value(&self) -> f64 {
        (**self).value()
    }
}

impl<B: BooleanSource + ?Sized> BooleanSource for Box<B> {
    fn get(&self) -> bool {
        (**self).get()
    }
}

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: core → hardware)
// ───────────────────────────────────────────────────────────────

/// One-shot motor controller settings applied when a subsystem is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorConfig {
    pub inverted: bool,
    /// Smart current limit (amps).
    pub current_limit_amps: u8,
    /// Nominal voltage for voltage compensation, if enabled.
    pub voltage_compensation: Option<f64>,
}

/// Write-side port: subsystems forward setpoints through this.
///
/// Fire-and-forget: implementations log hardware failures instead of
/// returning them.
pub trait MotorPort {
    /// Apply controller settings.  Called once at subsystem construction.
    fn configure(&mut self, _config: &MotorConfig) {}

    /// Set output power in [-1.0, 1.0].
    fn set(&mut self, power: f64);

    /// Stop the motor.
    fn stop(&mut self) {
        self.set(0.0);
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (core → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The scheduler emits structured [`SchedulerEvent`]s through this port.
/// Adapters decide where they go (log, dashboard, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &SchedulerEvent);
}

// ───────────────────────────────────────────────────────────────
// Selection port (core ↔ dashboard chooser)
// ───────────────────────────────────────────────────────────────

/// The operator-facing chooser used to pick the autonomous routine.
pub trait SelectionPort {
    /// Present the available option names and the default.
    fn publish(&mut self, options: &[&str], default: &str);

    /// Name of the option the operator currently has selected, if any.
    fn selected(&self) -> Option<&str>;
}
