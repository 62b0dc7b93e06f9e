//! Operator input: gamepad handle and axis/button adapters.
//!
//! The I/O polling loop samples the physical controller once per tick and
//! writes the snapshot into a [`Gamepad`] with [`Gamepad::update`].  Every
//! adapter created from that gamepad shares the same snapshot, so all
//! commands and triggers see identical values within one tick.
//!
//! Adapters compose:
//!
//! ```text
//!  Gamepad ──▶ AxisReading ──▶ Inverted ──▶ ScaledWhile ──▶ DriveCommand
//!          └─▶ ButtonReading ───────────────────┘
//! ```

use core::cell::Cell;
use std::rc::Rc;

use crate::app::ports::{AxisSource, BooleanSource};

// ---------------------------------------------------------------------------
// Raw controller layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    /// Analog trigger, 0.0 (released) to 1.0 (fully pressed).
    LeftTrigger,
    RightTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Button {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    LeftBumper = 4,
    RightBumper = 5,
    Back = 6,
    Start = 7,
    LeftStick = 8,
    RightStick = 9,
}

impl Button {
    const fn mask(self) -> u16 {
        1 << self as u8
    }
}

/// One sampled controller frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadState {
    pub left_x: f64,
    pub left_y: f64,
    pub right_x: f64,
    pub right_y: f64,
    pub left_trigger: f64,
    pub right_trigger: f64,
    /// Pressed buttons, one bit per [`Button`].
    pub buttons: u16,
}

impl GamepadState {
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::LeftX => self.left_x,
            Axis::LeftY => self.left_y,
            Axis::RightX => self.right_x,
            Axis::RightY => self.right_y,
            Axis::LeftTrigger => self.left_trigger,
            Axis::RightTrigger => self.right_trigger,
        }
    }

    pub fn button(&self, button: Button) -> bool {
        self.buttons & button.mask() != 0
    }

    #[must_use]
    pub fn with_axis(mut self, axis: Axis, value: f64) -> Self {
        let slot = match axis {
            Axis::LeftX => &mut self.left_x,
            Axis::LeftY => &mut self.left_y,
            Axis::RightX => &mut self.right_x,
            Axis::RightY => &mut self.right_y,
            Axis::LeftTrigger => &mut self.left_trigger,
            Axis::RightTrigger => &mut self.right_trigger,
        };
        *slot = value;
        self
    }

    #[must_use]
    pub fn with_button(mut self, button: Button, pressed: bool) -> Self {
        if pressed {
            self.buttons |= button.mask();
        } else {
            self.buttons &= !button.mask();
        }
        self
    }

    /// Clamp every axis into its legal range.  NaN reads as centred.
    fn sanitised(mut self) -> Self {
        let stick = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        let trigger = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        self.left_x = stick(self.left_x);
        self.left_y = stick(self.left_y);
        self.right_x = stick(self.right_x);
        self.right_y = stick(self.right_y);
        self.left_trigger = trigger(self.left_trigger);
        self.right_trigger = trigger(self.right_trigger);
        self
    }
}

// ---------------------------------------------------------------------------
// Gamepad handle
// ---------------------------------------------------------------------------

/// Shared handle onto the latest controller frame for one driver station port.
///
/// Cloning is cheap; all clones observe the same frame.
#[derive(Debug, Clone)]
pub struct Gamepad {
    port: u8,
    state: Rc<Cell<GamepadState>>,
}

impl Gamepad {
    pub fn new(port: u8) -> Self {
        Self {
            port,
            state: Rc::new(Cell::new(GamepadState::default())),
        }
    }

    pub fn port(&self) -> u8 {
        self.port
    }

    /// Store a freshly polled frame.  Called once per tick by the polling loop.
    pub fn update(&self, state: GamepadState) {
        self.state.set(state.sanitised());
    }

    pub fn state(&self) -> GamepadState {
        self.state.get()
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        self.state.get().axis(axis)
    }

    pub fn button(&self, button: Button) -> bool {
        self.state.get().button(button)
    }

    /// Live reading of one axis.
    pub fn axis_source(&self, axis: Axis) -> AxisReading {
        AxisReading {
            pad: self.clone(),
            axis,
        }
    }

    /// Live reading of one button.
    pub fn button_source(&self, button: Button) -> ButtonReading {
        ButtonReading {
            pad: self.clone(),
            button,
        }
    }
}

// ---------------------------------------------------------------------------
// Adapters
// ---------------------------------------------------------------------------

pub struct AxisReading {
    pad: Gamepad,
    axis: Axis,
}

impl AxisSource for AxisReading {
    fn value(&self) -> f64 {
        self.pad.axis(self.axis)
    }
}

pub struct ButtonReading {
    pad: Gamepad,
    button: Button,
}

impl BooleanSource for ButtonReading {
    fn get(&self) -> bool {
        self.pad.button(self.button)
    }
}

/// Sign inversion.  Pushing a stick away from the driver reads negative,
/// which this turns into positive "forward".
pub struct Inverted<A>(pub A);

impl<A: AxisSource> AxisSource for Inverted<A> {
    fn value(&self) -> f64 {
        -self.0.value()
    }
}

/// Scales a source by `active_scale` while `modifier` is true and by
/// `idle_scale` otherwise.
pub struct ScaledWhile<A, B> {
    source: A,
    modifier: B,
    active_scale: f64,
    idle_scale: f64,
}

impl<A: AxisSource, B: BooleanSource> ScaledWhile<A, B> {
    pub fn new(source: A, modifier: B, active_scale: f64, idle_scale: f64) -> Self {
        Self {
            source,
            modifier,
            active_scale,
            idle_scale,
        }
    }
}

impl<A: AxisSource, B: BooleanSource> AxisSource for ScaledWhile<A, B> {
    fn value(&self) -> f64 {
        let scale = if self.modifier.get() {
            self.active_scale
        } else {
            self.idle_scale
        };
        self.source.value() * scale
    }
}

/// A shared virtual button (dashboard toggle, test script, autonomous logic).
#[derive(Debug, Clone, Default)]
pub struct Flag(Rc<Cell<bool>>);

impl Flag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: bool) {
        self.0.set(value);
    }
}

impl BooleanSource for Flag {
    fn get(&self) -> bool {
        self.0.get()
    }
}
