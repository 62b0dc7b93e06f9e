//! Triggers: edge detection over a boolean condition.
//!
//! A trigger is sampled once per scheduler tick.  Comparing the sample with
//! the previous one yields a rising edge, a falling edge, or nothing; each
//! binding maps one of those transitions to a schedule/cancel/toggle
//! action on a command.
//!
//! | Binding          | Rising edge      | Falling edge |
//! |------------------|------------------|--------------|
//! | `while_true`     | schedule         | cancel       |
//! | `while_false`    | cancel           | schedule     |
//! | `on_true`        | schedule         | -            |
//! | `on_false`       | -                | schedule     |
//! | `toggle_on_true` | toggle           | -            |
//! | `cancel_on_true` | cancel           | -            |
//!
//! The previous sample starts out `false`, so a condition that is already
//! true on the first tick counts as a rising edge.  [`Trigger::rearm`]
//! puts a trigger back in that state.

use heapless::Vec;

use crate::app::ports::BooleanSource;
use crate::command::CommandId;
use crate::error::{RegistrationError, Result};

/// Most bindings a single trigger may carry.
pub const MAX_BINDINGS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    WhileTrue,
    WhileFalse,
    OnTrue,
    OnFalse,
    ToggleOnTrue,
    CancelOnTrue,
}

/// Relation between a trigger transition and a command action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub kind: BindingKind,
    pub command: CommandId,
}

/// What the scheduler should do with a command this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    Schedule(CommandId),
    Cancel(CommandId),
    Toggle(CommandId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Rising,
    Falling,
}

pub struct Trigger {
    label: &'static str,
    condition: Box<dyn BooleanSource>,
    last: bool,
    bindings: Vec<Binding, MAX_BINDINGS>,
}

impl Trigger {
    pub fn new(label: &'static str, condition: impl BooleanSource + 'static) -> Self {
        Self {
            label,
            condition: Box::new(condition),
            last: false,
            bindings: Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Schedule on rising edge, cancel on falling edge.
    pub fn while_true(self, command: CommandId) -> Result<Self> {
        self.bind(BindingKind::WhileTrue, command)
    }

    /// Schedule on falling edge, cancel on rising edge.
    pub fn while_false(self, command: CommandId) -> Result<Self> {
        self.bind(BindingKind::WhileFalse, command)
    }

    /// Schedule once on rising edge.
    pub fn on_true(self, command: CommandId) -> Result<Self> {
        self.bind(BindingKind::OnTrue, command)
    }

    /// Schedule once on falling edge.
    pub fn on_false(self, command: CommandId) -> Result<Self> {
        self.bind(BindingKind::OnFalse, command)
    }

    /// On rising edge: cancel if running, otherwise schedule.
    pub fn toggle_on_true(self, command: CommandId) -> Result<Self> {
        self.bind(BindingKind::ToggleOnTrue, command)
    }

    /// Cancel on rising edge.
    pub fn cancel_on_true(self, command: CommandId) -> Result<Self> {
        self.bind(BindingKind::CancelOnTrue, command)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    fn bind(mut self, kind: BindingKind, command: CommandId) -> Result<Self> {
        self.bindings
            .push(Binding { kind, command })
            .map_err(|_| RegistrationError::TooManyBindings)?;
        Ok(self)
    }

    /// Forget the previous sample.  The next poll sees a held condition
    /// as a fresh rising edge and a released one as no edge at all.
    pub(crate) fn rearm(&mut self) {
        self.last = false;
    }

    /// Sample the condition and append the resulting actions to `out`, in
    /// binding order.
    pub(crate) fn poll(&mut self, out: &mut impl Extend<TriggerAction>) {
        let now = self.condition.get();
        let edge = match (self.last, now) {
            (false, true) => Some(Edge::Rising),
            (true, false) => Some(Edge::Falling),
            _ => None,
        };
        self.last = now;

        let Some(edge) = edge else {
            return;
        };

        out.extend(self.bindings.iter().filter_map(|b| action_for(b, edge)));
    }
}

fn action_for(binding: &Binding, edge: Edge) -> Option<TriggerAction> {
    let id = binding.command;
    match (binding.kind, edge) {
        (BindingKind::WhileTrue | BindingKind::OnTrue, Edge::Rising)
        | (BindingKind::WhileFalse | BindingKind::OnFalse, Edge::Falling) => {
            Some(TriggerAction::Schedule(id))
        }
        (BindingKind::WhileTrue, Edge::Falling)
        | (BindingKind::WhileFalse | BindingKind::CancelOnTrue, Edge::Rising) => {
            Some(TriggerAction::Cancel(id))
        }
        (BindingKind::ToggleOnTrue, Edge::Rising) => Some(TriggerAction::Toggle(id)),
        _ => None,
    }
}
