//! Commands: finite-lifetime units of behaviour.
//!
//! ```text
//!            schedule                 is_finished()
//!   Idle ──▶ Initializing ──▶ Running ─────────────▶ Ending ──▶ Idle
//!                               │
//!                               │ displaced / canceled
//!                               ▼
//!                            Canceled ──▶ Idle
//! ```
//!
//! Every hook receives `&mut R`, the container that owns the subsystems.
//! `on_end` runs exactly once for every `on_start`, with
//! `interrupted == true` when the command was displaced or canceled.

pub mod auto;
pub mod drive;
pub mod roller;

use heapless::Vec;

use crate::error::{RegistrationError, Result};
use crate::subsystems::SubsystemId;

pub use auto::AutoCommand;
pub use drive::DriveCommand;
pub use roller::RollerCommand;

/// Most subsystems a single command may require.
pub const MAX_REQUIREMENTS: usize = 4;

const _: () = assert!(MAX_REQUIREMENTS >= 1, "requirement set must hold one subsystem");

/// Scheduler-issued handle to a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

impl CommandId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle state of a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Idle,
    /// `on_start` is executing.
    Initializing,
    Running,
    /// `on_end(false)` is executing after a natural finish.
    Ending,
    /// `on_end(true)` is executing after displacement or cancel.
    Canceled,
}

/// The set of subsystems a command needs exclusive use of.
///
/// Fixed at construction; duplicates are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements(Vec<SubsystemId, MAX_REQUIREMENTS>);

impl Requirements {
    /// No requirements: the command never conflicts with anything.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(id: SubsystemId) -> Self {
        // Capacity is checked at compile time, so this never falls back.
        Self(Vec::from_slice(&[id]).unwrap_or_default())
    }

    pub fn try_from_slice(ids: &[SubsystemId]) -> Result<Self> {
        let mut set: Vec<SubsystemId, MAX_REQUIREMENTS> = Vec::new();
        for &id in ids {
            if set.contains(&id) {
                continue;
            }
            set.push(id)
                .map_err(|_| RegistrationError::TooManyRequirements)?;
        }
        Ok(Self(set))
    }

    pub fn contains(&self, id: SubsystemId) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = SubsystemId> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Behaviour hooks driven by the [`Scheduler`](crate::scheduler::Scheduler).
///
/// The scheduler only ever talks to this trait; it never depends on a
/// concrete command type.
pub trait Command<R> {
    /// Label used in logs and [`SchedulerEvent`](crate::app::events::SchedulerEvent)s.
    fn name(&self) -> &'static str;

    /// Subsystems this command needs exclusive use of.  Must not change
    /// after construction.
    fn requirements(&self) -> &Requirements;

    /// One-time setup when the command is admitted.
    fn on_start(&mut self, _robot: &mut R) {}

    /// Runs once per scheduler tick while the command is running.
    fn on_tick(&mut self, _robot: &mut R) {}

    /// Cleanup.  Runs exactly once per `on_start`.
    fn on_end(&mut self, _robot: &mut R, _interrupted: bool) {}

    /// Polled after every `on_tick`.  Commands that run until canceled
    /// keep the default.
    fn is_finished(&self) -> bool {
        false
    }
}
