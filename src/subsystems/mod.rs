//! Subsystems: exclusive owners of one physical resource each.
//!
//! A subsystem exposes mutators (set drive power, set roller speed) and
//! holds the last setpoints it wrote.  It does not police who calls those
//! mutators: the [`Scheduler`](crate::scheduler::Scheduler) guarantees that
//! only the command currently holding the claim is ticked.

pub mod drive;
pub mod roller;

use crate::command::CommandId;
use crate::error::Result;
use crate::scheduler::Scheduler;

/// Scheduler-issued identity of a registered subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubsystemId(u8);

impl SubsystemId {
    pub(crate) const fn new(index: u8) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Common contract for every subsystem.
pub trait Subsystem {
    /// Identity issued by [`Scheduler::register_subsystem`].
    fn id(&self) -> SubsystemId;

    fn name(&self) -> &'static str;

    /// Housekeeping run once per robot tick, before the scheduler pass.
    fn periodic(&mut self) {}

    /// Register `command` as this subsystem's fallback behaviour.
    ///
    /// The scheduler owns the mapping; this is a convenience that keeps
    /// the wiring code reading subsystem-first.
    fn set_default_command<R>(
        &self,
        scheduler: &mut Scheduler<R>,
        command: CommandId,
    ) -> Result<()>
    where
        Self: Sized,
    {
        scheduler.set_default_command(self.id(), command)
    }
}
