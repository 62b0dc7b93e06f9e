//! Cooperative command scheduler.
//!
//! One call to [`Scheduler::run`] is one tick.  Everything happens in a
//! single linear pass, synchronously, on the caller's thread:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. Requests        schedule()/cancel() queued since last tick │
//! │    Triggers        sampled in registration order              │
//! │                          │                                    │
//! │                          ▼                                    │
//! │ 2-3. Admission     displaced claimants: on_end(true)          │
//! │                    then newcomer: on_start, claims recorded   │
//! │                          │                                    │
//! │                          ▼                                    │
//! │ 4. Defaults        unclaimed subsystems admit their default   │
//! │                          │                                    │
//! │                          ▼                                    │
//! │ 5. Execute         on_tick + is_finished for every running    │
//! │                    command; finished ones get on_end(false)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Actions within one tick are applied in order: queued requests first,
//! then triggers in registration order, bindings in registration order.
//! A newly admitted command always displaces the current claimant, so
//! when two actions compete for a subsystem in the same tick the one
//! applied last wins.

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::app::events::SchedulerEvent;
use crate::app::ports::EventSink;
use crate::command::{Command, CommandId, CommandState};
use crate::error::{RegistrationError, Result};
use crate::subsystems::SubsystemId;
use crate::trigger::{Trigger, TriggerAction};

/// Maximum number of subsystems (stack-allocated table).
pub const MAX_SUBSYSTEMS: usize = 8;

/// Internal bookkeeping for a registered command.
struct CommandSlot<R> {
    command: Box<dyn Command<R>>,
    state: CommandState,
}

/// Internal bookkeeping for a registered subsystem.
#[derive(Debug, Clone)]
struct SubsystemSlot {
    name: &'static str,
    claimant: Option<CommandId>,
    default: Option<CommandId>,
}

/// The scheduler engine.
///
/// `R` is the container handed to every command hook; it owns the
/// subsystems.  The scheduler never touches `R` itself, it only passes it
/// through, so exclusivity is purely a matter of which commands it ticks.
pub struct Scheduler<R> {
    commands: Vec<CommandSlot<R>>,
    subsystems: heapless::Vec<SubsystemSlot, MAX_SUBSYSTEMS>,
    triggers: Vec<Trigger>,
    /// Running commands in admission order.
    running: Vec<CommandId>,
    /// Requests issued between ticks, applied at the start of the next one.
    requests: VecDeque<TriggerAction>,
    /// Per-tick action buffer, kept to avoid reallocating every tick.
    actions: Vec<TriggerAction>,
    tick_count: u64,
}

impl<R> Default for Scheduler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Scheduler<R> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            subsystems: heapless::Vec::new(),
            triggers: Vec::new(),
            running: Vec::new(),
            requests: VecDeque::new(),
            actions: Vec::new(),
            tick_count: 0,
        }
    }

    // ── Registration ──────────────────────────────────────────

    /// Register a subsystem and obtain its identity.
    pub fn register_subsystem(&mut self, name: &'static str) -> Result<SubsystemId> {
        if self.subsystems.iter().any(|s| s.name == name) {
            return Err(RegistrationError::DuplicateSubsystem.into());
        }
        let index = self.subsystems.len();
        self.subsystems
            .push(SubsystemSlot {
                name,
                claimant: None,
                default: None,
            })
            .map_err(|_| RegistrationError::TooManySubsystems)?;
        info!("Scheduler: subsystem '{}' registered at slot {}", name, index);
        Ok(SubsystemId::new(index as u8))
    }

    /// Hand a command to the scheduler.  Its requirements must name
    /// subsystems registered with this scheduler.
    pub fn register_command(&mut self, command: impl Command<R> + 'static) -> Result<CommandId> {
        if command
            .requirements()
            .iter()
            .any(|sub| sub.index() >= self.subsystems.len())
        {
            return Err(RegistrationError::UnknownSubsystem.into());
        }
        let id = CommandId::new(self.commands.len());
        debug!("Scheduler: command '{}' registered as {:?}", command.name(), id);
        self.commands.push(CommandSlot {
            command: Box::new(command),
            state: CommandState::Idle,
        });
        Ok(id)
    }

    /// Make `command` the fallback for `subsystem`.  Replaces (and, if it
    /// is running, cancels on the next tick) any previous default.
    pub fn set_default_command(&mut self, subsystem: SubsystemId, command: CommandId) -> Result<()> {
        self.check_command(command)?;
        let slot = self
            .subsystems
            .get(subsystem.index())
            .ok_or(RegistrationError::UnknownSubsystem)?;
        if !self.commands[command.index()]
            .command
            .requirements()
            .contains(subsystem)
        {
            return Err(RegistrationError::DefaultMissingRequirement.into());
        }

        let previous = slot.default;
        if let Some(old) = previous.filter(|&old| old != command) {
            if self.is_scheduled(old) {
                self.requests.push_back(TriggerAction::Cancel(old));
            }
        }
        self.subsystems[subsystem.index()].default = Some(command);
        info!(
            "Scheduler: '{}' is the default for '{}'",
            self.commands[command.index()].command.name(),
            self.subsystems[subsystem.index()].name
        );
        Ok(())
    }

    /// Register a trigger.  Its bindings are fixed from here on.
    pub fn add_trigger(&mut self, trigger: Trigger) -> Result<()> {
        for binding in trigger.bindings() {
            self.check_command(binding.command)?;
        }
        info!(
            "Scheduler: trigger '{}' added with {} binding(s)",
            trigger.label(),
            trigger.bindings().len()
        );
        self.triggers.push(trigger);
        Ok(())
    }

    // ── Requests ──────────────────────────────────────────────

    /// Ask for `command` to be admitted at the start of the next tick.
    pub fn schedule(&mut self, command: CommandId) -> Result<()> {
        self.check_command(command)?;
        self.requests.push_back(TriggerAction::Schedule(command));
        Ok(())
    }

    /// Ask for `command` to be interrupted at the start of the next tick.
    pub fn cancel(&mut self, command: CommandId) -> Result<()> {
        self.check_command(command)?;
        self.requests.push_back(TriggerAction::Cancel(command));
        Ok(())
    }

    /// Interrupt every running command immediately and drop queued
    /// requests.  Used when the robot is disabled.
    ///
    /// Triggers are rearmed as well: the next `run` treats any condition
    /// that is true as a rising edge, so a button held across a disable
    /// schedules its command again.
    pub fn cancel_all(&mut self, robot: &mut R, sink: &mut impl EventSink) {
        self.requests.clear();
        while let Some(&id) = self.running.first() {
            self.interrupt(id, None, robot, sink);
        }
        for trigger in &mut self.triggers {
            trigger.rearm();
        }
    }

    // ── Tick ──────────────────────────────────────────────────

    /// Run one scheduling pass.  Call once per control loop tick.
    pub fn run(&mut self, robot: &mut R, sink: &mut impl EventSink) {
        self.tick_count += 1;

        // 1. Queued requests, then trigger edges.
        let mut actions = core::mem::take(&mut self.actions);
        actions.clear();
        actions.extend(self.requests.drain(..));
        for trigger in &mut self.triggers {
            trigger.poll(&mut actions);
        }

        // 2-3. Displacement and admission, in order.
        for action in actions.drain(..) {
            match action {
                TriggerAction::Schedule(id) => self.admit(id, robot, sink),
                TriggerAction::Cancel(id) => self.interrupt(id, None, robot, sink),
                TriggerAction::Toggle(id) => {
                    if self.is_scheduled(id) {
                        self.interrupt(id, None, robot, sink);
                    } else {
                        self.admit(id, robot, sink);
                    }
                }
            }
        }
        self.actions = actions;

        // 4. Default fallback for every unclaimed subsystem.
        for index in 0..self.subsystems.len() {
            let slot = &self.subsystems[index];
            if slot.claimant.is_some() {
                continue;
            }
            let Some(default) = slot.default else {
                continue;
            };
            if !self.is_scheduled(default) {
                debug!("Scheduler: '{}' unclaimed, admitting default", slot.name);
                self.admit(default, robot, sink);
            }
        }

        // 5. Execute.
        let mut i = 0;
        while i < self.running.len() {
            let id = self.running[i];
            let slot = &mut self.commands[id.index()];
            slot.command.on_tick(robot);
            if slot.command.is_finished() {
                self.finish(id, robot, sink);
            } else {
                i += 1;
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self, command: CommandId) -> Option<CommandState> {
        self.commands.get(command.index()).map(|slot| slot.state)
    }

    pub fn is_scheduled(&self, command: CommandId) -> bool {
        self.state(command) == Some(CommandState::Running)
    }

    /// The command currently holding `subsystem`, if any.
    pub fn claimant(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.subsystems
            .get(subsystem.index())
            .and_then(|slot| slot.claimant)
    }

    pub fn default_command(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.subsystems
            .get(subsystem.index())
            .and_then(|slot| slot.default)
    }

    /// Running commands in admission order.
    pub fn running(&self) -> &[CommandId] {
        &self.running
    }

    pub fn command_name(&self, command: CommandId) -> Option<&'static str> {
        self.commands
            .get(command.index())
            .map(|slot| slot.command.name())
    }

    pub fn subsystem_name(&self, subsystem: SubsystemId) -> Option<&'static str> {
        self.subsystems.get(subsystem.index()).map(|slot| slot.name)
    }

    /// Every registered subsystem, in registration order.
    pub fn subsystem_ids(&self) -> impl Iterator<Item = SubsystemId> + '_ {
        (0..self.subsystems.len()).map(|i| SubsystemId::new(i as u8))
    }

    /// Ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn check_command(&self, command: CommandId) -> Result<()> {
        if command.index() < self.commands.len() {
            Ok(())
        } else {
            Err(RegistrationError::UnknownCommand.into())
        }
    }

    /// Displace every conflicting claimant, then start `id`.
    fn admit(&mut self, id: CommandId, robot: &mut R, sink: &mut impl EventSink) {
        if self.is_scheduled(id) {
            debug!(
                "Scheduler: '{}' already running",
                self.commands[id.index()].command.name()
            );
            return;
        }

        let name = self.commands[id.index()].command.name();
        let requirements = self.commands[id.index()].command.requirements().clone();

        for sub in requirements.iter() {
            if let Some(holder) = self.subsystems[sub.index()].claimant {
                if holder != id {
                    self.interrupt(holder, Some(name), robot, sink);
                }
            }
        }

        let slot = &mut self.commands[id.index()];
        slot.state = CommandState::Initializing;
        slot.command.on_start(robot);
        slot.state = CommandState::Running;

        for sub in requirements.iter() {
            self.subsystems[sub.index()].claimant = Some(id);
        }
        self.running.push(id);

        info!("Scheduler: '{}' scheduled", name);
        sink.emit(&SchedulerEvent::Scheduled { command: name });
    }

    /// End a running command early with `on_end(true)`.
    fn interrupt(
        &mut self,
        id: CommandId,
        by: Option<&'static str>,
        robot: &mut R,
        sink: &mut impl EventSink,
    ) {
        if !self.is_scheduled(id) {
            return;
        }
        let slot = &mut self.commands[id.index()];
        let name = slot.command.name();
        slot.state = CommandState::Canceled;
        slot.command.on_end(robot, true);
        slot.state = CommandState::Idle;
        self.release(id);

        match by {
            Some(by) => info!("Scheduler: '{}' interrupted by '{}'", name, by),
            None => info!("Scheduler: '{}' canceled", name),
        }
        sink.emit(&SchedulerEvent::Interrupted { command: name, by });
    }

    /// End a command that reported `is_finished`.
    fn finish(&mut self, id: CommandId, robot: &mut R, sink: &mut impl EventSink) {
        let slot = &mut self.commands[id.index()];
        let name = slot.command.name();
        slot.state = CommandState::Ending;
        slot.command.on_end(robot, false);
        slot.state = CommandState::Idle;
        self.release(id);

        info!("Scheduler: '{}' finished", name);
        sink.emit(&SchedulerEvent::Finished { command: name });
    }

    fn release(&mut self, id: CommandId) {
        for slot in &mut self.subsystems {
            if slot.claimant == Some(id) {
                slot.claimant = None;
            }
        }
        if let Some(pos) = self.running.iter().position(|&r| r == id) {
            self.running.remove(pos);
        } else {
            warn!("Scheduler: released {:?} which was not running", id);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
