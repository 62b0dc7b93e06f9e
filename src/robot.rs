//! Robot container: subsystems, bindings and mode transitions.
//!
//! ```text
//!          set_mode(Autonomous)            set_mode(Teleop)
//!  Disabled ───────────────────▶ Autonomous ───────────────▶ Teleop
//!     ▲   resolve selector once,            cancel auto command   │
//!     │   schedule the result                                     │
//!     └───────────────── set_mode(Disabled): cancel all ◀─────────┘
//! ```
//!
//! Operator bindings (driver gamepad):
//!
//! | Input                  | Behaviour                                   |
//! |------------------------|---------------------------------------------|
//! | left stick Y (inverted)| forward speed, scaled by the right bumper   |
//! | right stick X (inv.)   | rotation, counter-clockwise positive        |
//! | right / left trigger   | roller forward / reverse (default command)  |
//! | A held                 | roller eject at a fixed power               |

use log::{debug, info};

use crate::app::events::SchedulerEvent;
use crate::app::ports::{EventSink, MotorPort, SelectionPort};
use crate::command::{AutoCommand, Command, CommandId, DriveCommand, RollerCommand};
use crate::config::RobotConfig;
use crate::error::Result;
use crate::input::{Axis, Button, Gamepad, Inverted, ScaledWhile};
use crate::scheduler::Scheduler;
use crate::selector::ModeSelector;
use crate::subsystems::Subsystem;
use crate::subsystems::drive::DriveSubsystem;
use crate::subsystems::roller::RollerSubsystem;
use crate::trigger::Trigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotMode {
    Disabled,
    Autonomous,
    Teleop,
}

/// Everything the commands act on.  Handed to every command hook.
pub struct Subsystems {
    pub drive: DriveSubsystem,
    pub roller: RollerSubsystem,
}

impl Subsystems {
    /// Per-tick housekeeping, run before the scheduler pass.
    pub fn periodic(&mut self) {
        self.drive.periodic();
        self.roller.periodic();
    }

    pub fn stop_all(&mut self) {
        self.drive.stop();
        self.roller.stop();
    }
}

impl AsMut<DriveSubsystem> for Subsystems {
    fn as_mut(&mut self) -> &mut DriveSubsystem {
        &mut self.drive
    }
}

impl AsMut<RollerSubsystem> for Subsystems {
    fn as_mut(&mut self) -> &mut RollerSubsystem {
        &mut self.roller
    }
}

/// Motor controllers the robot is built from.
pub struct HardwarePorts {
    pub left_drive: Box<dyn MotorPort>,
    pub right_drive: Box<dyn MotorPort>,
    pub roller: Box<dyn MotorPort>,
}

pub struct Robot {
    scheduler: Scheduler<Subsystems>,
    subsystems: Subsystems,
    selector: ModeSelector<CommandId>,
    driver: Gamepad,
    operator: Gamepad,
    mode: RobotMode,
    /// Command resolved on the last entry into autonomous.
    auto_command: Option<CommandId>,
}

impl Robot {
    /// Build the subsystems, register the stock commands and wire the
    /// driver bindings.  The robot starts disabled.
    pub fn new(config: &RobotConfig, hw: HardwarePorts) -> Result<Self> {
        config.validate()?;

        let mut scheduler: Scheduler<Subsystems> = Scheduler::new();
        let drive_id = scheduler.register_subsystem("drive")?;
        let roller_id = scheduler.register_subsystem("roller")?;
        let subsystems = Subsystems {
            drive: DriveSubsystem::new(drive_id, hw.left_drive, hw.right_drive, &config.drive),
            roller: RollerSubsystem::new(roller_id, hw.roller, &config.roller),
        };

        let driver = Gamepad::new(config.operator.driver_port);
        let operator = Gamepad::new(config.operator.operator_port);

        let eject = scheduler.register_command(
            RollerCommand::new(config.roller.eject_value, 0.0, &subsystems.roller)
                .named("RollerEject"),
        )?;
        scheduler.add_trigger(
            Trigger::new("driver.a", driver.button_source(Button::A)).while_true(eject)?,
        )?;

        let forward = ScaledWhile::new(
            Inverted(driver.axis_source(Axis::LeftY)),
            driver.button_source(Button::RightBumper),
            config.drive.fast_scale,
            config.drive.slow_scale,
        );
        let rotation = Inverted(driver.axis_source(Axis::RightX));
        let drive_default =
            scheduler.register_command(DriveCommand::new(forward, rotation, &subsystems.drive))?;
        subsystems
            .drive
            .set_default_command(&mut scheduler, drive_default)?;

        let roller_default = scheduler.register_command(RollerCommand::new(
            driver.axis_source(Axis::RightTrigger),
            driver.axis_source(Axis::LeftTrigger),
            &subsystems.roller,
        ))?;
        subsystems
            .roller
            .set_default_command(&mut scheduler, roller_default)?;

        let auto = scheduler.register_command(AutoCommand::new(&subsystems.drive, &config.auto))?;
        let mut selector = ModeSelector::new();
        selector.set_default_option(&config.auto.default_option, auto)?;

        info!(
            "Robot: ready (driver port {}, operator port {})",
            driver.port(),
            operator.port()
        );

        Ok(Self {
            scheduler,
            subsystems,
            selector,
            driver,
            operator,
            mode: RobotMode::Disabled,
            auto_command: None,
        })
    }

    /// Offer another autonomous routine on the dashboard chooser.
    pub fn add_auto_option(
        &mut self,
        name: &str,
        command: impl Command<Subsystems> + 'static,
    ) -> Result<CommandId> {
        let id = self.scheduler.register_command(command)?;
        self.selector.register_option(name, id)?;
        Ok(id)
    }

    pub fn publish_auto_options(&self, ui: &mut impl SelectionPort) -> Result<()> {
        self.selector.publish(ui)
    }

    /// Switch operating mode.  Re-entering the current mode does nothing.
    pub fn set_mode(
        &mut self,
        mode: RobotMode,
        ui: &impl SelectionPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if mode == self.mode {
            return Ok(());
        }
        let from = self.mode;
        self.mode = mode;
        info!("Robot: {:?} -> {:?}", from, mode);
        sink.emit(&SchedulerEvent::ModeChanged { from, to: mode });

        match mode {
            RobotMode::Disabled => {
                self.scheduler.cancel_all(&mut self.subsystems, sink);
                self.subsystems.stop_all();
            }
            RobotMode::Autonomous => self.begin_autonomous(ui, sink)?,
            RobotMode::Teleop => {
                if let Some(id) = self.auto_command.take() {
                    self.scheduler.cancel(id)?;
                }
            }
        }
        Ok(())
    }

    /// One control-loop iteration.  The scheduler does not run while
    /// disabled; triggers were rearmed on the way in, so inputs still held
    /// on re-enable act as fresh presses.
    pub fn tick(&mut self, sink: &mut impl EventSink) {
        self.subsystems.periodic();
        if self.mode != RobotMode::Disabled {
            self.scheduler.run(&mut self.subsystems, sink);
        }
    }

    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    pub fn driver(&self) -> &Gamepad {
        &self.driver
    }

    pub fn operator(&self) -> &Gamepad {
        &self.operator
    }

    pub fn scheduler(&self) -> &Scheduler<Subsystems> {
        &self.scheduler
    }

    pub fn subsystems(&self) -> &Subsystems {
        &self.subsystems
    }

    pub fn selector(&self) -> &ModeSelector<CommandId> {
        &self.selector
    }

    /// The autonomous command chosen on the last entry into autonomous.
    pub fn autonomous_command(&self) -> Option<CommandId> {
        self.auto_command
    }

    fn begin_autonomous(
        &mut self,
        ui: &impl SelectionPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if let Some(id) = self.auto_command.filter(|&id| self.scheduler.is_scheduled(id)) {
            debug!("Robot: autonomous command {:?} still running, not re-selecting", id);
            return Ok(());
        }
        let id = *self.selector.resolve(ui)?;
        let option = self.selector.selected_option()?.clone();
        sink.emit(&SchedulerEvent::AutoSelected { option });
        self.scheduler.schedule(id)?;
        self.auto_command = Some(id);
        Ok(())
    }
}
