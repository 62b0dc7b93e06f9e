//! KitBot host runner.
//!
//! Runs a scripted match against simulated motors:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Disabled (1 tick) ─▶ Autonomous (--auto-ticks) ─▶ Teleop      │
//! │                                                                │
//! │  Teleop script (repeats every 100 ticks):                      │
//! │    0-39   full stick forward, bumper released                  │
//! │   40-59   full stick forward, bumper held, right trigger 0.8   │
//! │   60-79   A held (eject)                                       │
//! │   80-99   stick right (turn in place)                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use kitbot::adapters::dashboard::MemoryDashboard;
use kitbot::adapters::log_sink::LogEventSink;
use kitbot::adapters::sim::SimMotor;
use kitbot::app::ports::SelectionPort;
use kitbot::config::RobotConfig;
use kitbot::input::{Axis, Button, GamepadState};
use kitbot::robot::{HardwarePorts, Robot, RobotMode};

#[derive(Debug, Parser)]
#[command(version, about = "Run a scripted KitBot session on simulated motors")]
struct Args {
    /// JSON configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Teleop ticks to run.
    #[arg(long, default_value_t = 200)]
    ticks: u32,

    /// Autonomous ticks to run before switching to teleop.
    #[arg(long, default_value_t = 75)]
    auto_ticks: u32,

    /// Autonomous option to pick on the dashboard.
    #[arg(long)]
    auto: Option<String>,

    /// Sleep for the configured tick period between ticks.
    #[arg(long)]
    realtime: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<RobotConfig> {
    let Some(path) = path else {
        info!("Config: defaults");
        return Ok(RobotConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = RobotConfig::from_json(&json)
        .with_context(|| format!("parsing {}", path.display()))?;
    info!("Config: loaded {}", path.display());
    Ok(config)
}

/// Driver input for teleop tick `t`.
fn scripted_input(t: u32) -> GamepadState {
    let idle = GamepadState::default();
    match t % 100 {
        0..=39 => idle.with_axis(Axis::LeftY, -1.0),
        40..=59 => idle
            .with_axis(Axis::LeftY, -1.0)
            .with_button(Button::RightBumper, true)
            .with_axis(Axis::RightTrigger, 0.8),
        60..=79 => idle.with_button(Button::A, true),
        _ => idle.with_axis(Axis::RightX, 1.0),
    }
}

struct Motors {
    left: SimMotor,
    right: SimMotor,
    roller: SimMotor,
}

impl Motors {
    fn log(&self, mode: RobotMode, tick: u32) {
        info!(
            "{:?} t={:>4} | L={:+.2} R={:+.2} roller={:+.2}",
            mode,
            tick,
            self.left.output(),
            self.right.output(),
            self.roller.output()
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("KitBot v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_ref())?;
    let motors = Motors {
        left: SimMotor::new("left"),
        right: SimMotor::new("right"),
        roller: SimMotor::new("roller"),
    };
    let hw = HardwarePorts {
        left_drive: Box::new(motors.left.clone()),
        right_drive: Box::new(motors.right.clone()),
        roller: Box::new(motors.roller.clone()),
    };
    let mut robot = Robot::new(&config, hw).context("building robot")?;

    let mut dashboard = MemoryDashboard::new();
    robot.publish_auto_options(&mut dashboard)?;
    if let Some(choice) = args.auto.as_deref() {
        dashboard.choose(choice);
    }
    if let Some(choice) = dashboard.selected() {
        info!("Dashboard: operator picked '{}'", choice);
    }

    let mut sink = LogEventSink::new();
    let period = Duration::from_millis(u64::from(config.tick_period_ms));
    let wait = || {
        if args.realtime {
            std::thread::sleep(period);
        }
    };

    // ── Disabled ─────────────────────────────────────────────
    robot.tick(&mut sink);
    wait();

    // ── Autonomous ───────────────────────────────────────────
    robot.set_mode(RobotMode::Autonomous, &dashboard, &mut sink)?;
    for t in 0..args.auto_ticks {
        robot.tick(&mut sink);
        if t % 25 == 0 {
            motors.log(robot.mode(), t);
        }
        wait();
    }

    // ── Teleop ───────────────────────────────────────────────
    robot.set_mode(RobotMode::Teleop, &dashboard, &mut sink)?;
    for t in 0..args.ticks {
        robot.driver().update(scripted_input(t));
        robot.tick(&mut sink);
        if t % 20 == 0 {
            motors.log(robot.mode(), t);
        }
        wait();
    }

    robot.set_mode(RobotMode::Disabled, &dashboard, &mut sink)?;
    if robot.subsystems().drive.is_safety_stopped() {
        warn!("Drive ended the session in safety stop");
    }
    info!(
        "Session complete: {} scheduler ticks, {} events",
        robot.scheduler().tick_count(),
        sink.emitted()
    );
    Ok(())
}
