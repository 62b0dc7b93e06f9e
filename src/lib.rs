//! KitBot control core.
//!
//! A cooperative command scheduler for a differential-drive robot with a
//! roller mechanism.  Pure logic, host-testable; hardware sits behind the
//! port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod command;
pub mod config;
pub mod drivers;
pub mod error;
pub mod input;
pub mod robot;
pub mod scheduler;
pub mod selector;
pub mod subsystems;
pub mod trigger;
