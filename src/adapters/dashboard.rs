//! In-memory dashboard chooser.
//!
//! Stands in for the network dashboard on the host: the robot publishes
//! its autonomous options here, and an operator (or a test) picks one
//! with [`MemoryDashboard::choose`].

use log::{info, warn};

use crate::app::ports::SelectionPort;

#[derive(Debug, Clone, Default)]
pub struct MemoryDashboard {
    options: Vec<String>,
    default: Option<String>,
    choice: Option<String>,
}

impl MemoryDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options last published by the robot.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn default_option(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Operator picks an option.  Names that were never published are
    /// still stored; the selector falls back to its default for them.
    pub fn choose(&mut self, name: &str) {
        if !self.options.iter().any(|o| o == name) {
            warn!("dashboard: '{}' is not a published option", name);
        }
        self.choice = Some(name.to_owned());
    }

    pub fn clear(&mut self) {
        self.choice = None;
    }
}

impl SelectionPort for MemoryDashboard {
    fn publish(&mut self, options: &[&str], default: &str) {
        info!("dashboard: options {:?} (default '{}')", options, default);
        self.options = options.iter().map(|&o| o.to_owned()).collect();
        self.default = Some(default.to_owned());
    }

    fn selected(&self) -> Option<&str> {
        self.choice.as_deref()
    }
}
