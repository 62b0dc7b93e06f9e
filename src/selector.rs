//! Autonomous mode selector.
//!
//! Holds the operator-selectable options (name → value) and resolves the
//! one in effect.  The robot reads it exactly once, when autonomous mode is
//! entered; the result is scheduled like any other command.
//!
//! Resolution order:
//! 1. the option the operator picked on the dashboard, if it is known;
//! 2. otherwise the configured default.
//!
//! A selector with options but no default is a wiring error
//! ([`SelectorError::NoDefault`]); it is never left undefined.
//!
//! Option names are copied into fixed-size [`OptionName`] buffers, so
//! names read from config at runtime need no `'static` lifetime.

use heapless::{String, Vec};
use log::{info, warn};

use crate::app::ports::SelectionPort;
use crate::error::{Result, SelectorError};

/// Maximum number of options (stack-allocated).
pub const MAX_OPTIONS: usize = 8;

/// Longest option name, in bytes.
pub const MAX_NAME_LEN: usize = 32;

/// Owned, bounded option name.
pub type OptionName = String<MAX_NAME_LEN>;

pub struct ModeSelector<T> {
    options: Vec<(OptionName, T), MAX_OPTIONS>,
    default: Option<usize>,
    selected: Option<usize>,
}

impl<T> Default for ModeSelector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ModeSelector<T> {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            default: None,
            selected: None,
        }
    }

    /// Add an option.  Names must be unique and at most
    /// [`MAX_NAME_LEN`] bytes long.
    pub fn register_option(&mut self, name: &str, value: T) -> Result<()> {
        if self.index_of(name).is_some() {
            return Err(SelectorError::DuplicateOption.into());
        }
        let name = OptionName::try_from(name).map_err(|()| SelectorError::NameTooLong)?;
        self.options
            .push((name, value))
            .map_err(|_| SelectorError::TooManyOptions)?;
        Ok(())
    }

    /// Add an option and make it the default.
    pub fn set_default_option(&mut self, name: &str, value: T) -> Result<()> {
        self.register_option(name, value)?;
        self.set_default(name)
    }

    /// Mark an already registered option as the default.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        let index = self.index_of(name).ok_or(SelectorError::UnknownOption)?;
        self.default = Some(index);
        info!("Selector: default option '{}'", self.options[index].0);
        Ok(())
    }

    /// Record the operator's choice.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let index = self.index_of(name).ok_or(SelectorError::UnknownOption)?;
        self.selected = Some(index);
        Ok(())
    }

    /// Forget the operator's choice; the default applies again.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The value in effect: the operator's choice, else the default.
    pub fn get_selected(&self) -> Result<&T> {
        let index = self.effective_index()?;
        Ok(&self.options[index].1)
    }

    /// Name of the option in effect.
    pub fn selected_name(&self) -> Result<&str> {
        self.selected_option().map(OptionName::as_str)
    }

    pub fn selected_option(&self) -> Result<&OptionName> {
        let index = self.effective_index()?;
        Ok(&self.options[index].0)
    }

    /// Option names in registration order.
    pub fn options(&self) -> impl Iterator<Item = &str> + '_ {
        self.options.iter().map(|(name, _)| name.as_str())
    }

    /// Present the options to the dashboard chooser.
    pub fn publish(&self, ui: &mut impl SelectionPort) -> Result<()> {
        let default = self.default.ok_or(SelectorError::NoDefault)?;
        let names: Vec<&str, MAX_OPTIONS> = self.options().collect();
        ui.publish(&names, &self.options[default].0);
        Ok(())
    }

    /// Read the chooser once and settle on an option.
    ///
    /// An absent or unknown choice falls back to the default.
    pub fn resolve(&mut self, ui: &impl SelectionPort) -> Result<&T> {
        match ui.selected() {
            Some(name) => {
                if self.select(name).is_err() {
                    warn!("Selector: unknown choice '{}', using default", name);
                    self.clear_selection();
                }
            }
            None => self.clear_selection(),
        }
        info!("Selector: resolved '{}'", self.selected_name()?);
        self.get_selected()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|(n, _)| n.as_str() == name)
    }

    fn effective_index(&self) -> Result<usize> {
        self.selected
            .or(self.default)
            .ok_or_else(|| SelectorError::NoDefault.into())
    }
}
