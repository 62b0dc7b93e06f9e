//! Unified error types for the KitBot control core.
//!
//! Hooks never fail at runtime; everything that can go wrong is a
//! wiring mistake made while the robot is being assembled (registering a
//! default that does not own its subsystem, an unknown autonomous option,
//! an out-of-range config value).  All variants are `Copy` so they can be
//! returned from registration calls without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Subsystem, command, default or trigger registration was rejected.
    Registration(RegistrationError),
    /// The autonomous mode selector was misconfigured.
    Selector(SelectorError),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registration(e) => write!(f, "registration: {e}"),
            Self::Selector(e) => write!(f, "selector: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Registration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    /// The subsystem table is full.
    TooManySubsystems,
    /// A subsystem with the same name is already registered.
    DuplicateSubsystem,
    /// A requirement or default refers to a subsystem the scheduler never issued.
    UnknownSubsystem,
    /// A `CommandId` does not refer to a registered command.
    UnknownCommand,
    /// A command declared more subsystems than a requirement set can hold.
    TooManyRequirements,
    /// A default command must require the subsystem it is the default for.
    DefaultMissingRequirement,
    /// A trigger already carries the maximum number of bindings.
    TooManyBindings,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManySubsystems => write!(f, "subsystem table full"),
            Self::DuplicateSubsystem => write!(f, "duplicate subsystem name"),
            Self::UnknownSubsystem => write!(f, "unknown subsystem"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::TooManyRequirements => write!(f, "too many requirements"),
            Self::DefaultMissingRequirement => {
                write!(f, "default command does not require its subsystem")
            }
            Self::TooManyBindings => write!(f, "trigger binding table full"),
        }
    }
}

impl From<RegistrationError> for Error {
    fn from(e: RegistrationError) -> Self {
        Self::Registration(e)
    }
}

// ---------------------------------------------------------------------------
// Selector errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorError {
    /// An option with the same name is already registered.
    DuplicateOption,
    /// The named option was never registered.
    UnknownOption,
    /// No default option has been configured.
    NoDefault,
    /// The option table is full.
    TooManyOptions,
    /// The option name does not fit in an `OptionName`.
    NameTooLong,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateOption => write!(f, "duplicate option"),
            Self::UnknownOption => write!(f, "unknown option"),
            Self::NoDefault => write!(f, "no default option"),
            Self::TooManyOptions => write!(f, "option table full"),
            Self::NameTooLong => write!(f, "option name too long"),
        }
    }
}

impl From<SelectorError> for Error {
    fn from(e: SelectorError) -> Self {
        Self::Selector(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
