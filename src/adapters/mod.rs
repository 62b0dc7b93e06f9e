//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter     | Implements    | Connects to                 |
//! |-------------|---------------|-----------------------------|
//! | `dashboard` | SelectionPort | In-memory chooser           |
//! | `log_sink`  | EventSink     | `log` facade                |
//! | `sim`       | MotorPort     | In-memory motor (host runs) |
//!
//! The hardware-backed motor port lives in [`crate::drivers::motor`].

pub mod dashboard;
pub mod log_sink;
pub mod sim;
