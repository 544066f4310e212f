//! Terminal front end using cliclack (Charm-style inline output)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod reporter;
#[cfg(feature = "tui")]
mod session;

#[cfg(feature = "tui")]
pub use reporter::CliclackReporter;
#[cfg(feature = "tui")]
pub use session::{run, CreateArgs};
