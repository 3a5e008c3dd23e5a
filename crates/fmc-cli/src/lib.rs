//! FMC route builder - interactive front end for `fmc-core`.
//!
//! This crate provides:
//! - config: reference table paths and log filter from env / arguments
//! - console: line-oriented prompts over any reader/writer pair
//! - session: the insert/shift/delete/view editing loop and file export

pub mod config;
pub mod console;
pub mod session;

pub use config::{Args, Config};
pub use console::Console;
pub use session::{Session, SessionOutcome};
