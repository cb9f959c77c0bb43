//! Timecard CLI library.
//!
//! Wires the core log model to the filesystem: configuration, the
//! append-only log writer, the session lock, the window observer, and the
//! subcommand implementations.

mod cli;
pub mod commands;
mod config;
pub mod lock;
pub mod observer;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
