//! Headless runner for the algorithm demos.
//!
//! Provides commands for:
//! - Cache simulations over consistent hashing and modulo hashing
//! - Bubble and selection sort
//! - Comparing how many keys each routing strategy remaps on a topology change

pub mod commands;
pub mod config;
pub mod control;
pub mod demos;
pub mod telemetry;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
