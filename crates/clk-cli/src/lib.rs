//! clk CLI library.
//!
//! This crate provides the command-line interface for the clk time tracker.

mod cli;
pub mod commands;
mod config;
pub mod notifier;

pub use cli::{Cli, Commands};
pub use config::Config;
