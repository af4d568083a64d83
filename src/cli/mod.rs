//! CLI module for resumegen - command-line interface and subcommands.

pub mod commands;
pub mod progress;

pub use commands::Cli;
