//! Command-line interface for unlatch
//!
//! clap derive definitions live in [`commands`], one module per subcommand.

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
