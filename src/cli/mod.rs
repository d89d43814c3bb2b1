//! CLI module for the tmdl-er binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
