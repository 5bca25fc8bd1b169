//! CLI module for the Directus client
//!
//! Provides command-line access to:
//! - ping: health check with latency
//! - collections / fields: schema inspection
//! - dump: capture endpoint payloads as JSON fixtures
//! - explain: offline query explanation

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain_query, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
