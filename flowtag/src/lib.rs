//! flowtag CLI.
//!
//! Argument parsing, command orchestration, diagnostics and exit codes for
//! the `flowtag` binary. The classification pipeline itself lives in
//! `flowtag-reporter`.

pub mod cli;
pub mod commands;
pub mod exit;
pub mod io;
pub mod logger;

pub use cli::{parse_from, Cli, CliError};
pub use commands::{execute_report, CommandError, CommandResult, ReportResult};
pub use logger::{Logger, MockLogger, NullLogger, StderrLogger, Verbosity};
