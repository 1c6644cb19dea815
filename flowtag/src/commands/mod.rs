//! Command orchestration.

pub mod report;

pub use report::{execute_report, ReportResult};

use std::path::PathBuf;

use crate::cli::CliError;
use crate::io::{LookupLoadError, OutputWriterError};
use flowtag_fs::FsError;
use flowtag_reporter::{IngestError, ReportError};
use thiserror::Error;

/// Errors from command execution.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] CliError),

    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("lookup error: {0}")]
    Lookup(#[from] LookupLoadError),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),

    #[error("output error: {0}")]
    Output(#[from] OutputWriterError),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] FsError),
}

/// Result of command execution.
pub type CommandResult<T> = Result<T, CommandError>;
