//! CLI argument parsing for flowtag.

use std::path::{Component, Path, PathBuf};

use clap::{ArgAction, Parser};
use flowtag_reporter::config::{
    ReportConfig, DEFAULT_OUT_DIR, DEFAULT_PORT_PROTOCOL_COUNTS_FILE, DEFAULT_TAG_COUNTS_FILE,
};
use thiserror::Error;

use crate::logger::Verbosity;

/// Errors from CLI argument validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("{0} must not be empty")]
    EmptyFileName(&'static str),

    #[error("{flag} must be a plain file name, got {name:?}")]
    NotAFileName { flag: &'static str, name: String },

    #[error("tag-counts-file and port-protocol-file must differ, both are {0:?}")]
    SameOutputFile(String),
}

/// Tag flow-log records by destination port and protocol, then write tag
/// and port/protocol count reports.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "flowtag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Flow log to classify (version 2, whitespace-delimited).
    #[arg(short = 'f', long = "flow-log")]
    pub flow_log: PathBuf,

    /// Lookup table CSV with dstport, protocol and tag columns.
    #[arg(short = 'l', long = "lookup")]
    pub lookup: PathBuf,

    /// Output directory for the reports.
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// File name of the tag counts report.
    #[arg(long, default_value = DEFAULT_TAG_COUNTS_FILE)]
    pub tag_counts_file: String,

    /// File name of the port/protocol counts report.
    #[arg(long, default_value = DEFAULT_PORT_PROTOCOL_COUNTS_FILE)]
    pub port_protocol_file: String,

    /// Increase diagnostic output (-v skipped lines, -vv stages).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Validate the output file names. Empty paths are rejected by clap.
    pub fn validate(&self) -> Result<(), CliError> {
        validate_file_name("tag-counts-file", &self.tag_counts_file)?;
        validate_file_name("port-protocol-file", &self.port_protocol_file)?;
        if self.tag_counts_file == self.port_protocol_file {
            return Err(CliError::SameOutputFile(self.tag_counts_file.clone()));
        }
        Ok(())
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_count(self.verbose)
    }

    /// Build the reporter output configuration.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig::new(&self.out_dir)
            .with_tag_counts_file(&self.tag_counts_file)
            .with_port_protocol_file(&self.port_protocol_file)
    }
}

fn validate_file_name(flag: &'static str, name: &str) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::EmptyFileName(flag));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(CliError::NotAFileName {
            flag,
            name: name.to_string(),
        }),
    }
}

/// Parse CLI arguments from an iterator of strings.
/// Useful for testing.
pub fn parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
