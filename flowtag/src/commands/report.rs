//! Report command orchestration.
//!
//! Loads the lookup table, streams the flow log through the classifier and
//! writes both count reports. No output path is touched until both reports
//! have been rendered in memory.

use std::path::PathBuf;

use flowtag_fs::Filesystem;
use flowtag_reporter::aggregate::Tallies;
use flowtag_reporter::ingest::{ingest, IngestStats};
use flowtag_reporter::report::Report;

use crate::cli::Cli;
use crate::io::{load_lookup_table, OutputWriter};
use crate::logger::Logger;

use super::{CommandError, CommandResult};

/// Result of report command execution.
#[derive(Debug)]
pub struct ReportResult {
    /// Path to the generated tag counts report.
    pub tag_counts_path: PathBuf,
    /// Path to the generated port/protocol counts report.
    pub port_protocol_path: PathBuf,
    /// Distinct keys in the lookup table.
    pub lookup_entries: usize,
    /// Lookup rows that replaced an earlier mapping.
    pub lookup_overridden: usize,
    pub stats: IngestStats,
    pub tallies: Tallies,
}

/// Execute the report command.
pub fn execute_report<F, L>(cli: &Cli, fs: &F, logger: &L) -> CommandResult<ReportResult>
where
    F: Filesystem,
    L: Logger,
{
    cli.validate()?;
    let config = cli.report_config();

    // Both sources must exist before either is read
    for source in [&cli.flow_log, &cli.lookup] {
        if !fs.is_file(source) {
            return Err(CommandError::SourceNotFound(source.clone()));
        }
    }

    logger.debug(&format!("loading lookup table {}", cli.lookup.display()));
    let table = load_lookup_table(fs, &cli.lookup)?;
    logger.debug(&format!("lookup table has {} entries", table.len()));
    if table.overridden() > 0 {
        logger.verbose(&format!(
            "{}: {} duplicate port/protocol rows overrode earlier tags",
            cli.lookup.display(),
            table.overridden()
        ));
    }

    let source_name = cli.flow_log.display().to_string();
    logger.debug(&format!("ingesting flow log {source_name}"));
    let reader = fs.open_read(&cli.flow_log)?;
    let outcome = ingest(
        reader,
        &source_name,
        &table,
        &config.format,
        Some(|location: &str, reason: &str| logger.skipped(location, reason)),
    )?;
    logger.debug(&format!(
        "read {} lines: {} records, {} skipped, {} blank",
        outcome.stats.lines, outcome.stats.records, outcome.stats.skipped, outcome.stats.blank
    ));
    if outcome.stats.skipped > 0 {
        logger.info(&format!(
            "{source_name}: skipped {} malformed lines",
            outcome.stats.skipped
        ));
    }

    let report = Report::generate(&outcome.tallies)?;

    logger.debug(&format!("writing reports to {}", config.out_dir().display()));
    let writer = OutputWriter::new(fs, &config);
    let written = writer.write_all(&report)?;

    Ok(ReportResult {
        tag_counts_path: written.tag_counts,
        port_protocol_path: written.port_protocol_counts,
        lookup_entries: table.len(),
        lookup_overridden: table.overridden(),
        stats: outcome.stats,
        tallies: outcome.tallies,
    })
}
