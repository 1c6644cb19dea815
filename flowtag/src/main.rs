//! flowtag binary.
//!
//! Entry point for the `flowtag` command-line tool.

use std::process::ExitCode;

use clap::Parser;
use flowtag::exit::{codes, exit_code};
use flowtag::{execute_report, Cli, ReportResult, StderrLogger, Verbosity};
use flowtag_fs::RealFilesystem;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not errors
            let _ = e.print();
            let code = if e.use_stderr() {
                codes::INVALID_ARGS
            } else {
                codes::SUCCESS
            };
            return ExitCode::from(code as u8);
        }
    };
    let logger = StderrLogger::from_count(cli.verbose);

    match execute_report(&cli, &RealFilesystem, &logger) {
        Ok(result) => {
            print_summary(&result, cli.verbosity());
            ExitCode::from(codes::SUCCESS as u8)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}

fn print_summary(result: &ReportResult, verbosity: Verbosity) {
    let tallies = &result.tallies;

    println!("Reports generated:");
    println!("  Lookup entries: {}", result.lookup_entries);
    println!("  Records processed: {}", result.stats.records);
    println!("  Lines skipped: {}", result.stats.skipped);
    println!("  Tags matched: {}", tallies.tag_counts.len());
    println!("  Untagged records: {}", tallies.untagged);

    if verbosity >= Verbosity::Verbose {
        println!();
        println!("Tag counts:");
        for (tag, count) in tallies.tag_counts.iter() {
            println!("  {}: {}", tag, count);
        }
        println!("  Untagged: {}", tallies.untagged);
        println!();
        println!("Port/protocol counts:");
        for (key, count) in tallies.port_protocol_counts.iter() {
            println!("  {} {}: {}", key.port(), key.protocol(), count);
        }
    }

    println!();
    println!("Output files:");
    println!("  Tag counts: {}", result.tag_counts_path.display());
    println!("  Port/protocol counts: {}", result.port_protocol_path.display());
}
