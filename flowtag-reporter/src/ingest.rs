//! Flow-log ingestion.
//!
//! One forward pass over a line reader: each line is classified, its
//! protocol number resolved, its (port, protocol) looked up, and the result
//! folded into an [`Aggregator`]. Memory is bounded by the number of
//! distinct keys, not by the size of the source.

use std::io::{self, BufRead};

use crate::aggregate::{Aggregator, Tallies};
use crate::lookup::LookupTable;
use crate::protocol;
use crate::record::{Classification, FlowLogFormat, SkipReason};
use crate::types::LookupKey;

/// Errors from flow-log ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {source_name} at line {line}: {source}")]
    Read {
        source_name: String,
        line: u64,
        #[source]
        source: io::Error,
    },
}

/// Line counters for one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines read, including blank and skipped lines.
    pub lines: u64,
    /// Lines accepted as flow records.
    pub records: u64,
    /// Non-blank lines rejected by the validator.
    pub skipped: u64,
    /// Blank or whitespace-only lines.
    pub blank: u64,
}

/// Tallies plus counters produced by [`ingest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub tallies: Tallies,
    pub stats: IngestStats,
}

/// Classify and aggregate every line of `reader`.
///
/// Lines are decoded lossily so a stray non-UTF-8 byte cannot abort the
/// pass. If `warn_fn` is provided it is called as `(location, reason)` for
/// each skipped non-blank line, with `location` formatted `source:line`.
pub fn ingest<R, F>(
    mut reader: R,
    source_name: &str,
    table: &LookupTable,
    format: &FlowLogFormat,
    mut warn_fn: Option<F>,
) -> Result<IngestOutcome, IngestError>
where
    R: BufRead,
    F: FnMut(&str, &str),
{
    let mut aggregator = Aggregator::new();
    let mut stats = IngestStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| IngestError::Read {
                source_name: source_name.to_string(),
                line: stats.lines + 1,
                source: e,
            })?;
        if read == 0 {
            break;
        }
        stats.lines += 1;

        let line = String::from_utf8_lossy(&buf);
        match format.classify(&line) {
            Classification::Record(fields) => {
                let protocol = protocol::resolve(fields.protocol_number);
                let key = LookupKey::new(fields.port, protocol.as_str());
                aggregator.observe_key(&key, table.get(&key));
                stats.records += 1;
            }
            Classification::Skip(SkipReason::Blank) => stats.blank += 1,
            Classification::Skip(reason) => {
                stats.skipped += 1;
                if let Some(ref mut warn) = warn_fn {
                    let location = format!("{}:{}", source_name, stats.lines);
                    warn(&location, &reason.to_string());
                }
            }
        }
    }

    Ok(IngestOutcome {
        tallies: aggregator.into_tallies(),
        stats,
    })
}
