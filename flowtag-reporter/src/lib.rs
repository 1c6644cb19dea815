//! flowtag reporter core
//!
//! Consumes a whitespace-delimited flow log and a port/protocol lookup
//! table, and produces:
//! - `tag_counts.csv` - records per tag, plus an `Untagged` row
//! - `port_protocol_counts.csv` - records per (port, protocol)
//!
//! Everything here is pure; reading sources and writing reports is left to
//! the caller.

pub mod aggregate;
pub mod config;
pub mod ingest;
pub mod lookup;
pub mod protocol;
pub mod record;
pub mod report;
pub mod types;

pub use aggregate::{Aggregator, Tallies};
pub use config::ReportConfig;
pub use ingest::{ingest, IngestError, IngestOutcome, IngestStats};
pub use lookup::{LookupError, LookupTable};
pub use protocol::Protocol;
pub use record::{Classification, FlowFields, FlowLogFormat, SkipReason};
pub use report::{Report, ReportError};
pub use types::{LookupKey, TagMatch, Tally};
