//! Flow-log record validation and field extraction.
//!
//! Only the default version 2 layout is supported:
//!
//! ```text
//! 0       1          2            3       4       5       6       7        8       9     10    11  12     13
//! version account-id interface-id srcaddr dstaddr srcport dstport protocol packets bytes start end action log-status
//! ```
//!
//! Classification reads the token at index 5 as the port, which is the
//! `srcport` slot in the layout above, not `dstport` at index 6. The
//! protocol number is read from index 7. Both positions are fixed.

use std::fmt;

/// Version marker of the supported record layout.
pub const VERSION_2: &str = "2";

/// Minimum number of whitespace-separated fields in a version 2 record.
pub const V2_MIN_FIELDS: usize = 14;

/// Position of the token read as the classification port (`srcport` in the layout).
pub const V2_PORT_INDEX: usize = 5;

/// Position of the protocol-number field.
pub const V2_PROTOCOL_INDEX: usize = 7;

/// Fixed positional layout of a flow-log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowLogFormat {
    pub version: &'static str,
    pub min_fields: usize,
    pub port_index: usize,
    pub protocol_index: usize,
}

impl FlowLogFormat {
    /// Default version 2 layout.
    pub const V2_DEFAULT: Self = Self {
        version: VERSION_2,
        min_fields: V2_MIN_FIELDS,
        port_index: V2_PORT_INDEX,
        protocol_index: V2_PROTOCOL_INDEX,
    };

    /// Classify a raw line as a usable record or a skip.
    pub fn classify<'a>(&self, line: &'a str) -> Classification<'a> {
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();

        if fields.is_empty() {
            return Classification::Skip(SkipReason::Blank);
        }

        if fields.len() < self.min_fields {
            return Classification::Skip(SkipReason::TooFewFields {
                found: fields.len(),
                required: self.min_fields,
            });
        }

        if fields[0] != self.version {
            return Classification::Skip(SkipReason::UnsupportedVersion(fields[0].to_string()));
        }

        match (
            fields.get(self.port_index).copied(),
            fields.get(self.protocol_index).copied(),
        ) {
            (Some(port), Some(protocol_number)) => Classification::Record(FlowFields {
                port,
                protocol_number,
            }),
            _ => Classification::Skip(SkipReason::TooFewFields {
                found: fields.len(),
                required: self.port_index.max(self.protocol_index) + 1,
            }),
        }
    }
}

impl Default for FlowLogFormat {
    fn default() -> Self {
        Self::V2_DEFAULT
    }
}

/// The two fields consumed from a well-formed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowFields<'a> {
    pub port: &'a str,
    pub protocol_number: &'a str,
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    Record(FlowFields<'a>),
    Skip(SkipReason),
}

/// Why a line was excluded from both tallies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    TooFewFields { found: usize, required: usize },
    UnsupportedVersion(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Blank => write!(f, "blank line"),
            SkipReason::TooFewFields { found, required } => {
                write!(f, "expected at least {required} fields, found {found}")
            }
            SkipReason::UnsupportedVersion(version) => {
                write!(f, "unsupported flow log version {version:?}")
            }
        }
    }
}

/// Classify a line using the default version 2 layout.
pub fn classify(line: &str) -> Classification<'_> {
    FlowLogFormat::V2_DEFAULT.classify(line)
}
