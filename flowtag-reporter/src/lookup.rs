//! Port/protocol to tag lookup table.
//!
//! Source format is CSV with a header row containing at least `dstport`,
//! `protocol` and `tag` (matched after trimming, ignoring ASCII case).
//! Extra columns are ignored. Loading is all-or-nothing: the first row with
//! an empty required field fails the whole load.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use crate::types::{LookupKey, TagMatch};

/// Column names the header row must contain.
pub const REQUIRED_COLUMNS: [&str; 3] = ["dstport", "protocol", "tag"];

/// Errors from lookup table loading.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("line {line}: empty {field}")]
    Validation { line: u64, field: &'static str },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// The three required fields of one data row, in `REQUIRED_COLUMNS` order.
#[derive(Debug, Deserialize)]
struct LookupRow {
    dstport: String,
    protocol: String,
    tag: String,
}

/// Immutable mapping from (port, protocol) to tag.
///
/// Duplicate keys after normalization resolve last-writer-wins; the number
/// of replaced mappings is kept in `overridden`.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: HashMap<LookupKey, String>,
    overridden: usize,
}

impl LookupTable {
    /// Create an empty table (every lookup misses).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a table from CSV text.
    pub fn parse(content: &str) -> Result<Self, LookupError> {
        Self::from_reader(content.as_bytes())
    }

    /// Parse a table from any CSV byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LookupError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: csv::StringRecord = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();

        // First matching column wins when a name repeats
        let mut columns = [0usize; 3];
        let mut missing = Vec::new();
        for (slot, column) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers.iter().position(|h| h == column) {
                Some(index) => *slot = index,
                None => missing.push(column.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(LookupError::Schema { missing });
        }

        let row_headers = csv::StringRecord::from(REQUIRED_COLUMNS.to_vec());
        let mut table = Self::empty();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            // Short rows read as empty fields and fail validation below
            let projected: csv::StringRecord = columns
                .iter()
                .map(|&index| record.get(index).unwrap_or(""))
                .collect();
            let row: LookupRow = projected.deserialize(Some(&row_headers))?;
            table.insert_row(line, row)?;
        }

        Ok(table)
    }

    fn insert_row(&mut self, line: u64, row: LookupRow) -> Result<(), LookupError> {
        let port = row.dstport.trim();
        let protocol = row.protocol.trim();
        let tag = row.tag.trim();

        for (field, value) in [("dstport", port), ("protocol", protocol), ("tag", tag)] {
            if value.is_empty() {
                return Err(LookupError::Validation { line, field });
            }
        }

        self.insert(port, protocol, tag);
        Ok(())
    }

    /// Insert a mapping, normalizing port, protocol and tag.
    /// Returns the tag it replaced, if any.
    pub fn insert(&mut self, port: &str, protocol: &str, tag: &str) -> Option<String> {
        let previous = self
            .entries
            .insert(LookupKey::new(port, protocol), tag.trim().to_string());
        if previous.is_some() {
            self.overridden += 1;
        }
        previous
    }

    /// Look up a tag by raw port and protocol name.
    pub fn lookup(&self, port: &str, protocol: &str) -> TagMatch<'_> {
        self.get(&LookupKey::new(port, protocol))
    }

    /// Look up a tag by an already-normalized key.
    pub fn get(&self, key: &LookupKey) -> TagMatch<'_> {
        match self.entries.get(key) {
            Some(tag) => TagMatch::Found(tag.as_str()),
            None => TagMatch::NotFound,
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows that replaced an earlier mapping for the same key.
    pub fn overridden(&self) -> usize {
        self.overridden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "dstport,protocol,tag\n25,tcp,sv_P1\n68,udp,sv_P2\n";

    // ===========================================
    // Parsing
    // ===========================================

    #[test]
    fn test_parse_sample() {
        let table = LookupTable::parse(SAMPLE).expect("parse");
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("25", "tcp"), TagMatch::Found("sv_P1"));
        assert_eq!(table.lookup("68", "udp"), TagMatch::Found("sv_P2"));
        assert_eq!(table.overridden(), 0);
    }

    #[test]
    fn test_parse_header_only() {
        let table = LookupTable::parse("dstport,protocol,tag\n").expect("parse");
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_extra_columns_ignored() {
        let content = "note,tag,protocol,dstport\nmail,sv_P1,tcp,25\n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.lookup("25", "tcp"), TagMatch::Found("sv_P1"));
    }

    #[test]
    fn test_parse_header_trimmed_and_case_insensitive() {
        let content = " DstPort , Protocol ,TAG \n25,tcp,sv_P1\n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.lookup("25", "tcp"), TagMatch::Found("sv_P1"));
    }

    #[test]
    fn test_parse_normalizes_fields() {
        let content = "dstport,protocol,tag\n 443 , TCP , sv_P3 \n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.lookup("443", "tcp"), TagMatch::Found("sv_P3"));
    }

    #[test]
    fn test_parse_quoted_tag_with_comma() {
        let content = "dstport,protocol,tag\n80,tcp,\"web, public\"\n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.lookup("80", "tcp"), TagMatch::Found("web, public"));
    }

    #[test]
    fn test_parse_duplicate_header_first_column_wins() {
        let content = "dstport,protocol,tag,Tag\n25,tcp,sv_P1,other\n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.lookup("25", "tcp"), TagMatch::Found("sv_P1"));
    }

    #[test]
    fn test_parse_duplicate_header_short_row_is_validation() {
        let content = "tag,dstport,protocol,tag\nsv_P1,25\n";
        let err = LookupTable::parse(content).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Validation {
                line: 2,
                field: "protocol"
            }
        ));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let content = "dstport,protocol,tag\n25,tcp,sv_P1\n\n68,udp,sv_P2\n\n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let content = "dstport,protocol,tag\r\n25,tcp,sv_P1\r\n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.lookup("25", "tcp"), TagMatch::Found("sv_P1"));
    }

    // ===========================================
    // Schema errors
    // ===========================================

    #[test]
    fn test_schema_missing_one_column() {
        let err = LookupTable::parse("dstport,protocol\n25,tcp\n").unwrap_err();
        match err {
            LookupError::Schema { missing } => assert_eq!(missing, vec!["tag".to_string()]),
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_missing_all_columns() {
        let err = LookupTable::parse("port,proto,label\n").unwrap_err();
        match err {
            LookupError::Schema { missing } => assert_eq!(missing.len(), 3),
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_empty_source() {
        let err = LookupTable::parse("").unwrap_err();
        assert!(matches!(err, LookupError::Schema { .. }));
    }

    #[test]
    fn test_schema_error_message_lists_columns() {
        let err = LookupTable::parse("dstport\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("protocol"));
        assert!(msg.contains("tag"));
    }

    // ===========================================
    // Validation errors (all-or-nothing)
    // ===========================================

    #[test]
    fn test_validation_empty_tag() {
        let content = "dstport,protocol,tag\n25,tcp,sv_P1\n68,udp,  \n";
        let err = LookupTable::parse(content).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Validation {
                line: 3,
                field: "tag"
            }
        ));
    }

    #[test]
    fn test_validation_empty_port() {
        let content = "dstport,protocol,tag\n,tcp,sv_P1\n";
        let err = LookupTable::parse(content).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Validation {
                line: 2,
                field: "dstport"
            }
        ));
    }

    #[test]
    fn test_validation_short_row() {
        let content = "dstport,protocol,tag\n25,tcp\n";
        let err = LookupTable::parse(content).unwrap_err();
        assert!(matches!(err, LookupError::Validation { field: "tag", .. }));
    }

    #[test]
    fn test_validation_short_row_missing_middle_field() {
        let content = "dstport,protocol,tag\n25,tcp,sv_P1\n68\n";
        let err = LookupTable::parse(content).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Validation {
                line: 3,
                field: "protocol"
            }
        ));
    }

    #[test]
    fn test_validation_aborts_on_first_bad_row() {
        let content = "dstport,protocol,tag\n25,tcp,sv_P1\n , ,\n68,udp,sv_P2\n";
        let err = LookupTable::parse(content).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Validation {
                line: 3,
                field: "dstport"
            }
        ));
    }

    #[test]
    fn test_malformed_utf8_is_csv_error() {
        let bytes: &[u8] = b"dstport,protocol,tag\n25,tcp,\xff\xfe\n";
        let err = LookupTable::from_reader(bytes).unwrap_err();
        assert!(matches!(err, LookupError::Csv(_)));
    }

    // ===========================================
    // Lookup semantics
    // ===========================================

    #[test]
    fn test_lookup_case_insensitive_protocol() {
        let table = LookupTable::parse(SAMPLE).expect("parse");
        assert_eq!(table.lookup("25", "TCP"), TagMatch::Found("sv_P1"));
        assert_eq!(table.lookup("25", "Tcp"), TagMatch::Found("sv_P1"));
        assert_eq!(table.lookup("25", "tcp"), TagMatch::Found("sv_P1"));
    }

    #[test]
    fn test_lookup_table_protocol_uppercase() {
        let table = LookupTable::parse("dstport,protocol,tag\n25,TCP,sv_P1\n").expect("parse");
        assert_eq!(table.lookup("25", "tcp"), TagMatch::Found("sv_P1"));
    }

    #[test]
    fn test_lookup_miss() {
        let table = LookupTable::parse(SAMPLE).expect("parse");
        assert_eq!(table.lookup("23", "tcp"), TagMatch::NotFound);
        assert_eq!(table.lookup("25", "udp"), TagMatch::NotFound);
    }

    #[test]
    fn test_lookup_port_is_literal_token() {
        let table = LookupTable::parse("dstport,protocol,tag\n025,tcp,padded\n").expect("parse");
        assert_eq!(table.lookup("25", "tcp"), TagMatch::NotFound);
        assert_eq!(table.lookup("025", "tcp"), TagMatch::Found("padded"));
    }

    #[test]
    fn test_lookup_empty_table() {
        let table = LookupTable::empty();
        assert_eq!(table.lookup("25", "tcp"), TagMatch::NotFound);
    }

    #[test]
    fn test_duplicate_key_last_writer_wins() {
        let content = "dstport,protocol,tag\n80,TCP,A\n80,tcp,B\n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("80", "tcp"), TagMatch::Found("B"));
        assert_eq!(table.overridden(), 1);
    }

    #[test]
    fn test_tag_may_map_many_keys() {
        let content = "dstport,protocol,tag\n25,tcp,sv_P1\n110,tcp,sv_P1\n993,tcp,sv_P1\n";
        let table = LookupTable::parse(content).expect("parse");
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("993", "tcp"), TagMatch::Found("sv_P1"));
    }

    #[test]
    fn test_insert_returns_previous() {
        let mut table = LookupTable::empty();
        assert_eq!(table.insert("80", "tcp", "A"), None);
        assert_eq!(table.insert("80", "TCP", "B"), Some("A".to_string()));
        assert_eq!(table.overridden(), 1);
    }

    #[test]
    fn test_holds_ten_thousand_entries() {
        let mut content = String::from("dstport,protocol,tag\n");
        for port in 0..10_000 {
            let protocol = if port % 2 == 0 { "tcp" } else { "udp" };
            content.push_str(&format!("{port},{protocol},tag_{}\n", port % 97));
        }

        let table = LookupTable::parse(&content).expect("parse");
        assert_eq!(table.len(), 10_000);
        assert_eq!(table.lookup("9998", "tcp"), TagMatch::Found("tag_7"));
        assert_eq!(table.lookup("9999", "tcp"), TagMatch::NotFound);
    }
}
