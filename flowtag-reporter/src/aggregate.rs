//! Tag and port/protocol tallies.

use crate::types::{LookupKey, TagMatch, Tally};

/// Counts accumulated over one run.
///
/// Every observed record adds one to exactly one of `tag_counts` or
/// `untagged`, and one to `port_protocol_counts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tallies {
    pub tag_counts: Tally<String>,
    pub untagged: u64,
    pub port_protocol_counts: Tally<LookupKey>,
}

impl Tallies {
    /// Create empty tallies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records folded into these tallies.
    pub fn records(&self) -> u64 {
        self.port_protocol_counts.total()
    }

    /// Number of records that matched a tag.
    pub fn tagged(&self) -> u64 {
        self.tag_counts.total()
    }

    /// Add another set of tallies into this one.
    ///
    /// Merging is commutative and associative up to row order, with empty
    /// tallies as identity, so shards can be combined in any order.
    pub fn merge(&mut self, other: &Tallies) {
        self.tag_counts.merge(&other.tag_counts);
        self.untagged = self.untagged.saturating_add(other.untagged);
        self.port_protocol_counts.merge(&other.port_protocol_counts);
    }
}

/// Folds classified records into [`Tallies`].
#[derive(Debug, Default)]
pub struct Aggregator {
    tallies: Tallies,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classification from raw port and protocol name.
    pub fn observe(&mut self, dst_port: &str, protocol: &str, tag: TagMatch<'_>) {
        self.observe_key(&LookupKey::new(dst_port, protocol), tag);
    }

    /// Record one classification for an already-built key.
    pub fn observe_key(&mut self, key: &LookupKey, tag: TagMatch<'_>) {
        match tag {
            TagMatch::Found(tag) => self.tallies.tag_counts.increment(tag),
            TagMatch::NotFound => self.tallies.untagged = self.tallies.untagged.saturating_add(1),
        }
        self.tallies.port_protocol_counts.increment(key);
    }

    /// Number of records observed so far.
    pub fn records(&self) -> u64 {
        self.tallies.records()
    }

    /// Point-in-time copy of the tallies.
    pub fn snapshot(&self) -> Tallies {
        self.tallies.clone()
    }

    /// Consume the aggregator and return its tallies.
    pub fn into_tallies(self) -> Tallies {
        self.tallies
    }
}
