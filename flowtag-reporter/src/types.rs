//! Shared types for classification and tallies.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

/// Key identifying a (destination port, protocol) combination.
///
/// Both parts are normalized at construction: the port is trimmed but kept
/// as the literal token (`"025"` and `"25"` are different keys), the
/// protocol is trimmed and lowercased. Equality and hashing therefore ignore
/// protocol case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey {
    port: String,
    protocol: String,
}

impl LookupKey {
    /// Create a normalized key.
    pub fn new(port: &str, protocol: &str) -> Self {
        Self {
            port: port.trim().to_string(),
            protocol: protocol.trim().to_ascii_lowercase(),
        }
    }

    /// Port token as written in the source.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Lowercase protocol name.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol)
    }
}

/// Outcome of a lookup-table query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMatch<'a> {
    Found(&'a str),
    NotFound,
}

impl<'a> TagMatch<'a> {
    /// The matched tag, if any.
    pub fn tag(&self) -> Option<&'a str> {
        match *self {
            TagMatch::Found(tag) => Some(tag),
            TagMatch::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, TagMatch::Found(_))
    }
}

/// Monotonic counter keyed by `K`, iterated in first-seen order.
///
/// Equality ignores iteration order: two tallies are equal when they hold
/// the same keys with the same counts.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    counts: IndexMap<K, u64>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `key` by one, inserting it at zero first if unseen.
    pub fn increment<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.add(key, 1);
    }

    /// Add `n` to the count for `key`.
    pub fn add<Q>(&mut self, key: &Q, n: u64)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        // Only allocate an owned key the first time it is seen
        match self.counts.get_mut(key) {
            Some(count) => *count = count.saturating_add(n),
            None => {
                self.counts.insert(key.to_owned(), n);
            }
        }
    }

    /// Count for `key` (zero if never seen).
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Add every count of `other` into this tally.
    /// Keys new to `self` are appended in `other`'s order.
    pub fn merge(&mut self, other: &Tally<K>) {
        for (key, &count) in &other.counts {
            let slot = self.counts.entry(key.clone()).or_insert(0);
            *slot = slot.saturating_add(count);
        }
    }

    /// Iterate `(key, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.counts.iter().map(|(k, c)| (k, *c))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, c| acc.saturating_add(*c))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<K: Eq + Hash> PartialEq for Tally<K> {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl<K: Eq + Hash> Eq for Tally<K> {}
