//! Diagnostic output.
//!
//! Skipped flow records, duplicate lookup rows and per-stage progress are
//! diagnostics, not results: they go through a [`Logger`] to stderr while
//! the report summary goes to stdout. Nothing here is global, so tests
//! capture output with [`MockLogger`].

use std::io::Write;
use std::sync::{Arc, RwLock};

/// Verbosity level for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Always shown
    Normal,
    /// Skipped lines and lookup overrides (-v)
    Verbose,
    /// Per-stage progress (-vv)
    Debug,
}

impl Verbosity {
    /// Create verbosity from CLI flag count.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }
}

/// Sink for diagnostic messages.
pub trait Logger: Send + Sync {
    /// Log a message at the given verbosity level.
    fn log(&self, level: Verbosity, message: &str);

    fn info(&self, message: &str) {
        self.log(Verbosity::Normal, message);
    }

    fn verbose(&self, message: &str) {
        self.log(Verbosity::Verbose, message);
    }

    fn debug(&self, message: &str) {
        self.log(Verbosity::Debug, message);
    }

    /// Report a skipped input line as `location: skipped (reason)`.
    fn skipped(&self, location: &str, reason: &str) {
        self.verbose(&format!("{location}: skipped ({reason})"));
    }
}

/// Logger that writes to stderr.
#[derive(Debug)]
pub struct StderrLogger {
    level: Verbosity,
}

impl StderrLogger {
    pub fn new(level: Verbosity) -> Self {
        Self { level }
    }

    /// Logger for the `-v` count given on the command line.
    pub fn from_count(count: u8) -> Self {
        Self::new(Verbosity::from_count(count))
    }

    pub fn level(&self) -> Verbosity {
        self.level
    }
}

impl Logger for StderrLogger {
    fn log(&self, level: Verbosity, message: &str) {
        if level <= self.level {
            let _ = writeln!(std::io::stderr(), "{}", message);
        }
    }
}

/// Mock logger for testing that captures messages up to its level.
#[derive(Debug, Clone)]
pub struct MockLogger {
    level: Verbosity,
    messages: Arc<RwLock<Vec<LogEntry>>>,
}

/// A captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Verbosity,
    pub message: String,
}

impl MockLogger {
    pub fn new(level: Verbosity) -> Self {
        Self {
            level,
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a mock logger that captures all levels.
    pub fn capture_all() -> Self {
        Self::new(Verbosity::Debug)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.messages.read().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    /// Messages logged at exactly `level`.
    pub fn messages_at_level(&self, level: Verbosity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Check if any message contains the given substring.
    pub fn contains(&self, substring: &str) -> bool {
        self.messages().iter().any(|m| m.contains(substring))
    }

    pub fn count(&self) -> usize {
        self.messages.read().unwrap().len()
    }
}

impl Logger for MockLogger {
    fn log(&self, level: Verbosity, message: &str) {
        if level <= self.level {
            self.messages.write().unwrap().push(LogEntry {
                level,
                message: message.to_string(),
            });
        }
    }
}

/// A no-op logger that discards all messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Verbosity, _message: &str) {}
}
