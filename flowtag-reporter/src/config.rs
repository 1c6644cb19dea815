//! Report output configuration.

use std::path::{Path, PathBuf};

use crate::record::FlowLogFormat;

/// Default file name of the tag counts report.
pub const DEFAULT_TAG_COUNTS_FILE: &str = "tag_counts.csv";

/// Default file name of the port/protocol counts report.
pub const DEFAULT_PORT_PROTOCOL_COUNTS_FILE: &str = "port_protocol_counts.csv";

/// Default output directory (the working directory).
pub const DEFAULT_OUT_DIR: &str = ".";

/// Where and how reports are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub out_dir: PathBuf,
    pub tag_counts_file: String,
    pub port_protocol_file: String,
    pub format: FlowLogFormat,
}

impl ReportConfig {
    /// Create a config with default file names and flow-log format.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            tag_counts_file: DEFAULT_TAG_COUNTS_FILE.to_string(),
            port_protocol_file: DEFAULT_PORT_PROTOCOL_COUNTS_FILE.to_string(),
            format: FlowLogFormat::V2_DEFAULT,
        }
    }

    /// Builder: set the tag counts file name.
    pub fn with_tag_counts_file(mut self, name: impl Into<String>) -> Self {
        self.tag_counts_file = name.into();
        self
    }

    /// Builder: set the port/protocol counts file name.
    pub fn with_port_protocol_file(mut self, name: impl Into<String>) -> Self {
        self.port_protocol_file = name.into();
        self
    }

    /// Builder: set the flow-log layout.
    pub fn with_format(mut self, format: FlowLogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Full path of the tag counts report.
    pub fn tag_counts_path(&self) -> PathBuf {
        self.out_dir.join(&self.tag_counts_file)
    }

    /// Full path of the port/protocol counts report.
    pub fn port_protocol_path(&self) -> PathBuf {
        self.out_dir.join(&self.port_protocol_file)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUT_DIR)
    }
}
