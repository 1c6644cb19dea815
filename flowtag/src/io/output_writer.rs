//! Output writer for report artifacts.
//!
//! Writes two files to the output directory:
//! - the tag counts report (`tag_counts.csv` by default)
//! - the port/protocol counts report (`port_protocol_counts.csv` by default)
//!
//! Either both files are written or neither is left behind.

use std::path::{Path, PathBuf};

use flowtag_fs::{Filesystem, FsError};
use flowtag_reporter::config::ReportConfig;
use flowtag_reporter::report::Report;
use thiserror::Error;

/// Errors from output writing.
#[derive(Debug, Error)]
pub enum OutputWriterError {
    #[error("failed to create output directory: {0}")]
    CreateDir(#[source] FsError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    #[error("{write}; partial report {} could not be removed: {source}", .path.display())]
    Rollback {
        path: PathBuf,
        #[source]
        source: FsError,
        write: Box<OutputWriterError>,
    },
}

/// Output writer that writes report artifacts to a directory.
pub struct OutputWriter<'a, F: Filesystem> {
    fs: &'a F,
    config: &'a ReportConfig,
}

impl<'a, F: Filesystem> OutputWriter<'a, F> {
    pub fn new(fs: &'a F, config: &'a ReportConfig) -> Self {
        Self { fs, config }
    }

    /// Ensure the output directory exists.
    pub fn ensure_dir(&self) -> Result<(), OutputWriterError> {
        self.fs
            .create_dir_all(self.config.out_dir())
            .map_err(OutputWriterError::CreateDir)
    }

    /// Write both reports.
    ///
    /// If the second write fails the first report is removed again. A failed
    /// removal is reported as `Rollback` alongside the write error.
    pub fn write_all(&self, report: &Report) -> Result<WrittenFiles, OutputWriterError> {
        self.ensure_dir()?;

        let tag_counts = self.tag_counts_path();
        self.write(&tag_counts, &report.tag_counts)?;

        let port_protocol_counts = self.port_protocol_path();
        if let Err(e) = self.write(&port_protocol_counts, &report.port_protocol_counts) {
            return Err(match self.fs.remove(&tag_counts) {
                Ok(()) => e,
                Err(source) => OutputWriterError::Rollback {
                    path: tag_counts,
                    source,
                    write: Box::new(e),
                },
            });
        }

        Ok(WrittenFiles {
            tag_counts,
            port_protocol_counts,
        })
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<(), OutputWriterError> {
        self.fs
            .write_atomic(path, data)
            .map_err(|e| OutputWriterError::Write {
                path: path.to_path_buf(),
                source: e,
            })
    }

    pub fn tag_counts_path(&self) -> PathBuf {
        self.config.tag_counts_path()
    }

    pub fn port_protocol_path(&self) -> PathBuf {
        self.config.port_protocol_path()
    }
}

/// Paths to written files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub tag_counts: PathBuf,
    pub port_protocol_counts: PathBuf,
}
