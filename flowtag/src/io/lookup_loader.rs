//! Lookup table file loader.

use std::path::Path;

use flowtag_fs::{Filesystem, FsError};
use flowtag_reporter::lookup::{LookupError, LookupTable};
use thiserror::Error;

/// Errors from lookup table loading.
#[derive(Debug, Error)]
pub enum LookupLoadError {
    #[error("failed to read lookup table: {0}")]
    Read(#[from] FsError),

    #[error("invalid lookup table: {0}")]
    Parse(#[from] LookupError),
}

/// Load a lookup table from a file.
///
/// The whole load fails on the first schema, validation or CSV error; no
/// partially built table is returned.
pub fn load_lookup_table<F: Filesystem>(
    fs: &F,
    path: &Path,
) -> Result<LookupTable, LookupLoadError> {
    let reader = fs.open_read(path)?;
    Ok(LookupTable::from_reader(reader)?)
}
