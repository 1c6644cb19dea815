//! Filesystem trait and implementations.
//!
//! Inputs are streamed through a buffered reader. Outputs are written with temp-then-rename so
//! a reader never observes a half-written report.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors from filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("path error: {0}")]
    Path(String),
}

/// Trait for filesystem operations.
/// Abstracted for testing with mock implementations.
pub trait Filesystem: Send + Sync {
    /// Write data atomically to a path (write to temp, then rename).
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError>;

    /// Open a file for buffered, line-oriented reading.
    fn open_read(&self, path: &Path) -> Result<Box<dyn BufRead>, FsError>;

    /// Remove a file.
    fn remove(&self, path: &Path) -> Result<(), FsError>;

    /// Check if a path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create directory and parents if needed.
    fn create_dir_all(&self, path: &Path) -> Result<(), FsError>;
}

/// Temp path used by `write_atomic`: the target file name with `.tmp` appended.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        if path.file_name().is_none() {
            return Err(FsError::Path(format!(
                "not a file path: {}",
                path.display()
            )));
        }

        let temp = temp_path(path);
        fs::write(&temp, data)?;

        // Rename is atomic on most filesystems
        if let Err(e) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        Ok(())
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn BufRead>, FsError> {
        let file = fs::File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir_all(path)?;
        Ok(())
    }
}

/// Mock filesystem for testing.
/// Cloning creates a new handle to the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MockFilesystem {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<HashSet<PathBuf>>>,
    failing_writes: Arc<RwLock<HashSet<PathBuf>>>,
    failing_removes: Arc<RwLock<HashSet<PathBuf>>>,
}

impl MockFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all files in the mock filesystem.
    pub fn files(&self) -> HashMap<PathBuf, Vec<u8>> {
        self.files.read().unwrap().clone()
    }

    /// Get content of a specific file.
    pub fn get_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// Get content of a specific file as UTF-8 text.
    pub fn get_text(&self, path: &Path) -> Option<String> {
        self.get_file(path)
            .map(|data| String::from_utf8_lossy(&data).into_owned())
    }

    /// Add a file directly (for test setup).
    pub fn add_file(&self, path: PathBuf, data: Vec<u8>) {
        self.files.write().unwrap().insert(path, data);
    }

    /// Add a directory directly (for test setup).
    pub fn add_dir(&self, path: PathBuf) {
        self.dirs.write().unwrap().insert(path);
    }

    /// Check whether a directory was created or added.
    pub fn has_dir(&self, path: &Path) -> bool {
        self.dirs.read().unwrap().contains(path)
    }

    /// Make every subsequent `write_atomic` to `path` fail.
    pub fn fail_writes_to(&self, path: PathBuf) {
        self.failing_writes.write().unwrap().insert(path);
    }

    /// Make every subsequent `remove` of `path` fail.
    pub fn fail_removes_to(&self, path: PathBuf) {
        self.failing_removes.write().unwrap().insert(path);
    }

    fn not_found(path: &Path) -> FsError {
        FsError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        ))
    }
}

impl Filesystem for MockFilesystem {
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        if self.failing_writes.read().unwrap().contains(path) {
            return Err(FsError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("write refused: {}", path.display()),
            )));
        }
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn BufRead>, FsError> {
        let files = self.files.read().unwrap();
        match files.get(path) {
            Some(data) => Ok(Box::new(Cursor::new(data.clone()))),
            None => Err(Self::not_found(path)),
        }
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        if self.failing_removes.read().unwrap().contains(path) {
            return Err(FsError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("remove refused: {}", path.display()),
            )));
        }
        self.files.write().unwrap().remove(path);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        self.dirs.write().unwrap().insert(path.to_path_buf());
        Ok(())
    }
}
