//! Filesystem abstraction for flowtag.
//!
//! This crate provides:
//! - Filesystem trait for reading inputs and atomically writing reports
//! - RealFilesystem backed by `std::fs`
//! - MockFilesystem for deterministic tests, with write and remove failure injection

pub mod filesystem;

pub use filesystem::{temp_path, Filesystem, FsError, MockFilesystem, RealFilesystem};
