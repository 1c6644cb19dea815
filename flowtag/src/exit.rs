//! Exit codes for the flowtag CLI.

use crate::commands::CommandError;
use crate::io::LookupLoadError;

/// Exit code constants.
pub mod codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Invalid arguments.
    pub const INVALID_ARGS: i32 = 1;
    /// Read or write failure.
    pub const IO_ERROR: i32 = 2;
    /// Flow log or lookup table does not exist.
    pub const SOURCE_NOT_FOUND: i32 = 3;
    /// Lookup table schema, validation or CSV error.
    pub const LOOKUP_ERROR: i32 = 4;
    /// Report rendering failed.
    pub const REPORT_ERROR: i32 = 5;
}

/// Map a CommandError to an exit code.
pub fn exit_code(error: &CommandError) -> i32 {
    match error {
        CommandError::InvalidArgument(_) => codes::INVALID_ARGS,
        CommandError::SourceNotFound(_) => codes::SOURCE_NOT_FOUND,
        CommandError::Lookup(LookupLoadError::Read(_)) => codes::IO_ERROR,
        CommandError::Lookup(LookupLoadError::Parse(_)) => codes::LOOKUP_ERROR,
        CommandError::Ingest(_) => codes::IO_ERROR,
        CommandError::Report(_) => codes::REPORT_ERROR,
        CommandError::Output(_) => codes::IO_ERROR,
        CommandError::Filesystem(_) => codes::IO_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliError;
    use crate::io::OutputWriterError;
    use flowtag_fs::FsError;
    use flowtag_reporter::{IngestError, LookupError};
    use std::path::PathBuf;

    fn io_error() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, "boom")
    }

    #[test]
    fn test_exit_code_invalid_argument() {
        let error = CommandError::InvalidArgument(CliError::EmptyFileName("tag-counts-file"));
        assert_eq!(exit_code(&error), codes::INVALID_ARGS);
    }

    #[test]
    fn test_exit_code_source_not_found() {
        let error = CommandError::SourceNotFound(PathBuf::from("/missing.csv"));
        assert_eq!(exit_code(&error), codes::SOURCE_NOT_FOUND);
    }

    #[test]
    fn test_exit_code_lookup_read_is_io() {
        let error = CommandError::Lookup(LookupLoadError::Read(FsError::Path("x".to_string())));
        assert_eq!(exit_code(&error), codes::IO_ERROR);
    }

    #[test]
    fn test_exit_code_lookup_parse() {
        let error = CommandError::Lookup(LookupLoadError::Parse(LookupError::Schema {
            missing: vec!["tag".to_string()],
        }));
        assert_eq!(exit_code(&error), codes::LOOKUP_ERROR);
    }

    #[test]
    fn test_exit_code_ingest() {
        let error = CommandError::Ingest(IngestError::Read {
            source_name: "flows.log".to_string(),
            line: 3,
            source: io_error(),
        });
        assert_eq!(exit_code(&error), codes::IO_ERROR);
    }

    #[test]
    fn test_exit_code_output() {
        let error = CommandError::Output(OutputWriterError::CreateDir(FsError::Io(io_error())));
        assert_eq!(exit_code(&error), codes::IO_ERROR);
    }

    #[test]
    fn test_exit_codes_constants() {
        assert_eq!(codes::SUCCESS, 0);
        assert_eq!(codes::INVALID_ARGS, 1);
        assert_eq!(codes::IO_ERROR, 2);
        assert_eq!(codes::SOURCE_NOT_FOUND, 3);
        assert_eq!(codes::LOOKUP_ERROR, 4);
        assert_eq!(codes::REPORT_ERROR, 5);
    }
}
