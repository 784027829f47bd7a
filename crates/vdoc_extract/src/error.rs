//! Error types for extraction.

use std::path::PathBuf;

use vdoc_parser::ParseError;

/// Errors that can occur while extracting declarations from a file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The source file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The source file was read but failed to parse.
    #[error("{path}: {source}")]
    Parse {
        /// The path of the failing file.
        path: PathBuf,
        /// The underlying parse error.
        source: ParseError,
    },
}

impl ExtractError {
    /// Returns the path of the file that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ExtractError::Read { path, .. } | ExtractError::Parse { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_display() {
        let err = ExtractError::Read {
            path: PathBuf::from("rtl/uart.v"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cannot read"));
        assert!(msg.contains("uart.v"));
        assert_eq!(err.path(), std::path::Path::new("rtl/uart.v"));
    }

    #[test]
    fn parse_error_display_carries_path_and_line() {
        let err = ExtractError::Parse {
            path: PathBuf::from("top.v"),
            source: ParseError::UnmatchedEndif { line: 7 },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("top.v: "));
        assert!(msg.contains("line 7"));
    }
}
