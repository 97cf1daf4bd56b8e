//! Error types for the simulator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for simulator operations
pub type SimResult<T> = std::result::Result<T, SimError>;

/// Simulator error types
#[derive(Error, Debug)]
pub enum SimError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input or random file
    #[error("{}: {cause}", location(.file, .line))]
    Parse {
        /// File being parsed
        file: PathBuf,
        /// 1-based line number, when known
        line: Option<usize>,
        /// What went wrong
        cause: String,
    },

    /// Unknown replacement-policy letter on the command line
    #[error("unknown replacement policy '{0}'")]
    UnknownPolicy(String),

    /// Unknown output-option letter on the command line
    #[error("unknown output option '{0}'")]
    UnknownOption(char),

    /// Frame count outside the supported range
    #[error("frame count {0} out of range 1..={max}", max = crate::MAX_FRAMES)]
    InvalidFrameCount(usize),

    /// Random policy selected but the random file holds no values
    #[error("random file {0} contains no values")]
    EmptyRandomPool(PathBuf),

    /// Internal invariant violated; indicates a bug, not user error
    #[error("invariant violated: {0}")]
    Invariant(String),
}

fn location(file: &std::path::Path, line: &Option<usize>) -> String {
    match line {
        Some(l) => format!("{}:{l}", file.display()),
        None => file.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_error_display_with_line() {
        let err = SimError::Parse {
            file: PathBuf::from("input.txt"),
            line: Some(7),
            cause: "invalid number: abc".to_string(),
        };
        assert_eq!(err.to_string(), "input.txt:7: invalid number: abc");
    }

    #[test]
    fn test_parse_error_display_without_line() {
        let err = SimError::Parse {
            file: PathBuf::from("input.txt"),
            line: None,
            cause: "missing process count".to_string(),
        };
        assert_eq!(err.to_string(), "input.txt: missing process count");
    }

    #[test]
    fn test_unknown_policy_display() {
        let err = SimError::UnknownPolicy("z".to_string());
        assert_eq!(err.to_string(), "unknown replacement policy 'z'");
    }

    #[test]
    fn test_unknown_option_display() {
        let err = SimError::UnknownOption('q');
        assert_eq!(err.to_string(), "unknown output option 'q'");
    }

    #[test]
    fn test_invalid_frame_count_display() {
        let err = SimError::InvalidFrameCount(500);
        assert_eq!(err.to_string(), "frame count 500 out of range 1..=128");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SimError = io_err.into();
        assert!(err.to_string().contains("file missing"));
    }
}
