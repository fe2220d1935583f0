//! Error types for `fuzzfind`

use arrayvec::ArrayString;
use thiserror::Error;

/// Maximum length of error messages
pub const MAX_ERROR_LENGTH: usize = 256;

/// Custom result type for `fuzzfind` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `fuzzfind`
///
/// # Design
/// - Message buffers are stack-allocated with a fixed `MAX_ERROR_LENGTH`
/// - Non-matches and ignored entries are never errors; they are filtered
#[derive(Debug, Error)]
pub enum Error {
    /// IO operation failed while enumerating the file system
    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    /// A live scan accumulated more files than the configured ceiling
    #[error("Error: More than {0} files found during scan")]
    TooManyEntries(usize),

    /// Construction input was unusable with fixed-size message buffer
    #[error("Error: {0}")]
    Config(Box<ArrayString<MAX_ERROR_LENGTH>>),

    /// A query could not be compiled into a match pattern
    #[error("Error: {0}")]
    Pattern(Box<ArrayString<MAX_ERROR_LENGTH>>),
}

impl Error {
    /// Create a new configuration error
    ///
    /// # Design
    /// - Message buffer is fixed-size (`MAX_ERROR_LENGTH`)
    /// - Overlong messages are truncated, not rejected
    pub fn config(msg: &str) -> Self {
        let mut buf = ArrayString::new();
        let _ = buf.try_push_str(msg);
        Self::Config(Box::new(buf))
    }

    /// Create a new pattern compilation error
    pub fn pattern(msg: &str) -> Self {
        let mut buf = ArrayString::new();
        let _ = buf.try_push_str(msg);
        Self::Pattern(Box::new(buf))
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> ArrayString<MAX_ERROR_LENGTH> {
        let mut msg = ArrayString::new();
        match self {
            Self::Io(e) => {
                let _ = msg.try_push_str(&format!(
                    "Error: {e}\nTip: Check file permissions and try again"
                ));
            },
            Self::TooManyEntries(ceiling) => {
                let _ = msg.try_push_str(&format!(
                    "Error: Too many files (max {ceiling})\nTip: Raise the ceiling or scan a \
                     smaller directory"
                ));
            },
            Self::Config(config_msg) => {
                let _ = msg.try_push_str("Error: ");
                let _ = msg.try_push_str(config_msg);
                let _ = msg.try_push_str("\nTip: Check the scan roots and ignore patterns");
            },
            Self::Pattern(pattern_msg) => {
                let _ = msg.try_push_str("Error: ");
                let _ = msg.try_push_str(pattern_msg);
                let _ = msg.try_push_str("\nTip: Try simplifying your query");
            },
        }
        msg
    }
}
