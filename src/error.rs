/// Crate-level error types for reflink diagnostics.
use std::path::PathBuf;

use crate::types::Position;

/// All errors in reflink carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, position, or input at fault.
#[allow(clippy::error_impl_error, reason = "single crate-wide error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An edit addressed a line that does not exist in the document.
    #[error("edit out of bounds: line {} (document has {line_count} lines)", position.line)]
    EditOutOfBounds {
        /// Number of lines in the document when the edit was rejected.
        line_count: usize,
        /// The offending position.
        position: Position,
    },

    /// A markdown file given on the command line does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A definition line carries an index too large to represent.
    #[error("reference index out of range on line {line}: `{text}`")]
    IndexOverflow {
        /// Zero-based line number of the definition.
        line: usize,
        /// Raw index text between the brackets.
        text: String,
    },

    /// A selection argument could not be parsed.
    #[error("invalid selection `{input}`: {reason}")]
    InvalidSelection {
        /// The raw argument.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A URL supplied without prompting failed the shape check.
    #[error("invalid url: `{url}`")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// Underlying I/O error from the filesystem or terminal.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// The host reported no selections to convert.
    #[error("no selection to convert")]
    NoSelection,

    /// Two edits in one batch touch the same text.
    #[error("overlapping edits at line {}, character {}", position.line, position.character)]
    OverlappingEdits {
        /// Start of the later of the two overlapping edits.
        position: Position,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
