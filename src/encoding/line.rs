//! `word: definition` line encoding/decoding

use std::fmt;

use crate::store::Entry;

/// Separator between word and definition
pub const SEPARATOR: char = ':';

/// Encode one entry as a persisted line (without the trailing newline)
pub fn encode_line(word: &str, entry: &Entry) -> String {
    format!("{}{} {}", word, SEPARATOR, entry.definition)
}

/// Decode a persisted line into `(word, definition)`
///
/// Splits on the first separator only; both halves are trimmed.
pub fn decode_line(line: &str) -> Result<(String, String), FormatError> {
    match line.split_once(SEPARATOR) {
        Some((word, definition)) => Ok((word.trim().to_string(), definition.trim().to_string())),
        None => Err(FormatError::MissingSeparator(line.to_string())),
    }
}

/// Errors that can occur during decoding
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Line has no `:` separator
    MissingSeparator(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::MissingSeparator(line) => write!(f, "missing ':' in {:?}", line),
        }
    }
}

impl std::error::Error for FormatError {}
