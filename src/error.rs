use thiserror::Error;

use crate::encoding::FormatError;

/// Errors surfaced by the dictionary core
#[derive(Debug, Error)]
pub enum Error {
    /// Lookup miss
    #[error("word not found: {0}")]
    WordNotFound(String),

    /// Reading or writing the dictionary file failed
    #[error("dictionary file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted line could not be decoded; hydration stopped at this line
    #[error("invalid line format at line {line_number}: {source}")]
    Format {
        line_number: usize,
        #[source]
        source: FormatError,
    },

    /// The mutation worker is no longer receiving operations
    #[error("mutation worker has stopped")]
    WorkerStopped,
}

pub type Result<T> = std::result::Result<T, Error>;
