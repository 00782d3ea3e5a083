//! Line encoding for the persisted dictionary file
//!
//! Each entry is stored as one UTF-8 line of the form `word: definition`.
//! Neither half is escaped, so a word containing `:` or a definition
//! containing a newline will not survive a round trip.

pub mod line;

pub use line::{FormatError, decode_line, encode_line};
