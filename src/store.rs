use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::encoding::{decode_line, encode_line};
use crate::error::{Error, Result};

/// Definition stored for one word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub definition: String,
}

impl Entry {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.definition)
    }
}

/// A single mutation waiting to be applied to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Add { word: String, definition: String },
    Remove { word: String },
}

impl Operation {
    pub fn word(&self) -> &str {
        match self {
            Operation::Add { word, .. } | Operation::Remove { word } => word,
        }
    }
}

/// In-memory word store
///
/// Readers take the read lock directly. Mutations go through [`Store::apply`],
/// which in normal operation is only called by the mutation worker, so the
/// lock never sees two writers racing each other. The lock is never held
/// across file I/O.
pub struct Store {
    data: RwLock<HashMap<String, Entry>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a copy of the entry for a word
    pub fn get(&self, word: &str) -> Result<Entry> {
        self.read()
            .get(word)
            .cloned()
            .ok_or_else(|| Error::WordNotFound(word.to_string()))
    }

    /// All words in unspecified order, plus a snapshot of the map
    pub fn list(&self) -> (Vec<String>, HashMap<String, Entry>) {
        let snapshot = self.read().clone();
        let words = snapshot.keys().cloned().collect();
        (words, snapshot)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Apply one operation, returning the entry previously stored for the word
    ///
    /// Add replaces any existing entry. Remove of an absent word does nothing.
    pub fn apply(&self, op: Operation) -> Option<Entry> {
        let mut data = self.write();
        match op {
            Operation::Add { word, definition } => data.insert(word, Entry::new(definition)),
            Operation::Remove { word } => data.remove(&word),
        }
    }

    /// Render every entry as `word: definition` lines, in map order
    fn render(&self) -> String {
        let data = self.read();
        let mut out = String::new();
        for (word, entry) in data.iter() {
            out.push_str(&encode_line(word, entry));
            out.push('\n');
        }
        out
    }

    /// Write the whole store to `path`, truncating whatever was there
    pub async fn persist(&self, path: &Path) -> Result<()> {
        let contents = self.render();
        tokio::fs::write(path, contents).await?;
        Ok(())
    }

    /// Load entries from a persisted file straight into the map
    ///
    /// Blank lines are skipped. The first malformed line aborts the load;
    /// entries from earlier lines stay in the store and later lines are not
    /// read. Returns the number of entries loaded.
    pub async fn hydrate(&self, path: &Path) -> Result<usize> {
        let contents = tokio::fs::read_to_string(path).await?;

        let mut loaded = 0;
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (word, definition) = decode_line(line).map_err(|source| Error::Format {
                line_number: idx + 1,
                source,
            })?;
            self.write().insert(word, Entry::new(definition));
            loaded += 1;
        }

        Ok(loaded)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
