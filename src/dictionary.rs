//! Dictionary facade
//!
//! Ties the [`Store`], the mutation [`Worker`] and the dictionary file
//! together into the four operations the HTTP and CLI layers use.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::{Entry, Store};
use crate::worker::{Worker, WorkerHandle};

pub struct Dictionary {
    store: Arc<Store>,
    worker: WorkerHandle,
    path: PathBuf,
    /// Serializes whole-file writes so two persists never interleave
    persist_lock: Mutex<()>,
}

impl Dictionary {
    /// Create an empty dictionary backed by `path` without reading it
    #[cfg(test)]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_store(Arc::new(Store::new()), path.into())
    }

    /// Open the dictionary at `path`, loading any entries already on disk
    ///
    /// A missing file yields an empty dictionary. A malformed line fails the
    /// open with [`Error::Format`].
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = Arc::new(Store::new());

        match store.hydrate(&path).await {
            Ok(loaded) => info!("Loaded {} entries from {}", loaded, path.display()),
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                info!("No dictionary file at {}, starting empty", path.display());
            }
            Err(e) => return Err(e),
        }

        Ok(Self::with_store(store, path))
    }

    fn with_store(store: Arc<Store>, path: PathBuf) -> Self {
        let (worker, _join) = Worker::spawn(Arc::clone(&store));
        Self {
            store,
            worker,
            path,
            persist_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Add or replace a word, then persist the whole dictionary
    ///
    /// On a persistence error the in-memory change is kept.
    pub async fn add(&self, word: &str, definition: &str) -> Result<String> {
        self.worker.submit_add(word, definition).await?;
        self.persist().await?;
        Ok(format!("Word '{}' Added successfully", word))
    }

    pub fn get(&self, word: &str) -> Result<Entry> {
        self.store.get(word)
    }

    /// Remove a word; an absent word is reported in the message, not as an error
    pub async fn remove(&self, word: &str) -> Result<String> {
        if self.worker.submit_remove(word).await?.is_none() {
            return Ok(format!("Word '{}' does not exist in the dictionary", word));
        }
        self.persist().await?;
        Ok(format!("Word '{}' removed successfully", word))
    }

    /// All words in unspecified order, plus a snapshot of every entry
    pub fn list(&self) -> (Vec<String>, HashMap<String, Entry>) {
        self.store.list()
    }

    async fn persist(&self) -> Result<()> {
        let _guard = self.persist_lock.lock().await;
        self.store.persist(&self.path).await?;
        debug!("Persisted {} entries to {}", self.store.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn word_set(words: Vec<String>) -> HashSet<String> {
        words.into_iter().collect()
    }

    #[tokio::test]
    async fn test_cat_and_dog() {
        let dir = tempfile::tempdir().unwrap();
        let dict = Dictionary::new(dir.path().join("dictionary.txt"));

        let message = dict.add("cat", "a small feline").await.unwrap();
        assert_eq!(message, "Word 'cat' Added successfully");
        assert_eq!(dict.get("cat").unwrap().definition, "a small feline");

        dict.add("dog", "a loyal companion").await.unwrap();
        let (words, _) = dict.list();
        assert_eq!(
            word_set(words),
            HashSet::from(["cat".to_string(), "dog".to_string()])
        );

        let message = dict.remove("cat").await.unwrap();
        assert_eq!(message, "Word 'cat' removed successfully");
        assert!(matches!(dict.get("cat"), Err(Error::WordNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_overwrites_previous_definition() {
        let dir = tempfile::tempdir().unwrap();
        let dict = Dictionary::new(dir.path().join("dictionary.txt"));

        dict.add("cat", "a small feline").await.unwrap();
        dict.add("cat", "a domestic animal").await.unwrap();

        assert_eq!(dict.get("cat").unwrap().definition, "a domestic animal");
        assert_eq!(dict.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_word() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");
        let dict = Dictionary::new(&path);

        let message = dict.remove("ghost").await.unwrap();
        assert_eq!(message, "Word 'ghost' does not exist in the dictionary");
        // nothing removed, nothing written
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_every_write_reaches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");
        let dict = Dictionary::new(&path);

        dict.add("cat", "a small feline").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "cat: a small feline\n"
        );

        dict.remove("cat").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test]
    async fn test_reopen_restores_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");

        {
            let dict = Dictionary::open(&path).await.unwrap();
            assert!(dict.is_empty());
            dict.add("cat", "a small feline").await.unwrap();
            dict.add("dog", "a loyal companion").await.unwrap();
            dict.add("owl", "a bird that hunts at night").await.unwrap();
            dict.remove("owl").await.unwrap();
        }

        let dict = Dictionary::open(&path).await.unwrap();
        let (words, snapshot) = dict.list();
        assert_eq!(
            word_set(words),
            HashSet::from(["cat".to_string(), "dog".to_string()])
        );
        assert_eq!(snapshot["dog"].definition, "a loyal companion");
    }

    #[tokio::test]
    async fn test_open_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");
        std::fs::write(&path, "cat: a small feline\nnot a valid line\n").unwrap();

        let result = Dictionary::open(&path).await;
        assert!(matches!(
            result,
            Err(Error::Format { line_number: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_add_fails_when_file_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be overwritten as a file
        let dict = Dictionary::new(dir.path());

        let result = dict.add("cat", "a small feline").await;
        assert!(matches!(result, Err(Error::Io(_))));
        // no rollback of the in-memory mutation
        assert_eq!(dict.get("cat").unwrap().definition, "a small feline");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_all_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");
        let dict = Arc::new(Dictionary::new(&path));

        let tasks = (0..50).map(|i| {
            let dict = Arc::clone(&dict);
            tokio::spawn(async move {
                dict.add(&format!("word{}", i), &format!("definition {}", i))
                    .await
            })
        });
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let (words, _) = dict.list();
        assert_eq!(words.len(), 50);

        let reloaded = Dictionary::open(&path).await.unwrap();
        assert_eq!(reloaded.list().1, dict.list().1);
    }
}
