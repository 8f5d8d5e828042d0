//! The persistent tables Yuedu reads from and writes to.

use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use yuedu_core::{SettingEntry, TextEntry, Word};

pub type StoreResult<T> = Result<T, StoreError>;

/// The vocabulary table, keyed by `hanzi`.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// All words in the order they were first added.
    async fn get_all_words(&self) -> StoreResult<Vec<Word>>;

    /// Inserts the word or overwrites the row with the same `hanzi`.
    async fn put_word(&self, word: &Word) -> StoreResult<()>;

    /// Deleting a missing `hanzi` is not an error.
    async fn delete_word(&self, hanzi: &str) -> StoreResult<()>;

    async fn clear_words(&self) -> StoreResult<()>;

    async fn bulk_add_words(&self, words: &[Word]) -> StoreResult<()>;

    /// Replaces the whole table.
    ///
    /// The default clears and then adds, so a failed add leaves the table empty.
    /// Stores that can swap the table in one step should override this.
    async fn replace_words(&self, words: &[Word]) -> StoreResult<()> {
        self.clear_words().await?;
        self.bulk_add_words(words).await
    }
}

/// The text table, keyed by `id`.
#[async_trait]
pub trait TextStore: Send + Sync {
    /// All texts in the order they were added.
    async fn get_all_texts(&self) -> StoreResult<Vec<TextEntry>>;

    async fn get_text(&self, id: &str) -> StoreResult<Option<TextEntry>>;

    async fn add_text(&self, text: &TextEntry) -> StoreResult<()>;

    /// Deleting a missing `id` is not an error.
    async fn delete_text(&self, id: &str) -> StoreResult<()>;
}

/// The settings table, keyed by `key`.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(&self, key: &str) -> StoreResult<Option<SettingEntry>>;

    async fn put_setting(&self, entry: &SettingEntry) -> StoreResult<()>;
}

/// Everything a [`Study`](crate::Study) needs from persistence.
pub trait Store: WordStore + TextStore + SettingsStore + 'static {}

impl<T> Store for T where T: WordStore + TextStore + SettingsStore + 'static {}

/// A store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    vocabulary: Vec<Word>,
    texts: Vec<TextEntry>,
    settings: Vec<SettingEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words(words: Vec<Word>) -> Self {
        let store = Self::new();
        for word in words {
            store.tables().upsert_word(word);
        }
        store
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Tables {
    fn upsert_word(&mut self, word: Word) {
        match self.vocabulary.iter_mut().find(|w| w.hanzi == word.hanzi) {
            Some(existing) => *existing = word,
            None => self.vocabulary.push(word),
        }
    }
}

#[async_trait]
impl WordStore for MemoryStore {
    async fn get_all_words(&self) -> StoreResult<Vec<Word>> {
        Ok(self.tables().vocabulary.clone())
    }

    async fn put_word(&self, word: &Word) -> StoreResult<()> {
        self.tables().upsert_word(word.clone());
        Ok(())
    }

    async fn delete_word(&self, hanzi: &str) -> StoreResult<()> {
        self.tables().vocabulary.retain(|w| w.hanzi != hanzi);
        Ok(())
    }

    async fn clear_words(&self) -> StoreResult<()> {
        self.tables().vocabulary.clear();
        Ok(())
    }

    async fn bulk_add_words(&self, words: &[Word]) -> StoreResult<()> {
        let mut tables = self.tables();
        for word in words {
            tables.upsert_word(word.clone());
        }
        Ok(())
    }

    async fn replace_words(&self, words: &[Word]) -> StoreResult<()> {
        let mut tables = self.tables();
        tables.vocabulary.clear();
        for word in words {
            tables.upsert_word(word.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl TextStore for MemoryStore {
    async fn get_all_texts(&self) -> StoreResult<Vec<TextEntry>> {
        Ok(self.tables().texts.clone())
    }

    async fn get_text(&self, id: &str) -> StoreResult<Option<TextEntry>> {
        Ok(self.tables().texts.iter().find(|t| t.id == id).cloned())
    }

    async fn add_text(&self, text: &TextEntry) -> StoreResult<()> {
        let mut tables = self.tables();
        if tables.texts.iter().any(|t| t.id == text.id) {
            return Err(StoreError::new(format!(
                "A text with the id {} already exists",
                text.id
            )));
        }
        tables.texts.push(text.clone());
        Ok(())
    }

    async fn delete_text(&self, id: &str) -> StoreResult<()> {
        self.tables().texts.retain(|t| t.id != id);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_setting(&self, key: &str) -> StoreResult<Option<SettingEntry>> {
        Ok(self.tables().settings.iter().find(|s| s.key == key).cloned())
    }

    async fn put_setting(&self, entry: &SettingEntry) -> StoreResult<()> {
        let mut tables = self.tables();
        match tables.settings.iter_mut().find(|s| s.key == entry.key) {
            Some(existing) => *existing = entry.clone(),
            None => tables.settings.push(entry.clone()),
        }
        Ok(())
    }
}
