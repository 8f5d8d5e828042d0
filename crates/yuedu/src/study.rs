//! The `Study` context owning all in-memory state.

use crate::{
    error::{Error, Result},
    known::KnownWords,
    reading::ReadingSession,
    settings::{self, Settings},
    store::Store,
    texts::TextLibrary,
    vocabulary::VocabularyManager,
};
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::{OwnedMutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use yuedu_core::{FontSize, TextEntry, Word};

/// Handle to the study state shared by everything that reads or changes it.
///
/// Cloning is cheap and every clone refers to the same state and store.
pub struct Study<S> {
    store: Arc<S>,
    state: Arc<Mutex<StudyState>>,
    // single-word vocabulary mutations share this, bulk replacement takes it exclusively
    vocabulary_gate: Arc<RwLock<()>>,
    // mutations of the same hanzi run one at a time
    word_locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl<S> Clone for Study<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
            vocabulary_gate: Arc::clone(&self.vocabulary_gate),
            word_locks: Arc::clone(&self.word_locks),
        }
    }
}

impl<S> Debug for Study<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Study")
    }
}

#[derive(Debug, Default)]
pub(crate) struct StudyState {
    pub known: KnownWords,
    pub texts: Vec<TextEntry>,
    pub font_size: FontSize,
}

impl<S: Store> Study<S> {
    /// Loads the vocabulary, the text list and the font size from the store.
    pub async fn load(store: S) -> Result<Self> {
        let (words, texts, font_size) = tokio::try_join!(
            async {
                store
                    .get_all_words()
                    .await
                    .map_err(|err| Error::persistence("load vocabulary", err))
            },
            async {
                store
                    .get_all_texts()
                    .await
                    .map_err(|err| Error::persistence("load texts", err))
            },
            async {
                store
                    .get_setting(FontSize::KEY)
                    .await
                    .map_err(|err| Error::persistence("load font size", err))
            },
        )?;
        tracing::info!(
            "Loaded {} known words and {} texts",
            words.len(),
            texts.len()
        );
        let state = StudyState {
            known: KnownWords::new(words),
            texts,
            font_size: settings::font_size_from_entry(font_size.as_ref()),
        };
        Ok(Self {
            store: Arc::new(store),
            state: Arc::new(Mutex::new(state)),
            vocabulary_gate: Arc::new(RwLock::new(())),
            word_locks: Arc::default(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the hanzi is in the vocabulary, including optimistic additions.
    pub fn is_known(&self, hanzi: &str) -> bool {
        self.state().known.is_known(hanzi)
    }

    /// A snapshot of the vocabulary.
    pub fn known_words(&self) -> Vec<Word> {
        self.state().known.words().to_vec()
    }

    /// Changes whenever the vocabulary changes.
    pub fn vocabulary_version(&self) -> u64 {
        self.state().known.vocabulary().version()
    }

    pub fn font_size(&self) -> FontSize {
        self.state().font_size
    }

    pub fn vocabulary(&self) -> VocabularyManager<'_, S> {
        VocabularyManager::new(self)
    }

    pub fn texts(&self) -> TextLibrary<'_, S> {
        TextLibrary::new(self)
    }

    pub fn settings(&self) -> Settings<'_, S> {
        Settings::new(self)
    }

    pub fn reading_session(&self, text: TextEntry) -> ReadingSession<'_, S> {
        ReadingSession::new(self, text)
    }

    /// Locks the in-memory state. The guard must not be held across an `.await`.
    pub(crate) fn state(&self) -> MutexGuard<'_, StudyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) async fn shared_vocabulary_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.vocabulary_gate.read().await
    }

    pub(crate) async fn exclusive_vocabulary_gate(&self) -> RwLockWriteGuard<'_, ()> {
        self.vocabulary_gate.write().await
    }

    /// Waits until no other mutation of this hanzi is in flight.
    /// Take the shared vocabulary gate first.
    pub(crate) async fn lock_word(&self, hanzi: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.word_locks.lock().unwrap_or_else(PoisonError::into_inner);
            // drop locks nobody holds or waits for
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(hanzi.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::{test::FlakyStore, MemoryStore, SettingsStore, TextStore};
    use yuedu_core::SettingEntry;

    #[tokio::test]
    async fn loads_state_from_store() {
        let store = MemoryStore::with_words(vec![Word::new("猫", "māo", "cat")]);
        store
            .put_setting(&SettingEntry {
                key: FontSize::KEY.to_string(),
                value: serde_json::json!(28),
            })
            .await
            .unwrap();
        store
            .add_text(&TextEntry {
                id: "a".to_string(),
                title: "Cat".to_string(),
                content: "[]".to_string(),
            })
            .await
            .unwrap();

        let study = Study::load(store).await.unwrap();
        assert!(study.is_known("猫"));
        assert_eq!(study.font_size().get(), 28);
        assert_eq!(study.texts().list().len(), 1);
    }

    #[tokio::test]
    async fn defaults_font_size() {
        let study = Study::load(MemoryStore::new()).await.unwrap();
        assert_eq!(study.font_size(), FontSize::default());
        assert!(study.known_words().is_empty());
    }

    #[tokio::test]
    async fn reports_load_failures() {
        let store = FlakyStore::default();
        store.fail_reads(true);
        let err = Study::load(store).await.unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let study = Study::load(MemoryStore::new()).await.unwrap();
        let other = study.clone();
        let version = study.vocabulary_version();
        other
            .reading_session(TextEntry {
                id: "a".to_string(),
                title: "Cat".to_string(),
                content: "[]".to_string(),
            })
            .mark_known(&Word::new("猫", "māo", "cat"))
            .await
            .unwrap();
        assert!(study.is_known("猫"));
        assert!(study.vocabulary_version() > version);
    }
}
