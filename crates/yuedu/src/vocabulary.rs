//! Managing the vocabulary as a whole.

use crate::{
    error::{Error, Result, ValidationError},
    store::Store,
    study::Study,
    text,
};
use std::collections::HashMap;
use yuedu_core::Word;

/// File name suggested for vocabulary exports.
pub const EXPORT_FILE_NAME: &str = "vocabulary.json";

pub struct VocabularyManager<'a, S> {
    study: &'a Study<S>,
}

impl<'a, S: Store> VocabularyManager<'a, S> {
    pub fn new(study: &'a Study<S>) -> Self {
        Self { study }
    }

    /// Every known word in the order it was added.
    pub fn list(&self) -> Vec<Word> {
        self.study.known_words()
    }

    /// Words whose hanzi, pinyin or translation contains the query, ignoring case.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<Word> {
        let words = self.list();
        if query.is_empty() {
            return words;
        }
        let query = query.to_lowercase();
        words
            .into_iter()
            .filter(|w| {
                [&w.hanzi, &w.pinyin, &w.translation]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Removes a word from the vocabulary. Returns whether it was present.
    ///
    /// The word disappears immediately and is put back in its old place if
    /// the deletion cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn delete_word(&self, hanzi: &str) -> Result<bool> {
        let _gate = self.study.shared_vocabulary_gate().await;
        let _word = self.study.lock_word(hanzi).await;
        let Some((idx, word)) = self.study.state().known.remove(hanzi) else {
            tracing::debug!("{hanzi} is not in the vocabulary");
            return Ok(false);
        };

        match self.study.store().delete_word(hanzi).await {
            Ok(()) => {
                tracing::info!("Deleted {hanzi} from the vocabulary");
                Ok(true)
            }
            Err(err) => {
                tracing::error!("Failed to delete {hanzi}, rolling back: {err}");
                self.study.state().known.restore(idx, word);
                Err(Error::persistence(format!("delete word {hanzi}"), err))
            }
        }
    }

    /// Replaces the whole vocabulary with the given words.
    ///
    /// Every word must have non-empty hanzi, pinyin and translation, otherwise
    /// nothing changes. Later duplicates of a hanzi overwrite earlier ones.
    #[tracing::instrument(skip_all, fields(words = words.len()))]
    pub async fn bulk_import(&self, words: &[Word]) -> Result<()> {
        let words = validate(words)?;

        let _gate = self.study.exclusive_vocabulary_gate().await;
        let previous = self.study.state().known.replace(words.clone());
        if let Err(err) = self.study.store().replace_words(&words).await {
            tracing::error!("Failed to import vocabulary, rolling back: {err}");
            self.study.state().known.replace(previous.clone());
            if let Err(restore_err) = self.study.store().replace_words(&previous).await {
                tracing::error!("Failed to restore the previous vocabulary: {restore_err}");
            }
            return Err(Error::persistence("import vocabulary", err));
        }

        tracing::info!("Imported {} words", words.len());
        Ok(())
    }

    /// Parses a JSON payload from an untrusted source and imports it.
    pub async fn import_json(&self, payload: &str) -> Result<()> {
        let words = text::parse_words_strict(payload)?;
        self.bulk_import(&words).await
    }

    /// The vocabulary as pretty JSON, in a form `import_json` accepts.
    pub fn export(&self) -> String {
        text::serialize(&self.list())
    }
}

// checks fields and collapses duplicate hanzi, keeping the first position and the last value
fn validate(words: &[Word]) -> Result<Vec<Word>, ValidationError> {
    let mut deduplicated = Vec::<Word>::with_capacity(words.len());
    let mut positions = HashMap::<&str, usize>::new();
    for (index, word) in words.iter().enumerate() {
        for (field, value) in [
            ("hanzi", &word.hanzi),
            ("pinyin", &word.pinyin),
            ("translation", &word.translation),
        ] {
            if value.is_empty() {
                return Err(ValidationError::MissingField { index, field });
            }
        }
        match positions.get(word.hanzi.as_str()) {
            Some(&position) => deduplicated[position] = word.clone(),
            None => {
                positions.insert(&word.hanzi, deduplicated.len());
                deduplicated.push(word.clone());
            }
        }
    }
    Ok(deduplicated)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::{test::FlakyStore, MemoryStore, WordStore};
    use std::time::Duration;

    fn greetings() -> Vec<Word> {
        vec![
            Word::new("你好", "nǐhǎo", "hello"),
            Word::new("谢谢", "xièxie", "thanks"),
        ]
    }

    #[tokio::test]
    async fn searches_any_field() {
        let study = Study::load(MemoryStore::with_words(greetings()))
            .await
            .unwrap();
        let vocabulary = study.vocabulary();
        assert_eq!(vocabulary.search("hello"), vec![greetings()[0].clone()]);
        assert_eq!(vocabulary.search(""), greetings());
        assert_eq!(vocabulary.search("XIÈ"), vec![greetings()[1].clone()]);
        assert_eq!(vocabulary.search("谢"), vec![greetings()[1].clone()]);
        assert!(vocabulary.search("goodbye").is_empty());
    }

    #[tokio::test]
    async fn deletes_word() {
        let study = Study::load(MemoryStore::with_words(greetings()))
            .await
            .unwrap();
        assert!(study.vocabulary().delete_word("你好").await.unwrap());
        assert_eq!(study.vocabulary().list(), vec![greetings()[1].clone()]);
        assert_eq!(
            study.store().get_all_words().await.unwrap(),
            vec![greetings()[1].clone()]
        );
    }

    #[tokio::test]
    async fn deleting_missing_word_is_noop() {
        let study = Study::load(MemoryStore::with_words(greetings()))
            .await
            .unwrap();
        assert!(!study.vocabulary().delete_word("猫").await.unwrap());
        assert_eq!(study.vocabulary().list(), greetings());
    }

    #[tokio::test]
    async fn restores_word_when_delete_fails() {
        let study = Study::load(FlakyStore::with_words(greetings()))
            .await
            .unwrap();
        study.store().fail_writes(true);
        let err = study.vocabulary().delete_word("你好").await.unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
        assert_eq!(study.vocabulary().list(), greetings());
        assert!(study.is_known("你好"));
    }

    #[tokio::test]
    async fn round_trips_through_export() {
        let words = vec![Word::new("我", "wǒ", "I"), Word::new("爱", "ài", "love")];
        let study = Study::load(MemoryStore::with_words(words.clone()))
            .await
            .unwrap();
        let exported = study.vocabulary().export();

        let other = Study::load(MemoryStore::with_words(greetings()))
            .await
            .unwrap();
        other
            .vocabulary()
            .bulk_import(&text::parse(&exported))
            .await
            .unwrap();
        assert_eq!(other.vocabulary().list(), words);
        assert_eq!(other.store().get_all_words().await.unwrap(), words);
        other.vocabulary().import_json(&exported).await.unwrap();
        assert_eq!(other.vocabulary().list(), words);
    }

    #[tokio::test]
    async fn exports_pretty_json() {
        let study = Study::load(MemoryStore::with_words(vec![Word::new("我", "wǒ", "I")]))
            .await
            .unwrap();
        assert_eq!(
            study.vocabulary().export(),
            "[\n  {\n    \"hanzi\": \"我\",\n    \"pinyin\": \"wǒ\",\n    \"translation\": \"I\"\n  }\n]"
        );
    }

    #[tokio::test]
    async fn rejects_invalid_import_entirely() {
        let study = Study::load(MemoryStore::with_words(greetings()))
            .await
            .unwrap();
        let version = study.vocabulary_version();
        let err = study
            .vocabulary()
            .import_json(r#"[{"hanzi":"a","pinyin":"","translation":""},{"bad":"shape"}]"#)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(study.vocabulary().list(), greetings());
        assert_eq!(study.vocabulary_version(), version);
        assert_eq!(study.store().get_all_words().await.unwrap(), greetings());

        let err = study
            .vocabulary()
            .bulk_import(&[Word::new("猫", "māo", "cat"), Word::new("狗", "", "dog")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField {
                index: 1,
                field: "pinyin"
            })
        ));
        assert_eq!(study.vocabulary().list(), greetings());
    }

    #[tokio::test]
    async fn later_duplicates_win() {
        let study = Study::load(MemoryStore::new()).await.unwrap();
        study
            .vocabulary()
            .bulk_import(&[
                Word::new("猫", "māo", "cat"),
                Word::new("狗", "gǒu", "dog"),
                Word::new("猫", "māo", "kitty"),
            ])
            .await
            .unwrap();
        assert_eq!(
            study.vocabulary().list(),
            vec![Word::new("猫", "māo", "kitty"), Word::new("狗", "gǒu", "dog")]
        );
    }

    #[tokio::test]
    async fn rolls_back_failed_import() {
        let study = Study::load(FlakyStore::with_words(greetings()).with_atomic_replace())
            .await
            .unwrap();
        study.store().fail_writes(true);
        let err = study
            .vocabulary()
            .bulk_import(&[Word::new("猫", "māo", "cat")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
        assert_eq!(study.vocabulary().list(), greetings());
        assert!(!study.is_known("猫"));

        study.store().fail_writes(false);
        assert_eq!(study.store().get_all_words().await.unwrap(), greetings());
    }

    #[tokio::test]
    async fn failed_import_into_two_step_store_restores_memory() {
        let study = Study::load(FlakyStore::with_words(greetings()))
            .await
            .unwrap();
        study.store().fail_writes(true);
        let err = study
            .vocabulary()
            .bulk_import(&[Word::new("猫", "māo", "cat")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
        assert_eq!(study.vocabulary().list(), greetings());

        // without an atomic replace the clear went through and the restore failed too
        study.store().fail_writes(false);
        assert!(study.store().get_all_words().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_waits_for_save_of_same_word() {
        let cat = Word::new("猫", "māo", "cat");
        let store = FlakyStore::default();
        store.delay_put("猫", Duration::from_millis(20));
        let study = Study::load(store).await.unwrap();
        let session = study.reading_session(crate::TextEntry {
            id: "text".to_string(),
            title: "Text".to_string(),
            content: text::serialize(&[cat.clone()]),
        });
        let vocabulary = study.vocabulary();

        let (marked, deleted) = tokio::join!(session.mark_known(&cat), async {
            tokio::task::yield_now().await;
            vocabulary.delete_word("猫").await
        });
        assert_eq!(marked.unwrap(), crate::MarkKnown::Marked);
        assert!(deleted.unwrap());
        assert!(study.vocabulary().list().is_empty());
        assert!(study.store().get_all_words().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_serializes_with_single_word_changes() {
        let study = Study::load(MemoryStore::new()).await.unwrap();
        let cat = Word::new("猫", "māo", "cat");
        let session = study.reading_session(crate::TextEntry {
            id: "text".to_string(),
            title: "Text".to_string(),
            content: text::serialize(&[cat.clone()]),
        });
        let vocabulary = study.vocabulary();
        let greetings = greetings();
        let (marked, imported) = tokio::join!(
            session.mark_known(&cat),
            vocabulary.bulk_import(&greetings)
        );
        marked.unwrap();
        imported.unwrap();

        // whichever ran last decides, but memory and store always agree
        let mut in_memory = study.vocabulary().list();
        let mut stored = study.store().get_all_words().await.unwrap();
        in_memory.sort_by(|a, b| a.hanzi.cmp(&b.hanzi));
        stored.sort_by(|a, b| a.hanzi.cmp(&b.hanzi));
        assert_eq!(in_memory, stored);
    }
}
