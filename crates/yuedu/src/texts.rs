//! The library of imported texts.

use crate::{
    error::{Error, Result, TextImportError},
    reading::ReadingSession,
    store::Store,
    study::Study,
    text,
};
use serde::{Deserialize, Serialize};
use yuedu_core::{TextEntry, Word};

/// A text as shown in the text list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
}

impl From<&TextEntry> for TextSummary {
    fn from(text: &TextEntry) -> Self {
        Self {
            id: text.id.clone(),
            title: text.title.clone(),
            preview: text::preview(&text::parse(&text.content)),
        }
    }
}

pub struct TextLibrary<'a, S> {
    study: &'a Study<S>,
}

impl<'a, S: Store> TextLibrary<'a, S> {
    pub fn new(study: &'a Study<S>) -> Self {
        Self { study }
    }

    /// Every text in the order they were imported.
    pub fn list(&self) -> Vec<TextSummary> {
        self.study.state().texts.iter().map(Into::into).collect()
    }

    /// Stores a new text made of the given words.
    #[tracing::instrument(skip(self, words), fields(words = words.len()))]
    pub async fn import_words(&self, title: &str, words: &[Word]) -> Result<TextEntry> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TextImportError::EmptyTitle.into());
        }
        if words.is_empty() {
            return Err(TextImportError::NoSegments.into());
        }

        let text = TextEntry {
            id: new_text_id(),
            title: title.to_string(),
            content: text::serialize(words),
        };
        self.study
            .store()
            .add_text(&text)
            .await
            .map_err(|err| Error::persistence(format!("save text {title}"), err))?;
        self.study.state().texts.push(text.clone());
        tracing::info!("Imported text {} with {} words", text.id, words.len());
        Ok(text)
    }

    /// Stores a new text from parallel `|`-separated Mandarin, pinyin and English fields.
    pub async fn import_segments(
        &self,
        title: &str,
        mandarin: &str,
        pinyin: &str,
        english: &str,
    ) -> Result<TextEntry> {
        if title.trim().is_empty() {
            return Err(TextImportError::EmptyTitle.into());
        }
        let words = text::from_segments(mandarin, pinyin, english)?;
        self.import_words(title, &words).await
    }

    /// Fetches a text from the store.
    pub async fn get(&self, id: &str) -> Result<TextEntry> {
        self.study
            .store()
            .get_text(id)
            .await
            .map_err(|err| Error::persistence(format!("load text {id}"), err))?
            .ok_or_else(|| Error::TextNotFound(id.to_string()))
    }

    /// Opens a text for reading.
    pub async fn open(&self, id: &str) -> Result<ReadingSession<'a, S>> {
        let text = self.get(id).await?;
        Ok(ReadingSession::new(self.study, text))
    }

    /// Deletes a text and reloads the text list. Deleting a missing text is not an error.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.study
            .store()
            .delete_text(id)
            .await
            .map_err(|err| Error::persistence(format!("delete text {id}"), err))?;
        tracing::info!("Deleted text {id}");
        self.reload().await
    }

    /// Replaces the in-memory text list with the store's.
    pub async fn reload(&self) -> Result<()> {
        let texts = self
            .study
            .store()
            .get_all_texts()
            .await
            .map_err(|err| Error::persistence("load texts", err))?;
        self.study.state().texts = texts;
        Ok(())
    }
}

fn new_text_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
