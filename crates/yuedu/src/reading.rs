//! Reading a text and marking its words as known.

use crate::{
    error::{Error, Result, ValidationError},
    store::Store,
    study::Study,
    text,
};
use yuedu_core::{TextEntry, Word};

/// Outcome of [`ReadingSession::mark_known`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKnown {
    /// The word was added to the vocabulary.
    Marked,
    /// The word was already known, nothing changed.
    AlreadyKnown,
}

/// A word of the text as it should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedWord<'a> {
    pub word: &'a Word,
    pub known: bool,
}

impl<'a> RenderedWord<'a> {
    /// The gloss to show, hidden for known words.
    pub fn translation(&self) -> Option<&'a str> {
        (!self.known).then_some(self.word.translation.as_str())
    }
}

/// An open text whose words are rendered against the study's vocabulary.
pub struct ReadingSession<'a, S> {
    study: &'a Study<S>,
    text: TextEntry,
    words: Vec<Word>,
}

impl<'a, S: Store> ReadingSession<'a, S> {
    pub fn new(study: &'a Study<S>, text: TextEntry) -> Self {
        let words = text::parse(&text.content);
        Self { study, text, words }
    }

    pub fn text(&self) -> &TextEntry {
        &self.text
    }

    /// The parsed words in their original order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn is_known(&self, word: &Word) -> bool {
        self.study.is_known(&word.hanzi)
    }

    /// Every word of the text in order with its known status.
    pub fn render(&self) -> Vec<RenderedWord<'_>> {
        let state = self.study.state();
        self.words
            .iter()
            .map(|word| RenderedWord {
                word,
                known: state.known.is_known(&word.hanzi),
            })
            .collect()
    }

    /// Adds the word to the vocabulary.
    ///
    /// The word shows as known as soon as this is called. If saving it fails,
    /// it is removed again and the error is returned.
    #[tracing::instrument(skip(self))]
    pub async fn mark_known(&self, word: &Word) -> Result<MarkKnown> {
        if word.hanzi.is_empty() {
            return Err(ValidationError::EmptyHanzi.into());
        }

        let _gate = self.study.shared_vocabulary_gate().await;
        let _word = self.study.lock_word(&word.hanzi).await;
        let added = self.study.state().known.add(word.clone());
        if !added {
            tracing::debug!("{} is already known", word.hanzi);
            return Ok(MarkKnown::AlreadyKnown);
        }

        match self.study.store().put_word(word).await {
            Ok(()) => {
                tracing::info!("Marked {} as known", word.hanzi);
                Ok(MarkKnown::Marked)
            }
            Err(err) => {
                tracing::error!("Failed to save {}, rolling back: {err}", word.hanzi);
                self.study.state().known.remove(&word.hanzi);
                Err(Error::persistence(format!("save word {}", word.hanzi), err))
            }
        }
    }
}
