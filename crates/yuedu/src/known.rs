//! The in-memory vocabulary and the set of known hanzi derived from it.

use std::collections::HashSet;
use yuedu_core::Word;

/// The known words in the order they were added, tagged with a version
/// that changes on every mutation.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<Word>,
    version: u64,
}

impl Vocabulary {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words, version: 0 }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn position(&self, hanzi: &str) -> Option<usize> {
        self.words.iter().position(|w| w.hanzi == hanzi)
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    fn push(&mut self, word: Word) {
        self.words.push(word);
        self.bump();
    }

    fn remove(&mut self, hanzi: &str) -> Option<(usize, Word)> {
        let idx = self.position(hanzi)?;
        let word = self.words.remove(idx);
        self.bump();
        Some((idx, word))
    }

    fn insert(&mut self, idx: usize, word: Word) {
        let idx = idx.min(self.words.len());
        self.words.insert(idx, word);
        self.bump();
    }

    fn replace(&mut self, words: Vec<Word>) -> Vec<Word> {
        let previous = std::mem::replace(&mut self.words, words);
        self.bump();
        previous
    }
}

/// Membership set of known hanzi, rebuilt only when the vocabulary version changes.
#[derive(Debug, Default)]
pub struct KnownWordIndex {
    built_from: Option<u64>,
    hanzi: HashSet<String>,
}

impl KnownWordIndex {
    pub fn build(vocabulary: &Vocabulary) -> Self {
        let mut index = Self::default();
        index.refresh(vocabulary);
        index
    }

    /// Rebuilds the index if it was built from a different version of the vocabulary.
    /// Returns whether a rebuild happened.
    pub fn refresh(&mut self, vocabulary: &Vocabulary) -> bool {
        if self.built_from == Some(vocabulary.version()) {
            return false;
        }
        self.hanzi = vocabulary
            .words()
            .iter()
            .map(|w| w.hanzi.clone())
            .collect();
        self.built_from = Some(vocabulary.version());
        true
    }

    pub fn is_known(&self, hanzi: &str) -> bool {
        self.hanzi.contains(hanzi)
    }

    pub fn len(&self) -> usize {
        self.hanzi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hanzi.is_empty()
    }
}

/// The vocabulary together with its index. Every mutation refreshes the index
/// before returning, so lookups never see a stale set.
#[derive(Debug, Default)]
pub struct KnownWords {
    vocabulary: Vocabulary,
    index: KnownWordIndex,
}

impl KnownWords {
    pub fn new(words: Vec<Word>) -> Self {
        let vocabulary = Vocabulary::new(words);
        let index = KnownWordIndex::build(&vocabulary);
        Self { vocabulary, index }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn words(&self) -> &[Word] {
        self.vocabulary.words()
    }

    pub fn is_known(&self, hanzi: &str) -> bool {
        self.index.is_known(hanzi)
    }

    pub fn index(&self) -> &KnownWordIndex {
        &self.index
    }

    /// Appends the word unless its hanzi is already known. Returns whether it was added.
    pub fn add(&mut self, word: Word) -> bool {
        if self.is_known(&word.hanzi) {
            return false;
        }
        self.vocabulary.push(word);
        self.index.refresh(&self.vocabulary);
        true
    }

    /// Removes the word with the given hanzi, returning it and its former position.
    pub fn remove(&mut self, hanzi: &str) -> Option<(usize, Word)> {
        let removed = self.vocabulary.remove(hanzi)?;
        self.index.refresh(&self.vocabulary);
        Some(removed)
    }

    /// Puts a removed word back at its former position unless it has been re-added meanwhile.
    pub fn restore(&mut self, idx: usize, word: Word) {
        if self.is_known(&word.hanzi) {
            return;
        }
        self.vocabulary.insert(idx, word);
        self.index.refresh(&self.vocabulary);
    }

    /// Replaces every word at once, returning the previous words.
    pub fn replace(&mut self, words: Vec<Word>) -> Vec<Word> {
        let previous = self.vocabulary.replace(words);
        self.index.refresh(&self.vocabulary);
        previous
    }
}
