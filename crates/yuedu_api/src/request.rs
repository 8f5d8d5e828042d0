use serde::{Deserialize, Serialize};
use std::borrow::Cow;
pub use yuedu_core::Word;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewText<'a> {
    pub title: Cow<'a, str>,
    pub words: Vec<Word>,
}

/// A text given as parallel `|`-separated fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewSegmentedText<'a> {
    pub title: Cow<'a, str>,
    pub mandarin: Cow<'a, str>,
    pub pinyin: Cow<'a, str>,
    pub english: Cow<'a, str>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VocabularySearch<'a> {
    #[serde(default)]
    pub query: Cow<'a, str>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateFontSize {
    pub font_size: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateFlashcards<'a> {
    pub theme: Cow<'a, str>,
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateStory<'a> {
    pub title: Option<Cow<'a, str>>,
    pub theme: Option<Cow<'a, str>>,
}
