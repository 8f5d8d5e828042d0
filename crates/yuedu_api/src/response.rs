//! Types for responses from the backend to its clients.

use serde::{Deserialize, Serialize};
pub use yuedu_core::{FontSize, Word};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub id: String,
    pub title: String,
    pub preview: String,
}

/// A text as displayed in the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub title: String,
    pub font_size: FontSize,
    pub words: Vec<ReadingWord>,
}

/// A word of a text in the reader. `translation` is absent for known words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingWord {
    pub hanzi: String,
    pub pinyin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub known: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkKnown {
    Marked,
    AlreadyKnown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub font_size: FontSize,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn omits_translation_of_known_words() {
        let word = ReadingWord {
            hanzi: "猫".to_string(),
            pinyin: "māo".to_string(),
            translation: None,
            known: true,
        };
        assert_eq!(
            serde_json::to_string(&word).unwrap(),
            r#"{"hanzi":"猫","pinyin":"māo","known":true}"#
        );
    }

    #[test]
    fn serializes_mark_known_outcome() {
        assert_eq!(
            serde_json::to_string(&MarkKnown::AlreadyKnown).unwrap(),
            r#""already_known""#
        );
    }
}
