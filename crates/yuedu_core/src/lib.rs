//! Yuedu core types.

use serde::{Deserialize, Serialize};

/// One word unit of a text, and one entry of the vocabulary.
///
/// Identity is `hanzi`: two words with equal `hanzi` are the same vocabulary entry.
/// Missing fields deserialize as empty strings so stored texts with sloppy entries still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Word {
    pub hanzi: String,
    pub pinyin: String,
    pub translation: String,
}

impl Word {
    pub fn new(
        hanzi: impl Into<String>,
        pinyin: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            hanzi: hanzi.into(),
            pinyin: pinyin.into(),
            translation: translation.into(),
        }
    }
}

/// An imported text. `content` is the serialized word sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// A row of the settings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: serde_json::Value,
}

/// Reader font size in pixels, always within `FontSize::MIN..=FontSize::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct FontSize(u8);

impl FontSize {
    /// Key of the font size row in the settings table.
    pub const KEY: &'static str = "fontSize";
    pub const MIN: u8 = 14;
    pub const MAX: u8 = 36;
    pub const DEFAULT: FontSize = FontSize(20);

    /// Creates a font size, clamping out of range values.
    pub fn new(px: i64) -> Self {
        let clamped = px.clamp(Self::MIN.into(), Self::MAX.into());
        // within u8 range after clamping
        Self(clamped as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for FontSize {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<FontSize> for u8 {
    fn from(value: FontSize) -> Self {
        value.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamps_font_size() {
        assert_eq!(FontSize::new(10).get(), 14);
        assert_eq!(FontSize::new(24).get(), 24);
        assert_eq!(FontSize::new(100).get(), 36);
        assert_eq!(FontSize::default().get(), 20);
    }

    #[test]
    fn deserializes_font_size_with_clamping() {
        let size: FontSize = serde_json::from_str("72").unwrap();
        assert_eq!(size, FontSize::new(36));
        assert_eq!(serde_json::to_string(&size).unwrap(), "36");
    }

    #[test]
    fn word_fields_default_to_empty() {
        let word: Word = serde_json::from_str(r#"{"hanzi":"猫"}"#).unwrap();
        assert_eq!(word, Word::new("猫", "", ""));
    }

    #[test]
    fn serializes_word_fields_in_order() {
        let word = Word::new("我", "wǒ", "I");
        assert_eq!(
            serde_json::to_string(&word).unwrap(),
            r#"{"hanzi":"我","pinyin":"wǒ","translation":"I"}"#
        );
    }
}
