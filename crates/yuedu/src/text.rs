//! Conversions between stored text content and word sequences.

use crate::error::{TextImportError, ValidationError};
use serde_json::Value;
use yuedu_core::Word;

/// How many words a text preview shows.
pub const PREVIEW_WORDS: usize = 15;

/// Parses stored text content into its words.
///
/// Malformed content is logged and treated as an empty text, so a broken row
/// never prevents the rest of the application from working.
pub fn parse(content: &str) -> Vec<Word> {
    let value = match serde_json::from_str::<Value>(content) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("Failed to parse text content: {err}");
            return Vec::new();
        }
    };
    let Value::Array(entries) = value else {
        tracing::warn!("Text content is not an array");
        return Vec::new();
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let Some(entry) = entry.as_object() else {
                tracing::warn!("Skipping text entry {index}, it is not an object");
                return None;
            };
            // fields that are missing or not strings read as empty
            let string_field = |field: &str| {
                entry
                    .get(field)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
            };
            Some(Word::new(
                string_field("hanzi"),
                string_field("pinyin"),
                string_field("translation"),
            ))
        })
        .collect()
}

/// Serializes words into the stored text content format.
pub fn serialize(words: &[Word]) -> String {
    serde_json::to_string_pretty(words).expect("failed to serialize words")
}

/// The hanzi of the first few words, separated by spaces.
pub fn preview(words: &[Word]) -> String {
    words
        .iter()
        .take(PREVIEW_WORDS)
        .map(|w| w.hanzi.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds words from parallel `|`-separated Mandarin, pinyin and English fields.
///
/// Segments are trimmed and empty segments are dropped before the counts are compared.
pub fn from_segments(
    mandarin: &str,
    pinyin: &str,
    english: &str,
) -> Result<Vec<Word>, TextImportError> {
    if mandarin.trim().is_empty() || pinyin.trim().is_empty() || english.trim().is_empty() {
        return Err(TextImportError::EmptyFields);
    }

    let mandarin = split_segments(mandarin);
    let pinyin = split_segments(pinyin);
    let english = split_segments(english);
    if mandarin.len() != pinyin.len() || mandarin.len() != english.len() {
        return Err(TextImportError::SegmentCountMismatch {
            mandarin: mandarin.len(),
            pinyin: pinyin.len(),
            english: english.len(),
        });
    }
    if mandarin.is_empty() {
        return Err(TextImportError::NoSegments);
    }

    let words = mandarin
        .into_iter()
        .zip(pinyin)
        .zip(english)
        .map(|((hanzi, pinyin), translation)| Word::new(hanzi, pinyin, translation))
        .collect();
    Ok(words)
}

fn split_segments(field: &str) -> Vec<&str> {
    field
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Checks that a JSON payload is an array of complete words.
///
/// Every entry must be an object with non-empty string `hanzi`, `pinyin` and `translation`.
/// Either every entry passes or the whole payload is rejected.
pub fn validate_words(value: &Value) -> Result<Vec<Word>, ValidationError> {
    let entries = value.as_array().ok_or(ValidationError::NotAnArray)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = entry
                .as_object()
                .ok_or(ValidationError::NotAnObject { index })?;
            let string_field = |field: &'static str| {
                entry
                    .get(field)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .ok_or(ValidationError::MissingField { index, field })
            };
            Ok(Word::new(
                string_field("hanzi")?,
                string_field("pinyin")?,
                string_field("translation")?,
            ))
        })
        .collect()
}

/// Parses and validates a JSON payload of words.
pub fn parse_words_strict(payload: &str) -> Result<Vec<Word>, ValidationError> {
    let value = serde_json::from_str::<Value>(payload)?;
    validate_words(&value)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_word_array() {
        let words = parse(r#"[{"hanzi":"我","pinyin":"wǒ","translation":"I"},{"hanzi":"爱","pinyin":"ài","translation":"love"}]"#);
        assert_eq!(
            words,
            vec![Word::new("我", "wǒ", "I"), Word::new("爱", "ài", "love")]
        );
    }

    #[test]
    fn malformed_content_is_empty() {
        assert!(parse("{not valid json").is_empty());
        assert!(parse(r#"{"a":1}"#).is_empty());
        assert!(parse("42").is_empty());
        assert!(parse("[1, 2]").is_empty());
    }

    #[test]
    fn parsing_is_repeatable() {
        let content = serialize(&[Word::new("猫", "māo", "cat")]);
        assert_eq!(parse(&content), parse(&content));
    }

    #[test]
    fn keeps_words_with_mistyped_fields() {
        let words = parse(
            r#"[{"hanzi":"猫","pinyin":"māo","translation":"cat"},{"hanzi":"狗","pinyin":null,"translation":"dog"},{"hanzi":"鱼","pinyin":7,"translation":{"en":"fish"}}]"#,
        );
        assert_eq!(
            words,
            vec![
                Word::new("猫", "māo", "cat"),
                Word::new("狗", "", "dog"),
                Word::new("鱼", "", ""),
            ]
        );
    }

    #[test]
    fn skips_entries_that_are_not_objects() {
        let words = parse(r#"[{"hanzi":"猫","pinyin":"māo","translation":"cat"}, 1, "dog"]"#);
        assert_eq!(words, vec![Word::new("猫", "māo", "cat")]);
    }

    #[test]
    fn trusts_element_shape() {
        let words = parse(r#"[{"hanzi":"猫","extra":true}]"#);
        assert_eq!(words, vec![Word::new("猫", "", "")]);
    }

    #[test]
    fn previews_first_words() {
        let words = (0..20)
            .map(|i| Word::new(i.to_string(), "", ""))
            .collect::<Vec<_>>();
        assert_eq!(preview(&words), "0 1 2 3 4 5 6 7 8 9 10 11 12 13 14");
        assert_eq!(preview(&[]), "");
    }

    #[test]
    fn builds_words_from_segments() {
        let words = from_segments(
            "我|喜欢|学|中文",
            " wǒ | xǐhuān|xué|zhōngwén ",
            "I|like|study|Chinese||",
        )
        .unwrap();
        assert_eq!(
            words,
            vec![
                Word::new("我", "wǒ", "I"),
                Word::new("喜欢", "xǐhuān", "like"),
                Word::new("学", "xué", "study"),
                Word::new("中文", "zhōngwén", "Chinese"),
            ]
        );
    }

    #[test]
    fn rejects_mismatched_segments() {
        let err = from_segments("我|喜欢", "wǒ", "I|like").unwrap_err();
        assert_eq!(
            err,
            TextImportError::SegmentCountMismatch {
                mandarin: 2,
                pinyin: 1,
                english: 2
            }
        );
    }

    #[test]
    fn rejects_empty_segments() {
        assert_eq!(
            from_segments("我", " ", "I").unwrap_err(),
            TextImportError::EmptyFields
        );
        assert_eq!(
            from_segments("|", "||", "|").unwrap_err(),
            TextImportError::NoSegments
        );
    }

    #[test]
    fn validates_complete_words() {
        let value = json!([{"hanzi": "我", "pinyin": "wǒ", "translation": "I", "id": 3}]);
        assert_eq!(
            validate_words(&value).unwrap(),
            vec![Word::new("我", "wǒ", "I")]
        );
    }

    #[test]
    fn validation_rejects_bad_entries() {
        let value = json!([{"hanzi": "a", "pinyin": "", "translation": ""}, {"bad": "shape"}]);
        assert!(matches!(
            validate_words(&value),
            Err(ValidationError::MissingField {
                index: 0,
                field: "pinyin"
            })
        ));
        assert!(matches!(
            validate_words(&json!(["我"])),
            Err(ValidationError::NotAnObject { index: 0 })
        ));
        assert!(matches!(
            validate_words(&json!({"hanzi": "我"})),
            Err(ValidationError::NotAnArray)
        ));
        assert!(matches!(
            parse_words_strict("[{"),
            Err(ValidationError::Json(_))
        ));
    }
}
