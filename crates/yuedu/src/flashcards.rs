//! Generating flashcards and stories with an AI chat service.
//!
//! Nothing here touches the study state. Generated words are validated like
//! any other untrusted import before they are handed back.

use crate::{error::ValidationError, text};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use yuedu_core::Word;

/// The example given to the chat service to show the expected reply format.
const WORD_FORMAT_EXAMPLE: &str = r#"[
  {
    "hanzi": "我",
    "pinyin": "wǒ",
    "translation": "I"
  },
  {
    "hanzi": "喜欢",
    "pinyin": "xǐhuan",
    "translation": "like"
  },
  {
    "hanzi": "苹果",
    "pinyin": "píngguǒ",
    "translation": "apple"
  }
]"#;

/// Default number of cards generated when the caller does not ask for a specific count.
pub const DEFAULT_CARD_COUNT: usize = 20;
/// The most cards a single request may ask for.
pub const MAX_CARD_COUNT: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: MessageContent,
}

/// Chat services reply either with plain text or with a list of text parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    pub text: String,
}

impl MessageContent {
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts.iter().map(|p| p.text.as_str()).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("AI chat is not configured")]
    NotConfigured,
    #[error("Failed to reach the AI chat service: {0}")]
    Request(String),
    #[error("The AI chat service responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("The AI reply did not contain a JSON array of words")]
    NoWords,
    #[error("The AI reply contained invalid words: {0}")]
    InvalidWords(#[from] ValidationError),
    #[error("Asked for {0} cards, at most 100 are allowed")]
    TooManyCards(usize),
}

/// A prompt/response chat service.
#[async_trait]
pub trait Chat: Send + Sync {
    async fn chat(&self, prompt: &str, options: &ChatOptions) -> Result<ChatResponse, ChatError>;
}

pub fn flashcard_prompt(theme: &str, count: usize) -> String {
    format!(
        "Create a list of {count} useful Mandarin vocabulary words about the theme \"{theme}\". \
Output only the words in this json format:\n{WORD_FORMAT_EXAMPLE}"
    )
}

pub fn story_prompt(theme: Option<&str>) -> String {
    let about = match theme {
        Some(theme) if !theme.trim().is_empty() => format!(" about \"{}\"", theme.trim()),
        _ => String::new(),
    };
    format!(
        "Write a story in mandarin{about} and then output the story in this json format:\n{WORD_FORMAT_EXAMPLE}"
    )
}

/// Asks the chat service for themed vocabulary.
#[tracing::instrument(skip(chat, options))]
pub async fn generate_flashcards(
    chat: &dyn Chat,
    theme: &str,
    count: usize,
    options: &ChatOptions,
) -> Result<Vec<Word>, ChatError> {
    if count > MAX_CARD_COUNT {
        return Err(ChatError::TooManyCards(count));
    }
    let response = chat.chat(&flashcard_prompt(theme, count), options).await?;
    let words = words_from_reply(&response.message.content.text())?;
    tracing::info!("Generated {} flashcards", words.len());
    Ok(words)
}

/// Asks the chat service for a story, returned word by word.
#[tracing::instrument(skip(chat, options))]
pub async fn generate_story(
    chat: &dyn Chat,
    theme: Option<&str>,
    options: &ChatOptions,
) -> Result<Vec<Word>, ChatError> {
    let response = chat.chat(&story_prompt(theme), options).await?;
    let words = words_from_reply(&response.message.content.text())?;
    tracing::info!("Generated a story of {} words", words.len());
    Ok(words)
}

/// Finds the outermost JSON array in a chat reply and validates it as words.
pub fn words_from_reply(reply: &str) -> Result<Vec<Word>, ChatError> {
    let start = reply.find('[').ok_or(ChatError::NoWords)?;
    let end = reply.rfind(']').ok_or(ChatError::NoWords)?;
    if end < start {
        return Err(ChatError::NoWords);
    }
    let words = text::parse_words_strict(&reply[start..=end])?;
    if words.is_empty() {
        return Err(ChatError::NoWords);
    }
    Ok(words)
}

/// Writes words as CSV with a `hanzi,pinyin,translation` header.
pub fn to_csv(words: &[Word]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for word in words {
        writer.serialize(word)?;
    }
    if words.is_empty() {
        writer.write_record(["hanzi", "pinyin", "translation"])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedChat {
        reply: MessageContent,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(reply: MessageContent) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Chat for ScriptedChat {
        async fn chat(
            &self,
            prompt: &str,
            _options: &ChatOptions,
        ) -> Result<ChatResponse, ChatError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(ChatResponse {
                message: ChatMessage {
                    content: self.reply.clone(),
                },
            })
        }
    }

    const FRUIT: &str = r#"Here you go:
```json
[{"hanzi":"苹果","pinyin":"píngguǒ","translation":"apple"},{"hanzi":"香蕉","pinyin":"xiāngjiāo","translation":"banana"}]
```"#;

    #[tokio::test]
    async fn generates_flashcards_from_fenced_reply() {
        let chat = ScriptedChat::new(MessageContent::Text(FRUIT.to_string()));
        let words = generate_flashcards(&chat, "fruit", 2, &ChatOptions::default())
            .await
            .unwrap();
        assert_eq!(
            words,
            vec![
                Word::new("苹果", "píngguǒ", "apple"),
                Word::new("香蕉", "xiāngjiāo", "banana"),
            ]
        );
        let prompts = chat.prompts.lock().unwrap();
        assert!(prompts[0].contains("2 useful Mandarin vocabulary words"));
        assert!(prompts[0].contains("\"fruit\""));
    }

    #[tokio::test]
    async fn joins_reply_parts() {
        let (head, tail) = FRUIT.split_at(FRUIT.find("},{").unwrap());
        let chat = ScriptedChat::new(MessageContent::Parts(vec![
            ContentPart {
                text: head.to_string(),
            },
            ContentPart {
                text: tail.to_string(),
            },
        ]));
        let words = generate_story(&chat, None, &ChatOptions::default())
            .await
            .unwrap();
        assert_eq!(words.len(), 2);
        assert!(chat.prompts.lock().unwrap()[0].starts_with("Write a story in mandarin and"));
    }

    #[tokio::test]
    async fn rejects_too_many_cards() {
        let chat = ScriptedChat::new(MessageContent::Text(FRUIT.to_string()));
        let err = generate_flashcards(&chat, "fruit", 500, &ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::TooManyCards(500)));
        assert!(chat.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn rejects_replies_without_words() {
        assert!(matches!(
            words_from_reply("Sorry, I can't help with that."),
            Err(ChatError::NoWords)
        ));
        assert!(matches!(words_from_reply("] ["), Err(ChatError::NoWords)));
        assert!(matches!(words_from_reply("[]"), Err(ChatError::NoWords)));
        assert!(matches!(
            words_from_reply(r#"[{"hanzi":"苹果"}]"#),
            Err(ChatError::InvalidWords(_))
        ));
    }

    #[test]
    fn writes_csv() {
        let csv = to_csv(&[
            Word::new("苹果", "píngguǒ", "apple"),
            Word::new("你好", "nǐhǎo", "hello, hi"),
        ])
        .unwrap();
        assert_eq!(
            csv,
            "hanzi,pinyin,translation\n苹果,píngguǒ,apple\n你好,nǐhǎo,\"hello, hi\"\n"
        );
    }

    #[test]
    fn writes_header_for_empty_csv() {
        assert_eq!(to_csv(&[]).unwrap(), "hanzi,pinyin,translation\n");
    }

    #[test]
    fn story_prompt_mentions_theme() {
        assert!(story_prompt(Some(" the sea ")).starts_with("Write a story in mandarin about \"the sea\""));
        assert_eq!(story_prompt(Some("  ")), story_prompt(None));
    }
}
