//! Client for OpenAI-compatible chat completion endpoints.

use async_trait::async_trait;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use yuedu::flashcards::{Chat, ChatError, ChatMessage, ChatOptions, ChatResponse};

#[derive(Debug, Clone)]
pub struct AiChat {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl AiChat {
    pub fn new(url: String, api_key: Option<String>) -> eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: [CompletionMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl CompletionResponse {
    fn into_chat_response(self) -> Result<ChatResponse, ChatError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Request("response contained no choices".to_string()))?;
        Ok(ChatResponse {
            message: choice.message,
        })
    }
}

#[async_trait]
impl Chat for AiChat {
    #[tracing::instrument(skip_all)]
    async fn chat(&self, prompt: &str, options: &ChatOptions) -> Result<ChatResponse, ChatError> {
        let payload = CompletionRequest {
            model: options.model.as_deref(),
            messages: [CompletionMessage {
                role: "user",
                content: prompt,
            }],
        };
        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        let response = request
            .send()
            .await
            .map_err(|err| ChatError::Request(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status { status, body });
        }

        let response = response
            .json::<CompletionResponse>()
            .await
            .map_err(|err| ChatError::Request(format!("invalid response: {err}")))?;
        response.into_chat_response()
    }
}
