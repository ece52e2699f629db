//! Chat-completion client for OpenAI-compatible endpoints (Groq by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;

/// Prompt to text capability.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt and return the generated text verbatim.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("GROQ_API_KEY not set in environment")]
    MissingApiKey,

    #[error("request to LLM provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct ChatCompletionClient {
    http_client: reqwest::Client,
    config: LlmConfig,
}

impl ChatCompletionClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http_client: builder.build()?,
            config,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !self.config.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &self.config.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        ChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

/// Text of the first choice in an OpenAI-style response body.
fn first_choice_text(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|err| LlmError::MalformedResponse(err.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::MalformedResponse("no choices[0].message.content".to_string()))
}

#[async_trait]
impl LlmClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        log::debug!(
            "sending {} byte prompt to {} (model {})",
            prompt.len(),
            self.config.api_url,
            self.config.model
        );

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::error!("LLM provider error {status}: {body}");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        first_choice_text(&body)
    }
}
