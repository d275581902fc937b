//! LLM completion client
//!
//! Talks to any OpenAI-compatible chat-completions endpoint (OpenRouter,
//! OpenAI, Ollama's compatibility API). The endpoint, key, and default
//! model come from the `[llm]` section of the application config.

pub mod prompts;

pub use prompts::build_qa_prompt;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::DocuMindError;
use crate::errors::Result;

/// A chat message in the completions request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Service for generating LLM completions
pub struct LlmService {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl LlmService {
    /// Create a new LLM service from application config
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::with_model(config, config.llm_model().to_string())
    }

    /// Create a service bound to a specific model
    pub fn with_model(config: &crate::config::AppConfig, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| DocuMindError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: config.llm_endpoint().to_string(),
            api_key: config.llm_key().to_string(),
            model,
            client,
        })
    }

    /// Default model identifier for this service
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a completion with default parameters
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_params(prompt, 0.1, 500).await
    }

    /// Generate a completion with explicit temperature and token limit
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Invalid API responses (malformed JSON, empty choices)
    pub async fn generate_with_params(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        self.generate_for_model(&self.model, prompt, temperature, max_tokens)
            .await
    }

    /// Generate a completion with an explicit model override
    pub async fn generate_for_model(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: usize,
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: String,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling LLM completions API: {} (model: {})", url, model);

        let request = CompletionRequest {
            model,
            messages: vec![ChatMessage::user(prompt)],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DocuMindError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocuMindError::Llm(format!(
                "LLM API error ({status}): {error_text}"
            )));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| DocuMindError::Llm(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DocuMindError::Llm("No completion in response".to_string()))
    }
}
