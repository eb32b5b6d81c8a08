use crate::error::Result;
use crate::llm::types::ChatMessage;
use std::future::Future;

/// The language model boundary: an ordered message list in, one text blob out.
///
/// Implementations perform a single request with no retries. Any failure,
/// including a timeout, is returned as an error.
pub trait CoachingModel {
    fn complete(&self, messages: &[ChatMessage]) -> impl Future<Output = Result<String>> + Send;
}

#[cfg(feature = "openai")]
pub use openai::OpenAiClient;

#[cfg(feature = "openai")]
mod openai {
    use super::CoachingModel;
    use crate::config::CoachConfig;
    use crate::error::{CoachError, Result};
    use crate::llm::types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
    use log::{debug, info};
    use reqwest::Client;
    use std::future::Future;

    /// Chat-completions client configured from a [`CoachConfig`].
    #[derive(Clone)]
    pub struct OpenAiClient {
        client: Client,
        config: CoachConfig,
    }

    impl OpenAiClient {
        pub fn new(config: CoachConfig) -> Result<Self> {
            if config.api_key.trim().is_empty() {
                return Err(CoachError::Config("API key is empty".to_string()));
            }
            let client = Client::builder()
                .timeout(config.timeout)
                .build()
                .map_err(|e| CoachError::Config(format!("HTTP client setup failed: {}", e)))?;
            Ok(Self { client, config })
        }

        pub fn config(&self) -> &CoachConfig {
            &self.config
        }

        async fn send(&self, messages: Vec<ChatMessage>) -> Result<String> {
            let url = self.config.chat_completions_url();
            let payload = ChatCompletionRequest {
                model: &self.config.model,
                messages: &messages,
                temperature: self.config.temperature,
            };

            info!(
                "Requesting coaching feedback from {} ({} messages)",
                self.config.model,
                messages.len()
            );

            let mut request = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&payload);
            if let Some(organization) = &self.config.organization {
                request = request.header("OpenAI-Organization", organization);
            }
            if let Some(project) = &self.config.project {
                request = request.header("OpenAI-Project", project);
            }

            let res = request.send().await.map_err(|e| self.transport_error(e))?;
            let status = res.status();

            if !status.is_success() {
                let err_text = res.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<ApiErrorBody>(&err_text)
                    .map(|body| body.error.message)
                    .unwrap_or(err_text);
                return Err(CoachError::LlmRequest(format!(
                    "API error (status {}): {}",
                    status, detail
                )));
            }

            let body: ChatCompletionResponse = res.json().await.map_err(|e| {
                CoachError::LlmRequest(format!("Malformed response from model API: {}", e))
            })?;

            let text = body.into_text().ok_or_else(|| {
                CoachError::LlmRequest("Model returned an empty response".to_string())
            })?;
            debug!("Received {} characters of feedback", text.len());
            Ok(text)
        }

        fn transport_error(&self, err: reqwest::Error) -> CoachError {
            if err.is_timeout() {
                CoachError::LlmRequest(format!(
                    "No response within {} seconds",
                    self.config.timeout.as_secs()
                ))
            } else {
                CoachError::LlmRequest(err.to_string())
            }
        }
    }

    impl CoachingModel for OpenAiClient {
        fn complete(
            &self,
            messages: &[ChatMessage],
        ) -> impl Future<Output = Result<String>> + Send {
            self.send(messages.to_vec())
        }
    }
}
