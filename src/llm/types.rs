use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Progress of one coaching run, for UIs that show a spinner or log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoachingEvent {
    Starting,
    RequestingFeedback { empty_blocks: usize },
    NormalizingResponse,
    EnforcingMissingBlocks,
    Success,
    Failed { reason: String },
}

#[cfg_attr(not(feature = "openai"), allow(dead_code))]
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
}

#[cfg_attr(not(feature = "openai"), allow(dead_code))]
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[cfg_attr(not(feature = "openai"), allow(dead_code))]
#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[cfg_attr(not(feature = "openai"), allow(dead_code))]
#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg_attr(not(feature = "openai"), allow(dead_code))]
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[cfg_attr(not(feature = "openai"), allow(dead_code))]
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}

#[cfg_attr(not(feature = "openai"), allow(dead_code))]
impl ChatCompletionResponse {
    /// Text of the first choice, if the model returned any.
    pub(crate) fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}
