use crate::error::Result;
use crate::llm::prompts::{
    response_template, FORMATTING_DIRECTIVE, NO_INVENTION_DIRECTIVE, SYSTEM_PROMPT_COACH,
};
use crate::llm::types::ChatMessage;
use crate::schema::{FounderPayload, Submission};
use crate::taxonomy::EmptyBlocks;
use crate::PreparedSubmission;

/// Version tag of the user-message layout. Bump when the layout changes so
/// stored prompts stay comparable.
pub const SERIALIZATION_VERSION: &str = "v1";

/// Serializes a structured submission with stable key order.
///
/// Layout:
/// ```text
/// FOUNDER_PAYLOAD v1
/// { "business_name": ..., ..., "kingdom_impact": ... }
///
/// EMPTY_BLOCKS v1
/// ["1) Problem", ...]
/// ```
pub fn serialize_payload(payload: &FounderPayload, empty_blocks: &EmptyBlocks) -> Result<String> {
    Ok(format!(
        "FOUNDER_PAYLOAD {version}\n{payload}\n\nEMPTY_BLOCKS {version}\n{blocks}\n",
        version = SERIALIZATION_VERSION,
        payload = serde_json::to_string_pretty(payload)?,
        blocks = serde_json::to_string(empty_blocks)?,
    ))
}

pub fn serialize_free_text(text: &str) -> String {
    format!(
        "BMC_TEXT {version}\n{text}\n\nEMPTY_BLOCKS {version}\nUnknown: the canvas was submitted as free text.\n",
        version = SERIALIZATION_VERSION,
        text = text.trim(),
    )
}

/// The full message list for one coaching request, in fixed order.
pub fn build_coaching_messages(prepared: &PreparedSubmission) -> Result<Vec<ChatMessage>> {
    let user_content = match &prepared.submission {
        Submission::Structured(payload) => serialize_payload(payload, &prepared.empty_blocks)?,
        Submission::Unstructured { text } => serialize_free_text(text),
    };

    Ok(vec![
        ChatMessage::system(SYSTEM_PROMPT_COACH.trim()),
        ChatMessage::system(FORMATTING_DIRECTIVE.trim()),
        ChatMessage::system(NO_INVENTION_DIRECTIVE.trim()),
        ChatMessage::system(response_template().trim()),
        ChatMessage::user(user_content),
    ])
}
