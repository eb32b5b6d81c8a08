use crate::enforcement::enforce_missing_blocks;
use crate::error::{CoachError, Result};
use crate::llm::client::CoachingModel;
use crate::llm::types::CoachingEvent;
use crate::llm::utils::build_coaching_messages;
use crate::markdown::normalize_markdown;
use crate::{CoachingReport, PreparedSubmission};
use log::{info, warn};
use tokio::sync::mpsc::Sender;

/// Runs one coaching request end to end: prompt, model call, normalization
/// and missing-block enforcement.
pub struct CoachingAssistant<M> {
    model: M,
}

impl<M: CoachingModel> CoachingAssistant<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Requests feedback for a prepared submission.
    ///
    /// A model failure ends the run with [`CoachError::LlmRequest`]; no
    /// partial report is produced.
    pub async fn coach(
        &self,
        prepared: &PreparedSubmission,
        progress: Option<Sender<CoachingEvent>>,
    ) -> Result<CoachingReport> {
        self.send_event(&progress, CoachingEvent::Starting).await;

        let messages = build_coaching_messages(prepared)?;

        self.send_event(
            &progress,
            CoachingEvent::RequestingFeedback {
                empty_blocks: prepared.empty_blocks.len(),
            },
        )
        .await;

        let raw = match self.model.complete(&messages).await {
            Ok(raw) => raw,
            Err(err) => {
                let err = match err {
                    CoachError::LlmRequest(_) => err,
                    other => CoachError::LlmRequest(other.to_string()),
                };
                warn!("{}", err);
                self.send_event(
                    &progress,
                    CoachingEvent::Failed {
                        reason: err.to_string(),
                    },
                )
                .await;
                return Err(err);
            }
        };

        self.send_event(&progress, CoachingEvent::NormalizingResponse)
            .await;
        let normalized = normalize_markdown(&raw);

        self.send_event(&progress, CoachingEvent::EnforcingMissingBlocks)
            .await;
        let markdown = enforce_missing_blocks(&normalized, prepared.empty_blocks.titles());

        info!(
            "Coaching feedback ready for '{}'",
            prepared.metadata.business_name
        );
        self.send_event(&progress, CoachingEvent::Success).await;

        Ok(CoachingReport {
            markdown,
            metadata: prepared.metadata.clone(),
            empty_blocks: prepared.empty_blocks.clone(),
        })
    }

    async fn send_event(&self, sender: &Option<Sender<CoachingEvent>>, event: CoachingEvent) {
        if let Some(tx) = sender {
            let _ = tx.send(event).await;
        }
    }
}
