//! # BMC Coach
//!
//! Turns a founder's Business Model Canvas submission into a structured
//! coaching report.
//!
//! ## Core Concepts
//!
//! - **Founder Payload**: the 14 canonical fields extracted from a Word table,
//!   heading-style document, plain text file or web form
//! - **Empty Blocks**: canvas blocks the founder left blank, in section order
//! - **Normalization**: the model's markdown is repaired into `## section` /
//!   `### subheading` form and stray advisory footers are removed
//! - **Enforcement**: every empty block is rewritten to a fixed
//!   `Missing/Needs input.` placeholder, whatever the model wrote for it
//!
//! ## Example
//!
//! ```rust,ignore
//! use bmc_coach::*;
//!
//! let config = CoachConfig::from_env()?;
//! let coach = BmcCoach::new(OpenAiClient::new(config)?);
//!
//! let bytes = std::fs::read("canvas.docx")?;
//! let report = coach.coach_upload("canvas.docx", &bytes, None).await?;
//! let rendered = render_report(&report.markdown, &report.metadata, &ReportOptions::default())?;
//! std::fs::write(&rendered.file_name, &rendered.bytes)?;
//! ```

pub mod config;
pub mod document;
pub mod enforcement;
pub mod error;
pub mod hints;
pub mod ingestion;
pub mod labels;
pub mod llm;
pub mod markdown;
pub mod render;
pub mod schema;
pub mod taxonomy;

pub use config::CoachConfig;
pub use document::{DocumentBlock, DocumentFormat, ParsedDocument};
pub use enforcement::{enforce_missing_blocks, placeholder_block, MISSING_MARKER};
pub use error::{CoachError, Result};
pub use ingestion::*;
pub use labels::{normalize_label, resolve_label};
pub use llm::{ChatMessage, ChatRole, CoachingAssistant, CoachingEvent, CoachingModel};
#[cfg(feature = "openai")]
pub use llm::OpenAiClient;
pub use markdown::{normalize_markdown, ADVISORY_FOOTER};
pub use render::{render_report, report_file_name, RenderedReport, ReportOptions, DOCX_MIME_TYPE};
pub use schema::*;
pub use taxonomy::{empty_blocks, EmptyBlocks, SECTION_TITLES};

use log::{debug, info};
use serde::Serialize;
use tokio::sync::mpsc::Sender;

/// A submission checked for content, with its empty blocks computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission {
    pub submission: Submission,
    pub empty_blocks: EmptyBlocks,
    pub metadata: ReportMetadata,
}

/// Final markdown plus what the renderer needs to title it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoachingReport {
    pub markdown: String,
    pub metadata: ReportMetadata,
    pub empty_blocks: EmptyBlocks,
}

/// Rejects submissions with no content and computes the empty-block set.
///
/// Free text has no field structure, so its empty-block set is always empty
/// and the model is told the blocks are unknown.
pub fn prepare_submission(submission: Submission) -> Result<PreparedSubmission> {
    match &submission {
        Submission::Structured(payload) => {
            if !payload.has_content() {
                return Err(CoachError::NoContentDetected);
            }
            let empty_blocks = empty_blocks(payload);
            info!(
                "Submission has {} filled fields and {} empty canvas blocks",
                payload.filled_count(),
                empty_blocks.len()
            );
            debug!("Empty blocks: {:?}", empty_blocks.titles());
            Ok(PreparedSubmission {
                metadata: payload.metadata(),
                empty_blocks,
                submission,
            })
        }
        Submission::Unstructured { text } => {
            if text.trim().is_empty() {
                return Err(CoachError::NoContentDetected);
            }
            info!("Submission is free text ({} characters)", text.len());
            Ok(PreparedSubmission {
                submission,
                empty_blocks: EmptyBlocks::default(),
                metadata: ReportMetadata::default(),
            })
        }
    }
}

/// Normalizes a raw model response and enforces the missing-block placeholders.
pub fn postprocess_response(raw: &str, empty_blocks: &EmptyBlocks) -> String {
    let normalized = normalize_markdown(raw);
    enforce_missing_blocks(&normalized, empty_blocks.titles())
}

/// Top-level pipeline over a [`CoachingModel`].
pub struct BmcCoach<M> {
    assistant: CoachingAssistant<M>,
}

impl<M: CoachingModel> BmcCoach<M> {
    pub fn new(model: M) -> Self {
        Self {
            assistant: CoachingAssistant::new(model),
        }
    }

    pub fn assistant(&self) -> &CoachingAssistant<M> {
        &self.assistant
    }

    pub async fn coach(
        &self,
        submission: Submission,
        progress: Option<Sender<CoachingEvent>>,
    ) -> Result<CoachingReport> {
        let prepared = prepare_submission(submission)?;
        self.assistant.coach(&prepared, progress).await
    }

    /// Reads an uploaded file and coaches it. Read failures stop the run
    /// before any model request.
    pub async fn coach_upload(
        &self,
        file_name: &str,
        data: &[u8],
        progress: Option<Sender<CoachingEvent>>,
    ) -> Result<CoachingReport> {
        let submission = read_submission(file_name, data)?;
        self.coach(submission, progress).await
    }

    pub async fn coach_form(
        &self,
        form: FormSubmission,
        progress: Option<Sender<CoachingEvent>>,
    ) -> Result<CoachingReport> {
        self.coach(Submission::Structured(form.into_payload()), progress)
            .await
    }

    /// Runs the whole pipeline and renders the `.docx` report.
    pub async fn coach_and_render(
        &self,
        submission: Submission,
        options: &ReportOptions,
        progress: Option<Sender<CoachingEvent>>,
    ) -> Result<RenderedReport> {
        let report = self.coach(submission, progress).await?;
        render_report(&report.markdown, &report.metadata, options)
    }
}

pub async fn coach_submission<M: CoachingModel>(
    model: M,
    submission: Submission,
) -> Result<CoachingReport> {
    BmcCoach::new(model).coach(submission, None).await
}
