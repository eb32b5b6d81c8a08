use crate::document::{decode_text, pdf_text, DocumentFormat, ParsedDocument};
use crate::error::Result;
use crate::hints::clean_hint_text;
use crate::labels::{match_alias, normalize_label, resolve_label};
use crate::schema::{CanvasField, FormSubmission, FounderPayload, Submission};
use log::{debug, info};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    Table,
    HeadingParagraphs,
}

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub payload: FounderPayload,
    /// The strategy that produced content, if any did.
    pub strategy: Option<ExtractionStrategy>,
}

/// Extracts the founder payload from a parsed document.
///
/// The table strategy runs first; if any row assigned content its result is
/// final. Otherwise paragraphs are scanned for heading labels. A document
/// with no recognizable content yields an all-empty payload, which callers
/// report as a detection failure.
pub fn extract_payload(document: &ParsedDocument) -> ExtractionOutcome {
    let mut payload = FounderPayload::new();

    if extract_from_tables(document, &mut payload) {
        info!(
            "Extracted {} fields using the table layout",
            payload.filled_count()
        );
        return ExtractionOutcome {
            payload,
            strategy: Some(ExtractionStrategy::Table),
        };
    }

    if extract_from_headings(document, &mut payload) {
        info!(
            "Extracted {} fields using heading paragraphs",
            payload.filled_count()
        );
        return ExtractionOutcome {
            payload,
            strategy: Some(ExtractionStrategy::HeadingParagraphs),
        };
    }

    info!("No canvas fields recognized in document");
    ExtractionOutcome {
        payload,
        strategy: None,
    }
}

/// Returns true if any row assigned non-empty content.
fn extract_from_tables(document: &ParsedDocument, payload: &mut FounderPayload) -> bool {
    let mut assigned = false;

    for rows in document.tables() {
        for row in rows {
            if row.len() < 2 {
                continue;
            }

            let Some(field) = resolve_label(&row[0]) else {
                continue;
            };

            let value = clean_hint_text(&row[1]);
            if payload.merge_non_empty(field, &value) {
                debug!("Table row '{}' -> {}", row[0].trim(), field.key());
                assigned = true;
            } else {
                debug!("Table row '{}' has no founder content", row[0].trim());
            }
        }
    }

    assigned
}

fn extract_from_headings(document: &ParsedDocument, payload: &mut FounderPayload) -> bool {
    let mut cursor: Option<CanvasField> = None;

    for paragraph in document.paragraphs() {
        let text = paragraph.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(field) = match_alias(text) {
            debug!("Heading '{}' -> {}", text, field.key());
            cursor = Some(field);
            continue;
        }

        if let Some((field, rest)) = split_inline_label(text) {
            debug!("Inline label '{}' -> {}", text, field.key());
            cursor = Some(field);
            let cleaned = clean_hint_text(rest);
            if !cleaned.is_empty() {
                payload.append(field, &cleaned);
            }
            continue;
        }

        let Some(field) = cursor else {
            continue;
        };

        let cleaned = clean_hint_text(text);
        if !cleaned.is_empty() {
            payload.append(field, &cleaned);
        }
    }

    payload.has_content()
}

/// Splits `"5) Channels: farmers markets"` into the field and its inline
/// text. Only numbered or multi-word labels qualify, so prose such as
/// `"Cost: about $12k"` stays with the current field.
fn split_inline_label(text: &str) -> Option<(CanvasField, &str)> {
    let (label, rest) = text.split_once(':')?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    let label = label.trim();
    let numbered = label.starts_with(|c: char| c.is_ascii_digit());
    if !numbered && !normalize_label(label).contains(' ') {
        return None;
    }
    match_alias(label).map(|field| (field, rest))
}

impl FormSubmission {
    /// Converts the form record into a payload, dropping template hint text.
    pub fn into_payload(self) -> FounderPayload {
        let mut payload = FounderPayload::new();
        for field in CanvasField::ALL {
            payload.set(field, clean_hint_text(self.value(field)));
        }
        payload
    }
}

/// Reads an uploaded file into a submission.
pub fn read_submission(file_name: &str, data: &[u8]) -> Result<Submission> {
    let format = DocumentFormat::detect(file_name, data)?;
    info!("Reading '{}' as a {} document", file_name, format.label());

    match format {
        DocumentFormat::Docx => {
            let document = ParsedDocument::from_docx_bytes(data)?;
            Ok(Submission::Structured(extract_payload(&document).payload))
        }
        DocumentFormat::Text => {
            let document = ParsedDocument::from_text(&decode_text(data));
            Ok(Submission::Structured(extract_payload(&document).payload))
        }
        DocumentFormat::Pdf => Ok(Submission::Unstructured {
            text: pdf_text(data)?,
        }),
    }
}

pub fn read_submission_file(path: &Path) -> Result<Submission> {
    let data = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    read_submission(file_name, &data)
}
