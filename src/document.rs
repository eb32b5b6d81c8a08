//! Reading uploads into a structure-only document model.
//!
//! Field extraction works on [`ParsedDocument`], never on format-specific
//! types, so the same strategies apply to Word files and plain text.

use crate::error::{CoachError, Result};
use docx_rs::{
    read_docx, DocumentChild, Insert, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table,
    TableCell, TableCellContent, TableChild, TableRowChild,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Docx,
    Pdf,
    Text,
}

impl DocumentFormat {
    pub fn label(self) -> &'static str {
        match self {
            DocumentFormat::Docx => "Word",
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Text => "text",
        }
    }

    /// Picks a format from the file name, falling back to the leading bytes.
    pub fn detect(file_name: &str, data: &[u8]) -> Result<Self> {
        let mime = mime_guess::from_path(file_name).first_raw();
        let by_name = match mime {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                Some(DocumentFormat::Docx)
            }
            Some("application/pdf") => Some(DocumentFormat::Pdf),
            Some(mime) if mime.starts_with("text/") => Some(DocumentFormat::Text),
            _ => None,
        };

        if let Some(format) = by_name {
            return Ok(format);
        }

        if looks_like_pdf(data) {
            return Ok(DocumentFormat::Pdf);
        }
        if looks_like_docx(data) {
            return Ok(DocumentFormat::Docx);
        }
        if !data.is_empty() && std::str::from_utf8(data).is_ok() {
            warn!(
                "Unknown document type for '{}', treating it as plain text",
                file_name
            );
            return Ok(DocumentFormat::Text);
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or(file_name);
        Err(CoachError::UnsupportedFormat(extension.to_string()))
    }
}

fn looks_like_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF-")
}

fn looks_like_docx(data: &[u8]) -> bool {
    data.len() > 4 && data.starts_with(b"PK")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBlock {
    Paragraph(String),
    /// Rows of cell texts. Multi-paragraph cells are newline-joined.
    Table(Vec<Vec<String>>),
}

/// A document reduced to its top-level paragraphs and tables, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub blocks: Vec<DocumentBlock>,
}

impl ParsedDocument {
    pub fn new(blocks: Vec<DocumentBlock>) -> Self {
        Self { blocks }
    }

    pub fn tables(&self) -> impl Iterator<Item = &Vec<Vec<String>>> {
        self.blocks.iter().filter_map(|block| match block {
            DocumentBlock::Table(rows) => Some(rows),
            DocumentBlock::Paragraph(_) => None,
        })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            DocumentBlock::Paragraph(text) => Some(text.as_str()),
            DocumentBlock::Table(_) => None,
        })
    }

    /// One paragraph per line of text.
    pub fn from_text(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        Self::new(
            normalized
                .trim_start_matches('\u{FEFF}')
                .lines()
                .map(|line| DocumentBlock::Paragraph(line.trim_end().to_string()))
                .collect(),
        )
    }

    pub fn from_docx_bytes(data: &[u8]) -> Result<Self> {
        let docx = read_docx(data).map_err(|err| CoachError::DocumentRead {
            format: DocumentFormat::Docx.label().to_string(),
            reason: err.to_string(),
        })?;

        let mut blocks = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => {
                    blocks.push(DocumentBlock::Paragraph(paragraph_text(paragraph)));
                }
                DocumentChild::Table(table) => {
                    blocks.push(DocumentBlock::Table(table_rows(table)));
                }
                _ => {}
            }
        }

        debug!("Read Word document with {} top-level blocks", blocks.len());
        Ok(Self::new(blocks))
    }
}

fn table_rows(table: &Table) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for row in &table.rows {
        let row = match row {
            TableChild::TableRow(row) => row,
        };
        let cells = row
            .cells
            .iter()
            .map(|cell| match cell {
                TableRowChild::TableCell(cell) => cell_text(cell),
            })
            .collect();
        rows.push(cells);
    }
    rows
}

fn cell_text(cell: &TableCell) -> String {
    let mut lines = Vec::new();
    for content in &cell.children {
        match content {
            TableCellContent::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
            TableCellContent::Table(inner) => {
                for row in table_rows(inner) {
                    lines.push(row.join(" "));
                }
            }
            _ => {}
        }
    }
    lines.join("\n")
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        append_paragraph_child_text(child, &mut buffer);
    }
    buffer
}

fn append_paragraph_child_text(child: &ParagraphChild, buffer: &mut String) {
    match child {
        ParagraphChild::Run(run) => append_run_text(run, buffer),
        ParagraphChild::Insert(insert) => append_insert_text(insert, buffer),
        ParagraphChild::Hyperlink(hyperlink) => {
            for inner in &hyperlink.children {
                append_paragraph_child_text(inner, buffer);
            }
        }
        _ => {}
    }
}

fn append_insert_text(insert: &Insert, buffer: &mut String) {
    for child in &insert.children {
        if let InsertChild::Run(run) = child {
            append_run_text(run, buffer);
        }
    }
}

fn append_run_text(run: &Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(text) => buffer.push_str(&text.text),
            RunChild::Break(_) => buffer.push('\n'),
            RunChild::Tab(_) => buffer.push('\t'),
            _ => {}
        }
    }
}

/// Plain text of a PDF, for the unstructured path.
pub fn pdf_text(data: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(data)
        .map(|text| text.trim().to_string())
        .map_err(|err| CoachError::DocumentRead {
            format: DocumentFormat::Pdf.label().to_string(),
            reason: err.to_string(),
        })
}

/// Text of a plain-text upload, tolerating invalid UTF-8.
pub fn decode_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!("Document contained invalid UTF-8; replacing undecodable bytes");
            String::from_utf8_lossy(data).into_owned()
        }
    }
}
