//! Word report rendering.
//!
//! Input is normalized, enforced markdown. Headings map onto Word heading
//! styles, bullets onto a single bulleted list, and everything else onto
//! plain paragraphs. The advisory footer is always the last paragraph.

use crate::error::{CoachError, Result};
use crate::markdown::{classify_line, is_advisory_footer, LineKind, ADVISORY_FOOTER};
use crate::schema::ReportMetadata;
use crate::taxonomy::SECTION_PREFIX;
use chrono::{Local, NaiveDate};
use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat,
    Numbering, NumberingId, Paragraph, Pic, Run, SpecialIndentType, Start, Style, StyleType,
};
use image::imageops::FilterType;
use image::ImageFormat;
use log::{debug, info, warn};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DEFAULT_COACH_NAME: &str = "BMC Coach";

const TITLE: &str = "Title";
const HEADING_1: &str = "Heading1";
const HEADING_2: &str = "Heading2";
const BULLET_NUMBERING_ID: usize = 1;
const EMU_PER_PIXEL: u32 = 9525;
const LOGO_MAX_WIDTH_PX: u32 = 160;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub coach_name: String,
    pub logo_path: Option<PathBuf>,
    pub generated_on: NaiveDate,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            coach_name: DEFAULT_COACH_NAME.to_string(),
            logo_path: None,
            generated_on: Local::now().date_naive(),
        }
    }
}

impl ReportOptions {
    pub fn with_coach_name(mut self, coach_name: impl Into<String>) -> Self {
        self.coach_name = coach_name.into();
        self
    }

    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }
}

/// A packed `.docx` ready to be written or served.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
    /// Non-fatal problems, such as a logo that could not be embedded.
    pub warnings: Vec<String>,
}

impl RenderedReport {
    pub fn mime_type(&self) -> &'static str {
        DOCX_MIME_TYPE
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `<Coach_Name>_Feedback_<Business_Name>.docx`, with spaces turned into
/// underscores and anything outside `[A-Za-z0-9_-]` dropped.
pub fn report_file_name(coach_name: &str, business_name: &str) -> String {
    let coach = file_name_part(coach_name, "Coach");
    let business = file_name_part(business_name, "Business");
    format!("{coach}_Feedback_{business}.docx")
}

fn file_name_part(raw: &str, fallback: &str) -> String {
    let part: String = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if part.trim_matches('_').is_empty() {
        fallback.to_string()
    } else {
        part
    }
}

pub fn render_report(
    markdown: &str,
    metadata: &ReportMetadata,
    options: &ReportOptions,
) -> Result<RenderedReport> {
    let mut warnings = Vec::new();
    let mut docx = base_document();

    if let Some(path) = &options.logo_path {
        match load_logo(path) {
            Ok(pic) => {
                docx = docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_image(pic))
                        .align(AlignmentType::Center),
                );
            }
            Err(reason) => {
                let message = format!("Logo '{}' skipped: {}", path.display(), reason);
                warn!("{}", message);
                warnings.push(message);
            }
        }
    }

    for paragraph in title_block(metadata, options) {
        docx = docx.add_paragraph(paragraph);
    }

    let mut body_paragraphs = 0usize;
    for line in markdown.lines() {
        if is_advisory_footer(line) {
            continue;
        }
        if let Some(paragraph) = body_paragraph(line) {
            docx = docx.add_paragraph(paragraph);
            body_paragraphs += 1;
        }
    }
    debug!("Rendered {} body paragraphs", body_paragraphs);

    docx = docx.add_paragraph(
        Paragraph::new().add_run(Run::new().add_text(ADVISORY_FOOTER).italic().size(18)),
    );

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| CoachError::Render(e.to_string()))?;

    let file_name = report_file_name(&options.coach_name, &metadata.business_name);
    info!("Packed report '{}'", file_name);

    Ok(RenderedReport {
        bytes: cursor.into_inner(),
        file_name,
        warnings,
    })
}

fn base_document() -> Docx {
    let bullet_level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    )
    .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None);

    Docx::new()
        .add_style(
            Style::new(TITLE, StyleType::Paragraph)
                .name("Title")
                .size(40)
                .bold()
                .color("1F3864"),
        )
        .add_style(
            Style::new(HEADING_1, StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold()
                .color("1F3864"),
        )
        .add_style(
            Style::new(HEADING_2, StyleType::Paragraph)
                .name("Heading 2")
                .size(26)
                .bold()
                .color("2F5496"),
        )
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(bullet_level))
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
}

fn title_block(metadata: &ReportMetadata, options: &ReportOptions) -> Vec<Paragraph> {
    let business = metadata.business_name.trim();
    let title = if business.is_empty() {
        "Business Model Canvas Feedback".to_string()
    } else {
        format!("Business Model Canvas Feedback: {}", business)
    };

    let mut block = vec![Paragraph::new()
        .add_run(Run::new().add_text(title).bold().size(40))
        .align(AlignmentType::Center)];

    let description = metadata.brief_description.trim();
    if !description.is_empty() {
        block.push(
            Paragraph::new()
                .add_run(Run::new().add_text(description).italic())
                .align(AlignmentType::Center),
        );
    }

    block.push(
        Paragraph::new()
            .add_run(Run::new().add_text(format!(
                "Prepared by {} on {}",
                options.coach_name.trim(),
                options.generated_on.format("%B %-d, %Y")
            )))
            .align(AlignmentType::Center),
    );
    block
}

fn body_paragraph(line: &str) -> Option<Paragraph> {
    match classify_line(line) {
        LineKind::Blank => None,
        LineKind::Section(title) if line.trim_start().starts_with(SECTION_PREFIX) => {
            Some(Paragraph::new().add_run(Run::new().add_text(title)).style(HEADING_1))
        }
        LineKind::Section(title) => {
            Some(Paragraph::new().add_run(Run::new().add_text(title)).style(TITLE))
        }
        LineKind::Subsection(title) => {
            Some(Paragraph::new().add_run(Run::new().add_text(title)).style(HEADING_2))
        }
        LineKind::Bullet(item) => Some(
            inline_runs(item)
                .into_iter()
                .fold(Paragraph::new(), |p, run| p.add_run(run))
                .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0)),
        ),
        LineKind::Prose(text) => Some(
            inline_runs(text)
                .into_iter()
                .fold(Paragraph::new(), |p, run| p.add_run(run)),
        ),
    }
}

/// Splits `**bold**` spans into bold runs. Unbalanced markers are kept as
/// literal text.
fn inline_runs(text: &str) -> Vec<Run> {
    let pieces: Vec<&str> = text.split("**").collect();
    if pieces.len() % 2 == 0 {
        return vec![Run::new().add_text(text)];
    }
    pieces
        .iter()
        .enumerate()
        .filter(|(_, piece)| !piece.is_empty())
        .map(|(index, piece)| {
            let run = Run::new().add_text(*piece);
            if index % 2 == 1 {
                run.bold()
            } else {
                run
            }
        })
        .collect()
}

/// Decodes any image format the `image` crate reads, scales it down to
/// the logo width and embeds it as PNG.
fn load_logo(path: &Path) -> std::result::Result<Pic, String> {
    let mut logo = image::open(path).map_err(|e| e.to_string())?;
    if logo.width() > LOGO_MAX_WIDTH_PX {
        logo = logo.resize(LOGO_MAX_WIDTH_PX, u32::MAX, FilterType::Lanczos3);
    }
    let (width, height) = (logo.width(), logo.height());

    let mut png = Cursor::new(Vec::new());
    logo.write_to(&mut png, ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(Pic::new_with_dimensions(png.into_inner(), width, height)
        .size(width * EMU_PER_PIXEL, height * EMU_PER_PIXEL))
}
