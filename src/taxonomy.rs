//! Section and subsection titles of the coaching report.
//!
//! The same tables feed the response template sent to the model, the
//! markdown normalizer and the missing-block enforcer.

use crate::labels::normalize_label;
use crate::schema::{CanvasField, FounderPayload};
use once_cell::sync::Lazy;
use serde::Serialize;

pub const SECTION_TITLES: [&str; 14] = [
    "1) Problem",
    "2) Value Proposition",
    "3) Unfair Advantage",
    "4) Customer Segments",
    "5) Channels",
    "6) Customer Relationships",
    "7) Key Activities",
    "8) Key Resources",
    "9) Key Partners",
    "10) Revenue Streams",
    "11) Cost Structure",
    "12) Kingdom Impact",
    "13) Cross-Block Observations",
    "14) Final Assessment",
];

pub const CROSS_BLOCK_TITLE: &str = "13) Cross-Block Observations";
pub const FINAL_ASSESSMENT_TITLE: &str = "14) Final Assessment";

pub const BLOCK_SUBHEADINGS: [&str; 4] = [
    "Strengths",
    "Weaknesses",
    "Probing Questions",
    "Suggested Explorations",
];

pub const CROSS_BLOCK_SUBHEADINGS: [&str; 2] =
    ["Alignment Across Blocks", "Gaps and Inconsistencies"];

pub const FINAL_ASSESSMENT_SUBHEADINGS: [&str; 3] =
    ["Overall Strengths", "Key Risks", "Recommended Next Steps"];

pub const SECTION_PREFIX: &str = "## ";
pub const SUBSECTION_PREFIX: &str = "### ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Block,
    CrossBlock,
    FinalAssessment,
}

impl SectionKind {
    pub fn of(title: &str) -> Self {
        match title {
            CROSS_BLOCK_TITLE => SectionKind::CrossBlock,
            FINAL_ASSESSMENT_TITLE => SectionKind::FinalAssessment,
            _ => SectionKind::Block,
        }
    }

    pub fn subheadings(self) -> &'static [&'static str] {
        match self {
            SectionKind::Block => &BLOCK_SUBHEADINGS,
            SectionKind::CrossBlock => &CROSS_BLOCK_SUBHEADINGS,
            SectionKind::FinalAssessment => &FINAL_ASSESSMENT_SUBHEADINGS,
        }
    }
}

/// Subheadings expected under a major section.
pub fn subheadings_for(title: &str) -> &'static [&'static str] {
    SectionKind::of(title).subheadings()
}

/// Major title for a canvas block; `None` for the metadata fields.
pub fn section_title(field: CanvasField) -> Option<&'static str> {
    CanvasField::BLOCKS
        .iter()
        .position(|block| *block == field)
        .map(|index| SECTION_TITLES[index])
}

pub fn is_section_title(text: &str) -> bool {
    SECTION_TITLES.contains(&text)
}

pub fn is_subheading_title(text: &str) -> bool {
    BLOCK_SUBHEADINGS.contains(&text)
        || CROSS_BLOCK_SUBHEADINGS.contains(&text)
        || FINAL_ASSESSMENT_SUBHEADINGS.contains(&text)
}

static NORMALIZED_SECTIONS: Lazy<Vec<(String, &'static str)>> = Lazy::new(|| {
    SECTION_TITLES
        .iter()
        .map(|title| (normalize_label(title), *title))
        .collect()
});

static NORMALIZED_SUBHEADINGS: Lazy<Vec<(String, &'static str)>> = Lazy::new(|| {
    BLOCK_SUBHEADINGS
        .iter()
        .chain(CROSS_BLOCK_SUBHEADINGS.iter())
        .chain(FINAL_ASSESSMENT_SUBHEADINGS.iter())
        .map(|title| (normalize_label(title), *title))
        .collect()
});

/// Canonical section title for a paraphrased candidate such as `"problem:"`.
pub fn canonical_section_title(candidate: &str) -> Option<&'static str> {
    let key = normalize_label(candidate);
    NORMALIZED_SECTIONS
        .iter()
        .find(|(normalized, _)| *normalized == key)
        .map(|(_, title)| *title)
}

/// Canonical subheading for a paraphrased candidate such as `"STRENGTHS:"`.
pub fn canonical_subheading_title(candidate: &str) -> Option<&'static str> {
    let key = normalize_label(candidate);
    NORMALIZED_SUBHEADINGS
        .iter()
        .find(|(normalized, _)| *normalized == key)
        .map(|(_, title)| *title)
}

/// Titles of the canvas blocks with no founder content, in section order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmptyBlocks(Vec<&'static str>);

impl EmptyBlocks {
    pub fn titles(&self) -> &[&'static str] {
        &self.0
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.iter().any(|candidate| *candidate == title)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[&'static str]> for EmptyBlocks {
    fn as_ref(&self) -> &[&'static str] {
        &self.0
    }
}

pub fn empty_blocks(payload: &FounderPayload) -> EmptyBlocks {
    EmptyBlocks(
        CanvasField::BLOCKS
            .iter()
            .zip(SECTION_TITLES.iter())
            .filter(|(field, _)| payload.is_blank(**field))
            .map(|(_, title)| *title)
            .collect(),
    )
}
