//! Deterministic repair of the model's markdown.
//!
//! The model is asked for `## <section>` and `### <subheading>` markers but
//! frequently drops them, adds bold wrapping, or repeats the advisory footer.
//! [`normalize_markdown`] restores the heading hierarchy from the fixed title
//! taxonomy and removes footer lines; it never rewrites prose or bullets.

use crate::taxonomy::{
    canonical_section_title, canonical_subheading_title, is_section_title, is_subheading_title,
    SECTION_PREFIX, SUBSECTION_PREFIX,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// The advisory footer appended once to every report.
pub const ADVISORY_FOOTER: &str = "This feedback is AI-generated and advisory only. Review it with a coach or mentor before making business decisions.";

/// Footer variants the model has been seen to echo back.
pub const ADVISORY_FOOTERS: &[&str] = &[
    ADVISORY_FOOTER,
    "This feedback is AI-generated and advisory only.",
    "Disclaimer: This feedback is AI-generated and advisory only.",
];

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|md)?[ \t]*\n(.*?)\n?```$").unwrap());

/// Role of a line in a normalized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Section(&'a str),
    Subsection(&'a str),
    Bullet(&'a str),
    Prose(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some(title) = trimmed.strip_prefix(SUBSECTION_PREFIX) {
        return LineKind::Subsection(title.trim());
    }
    if let Some(title) = trimmed.strip_prefix(SECTION_PREFIX) {
        return LineKind::Section(title.trim());
    }
    if let Some(title) = trimmed.strip_prefix("# ") {
        return LineKind::Section(title.trim());
    }
    for marker in ["- ", "* ", "• "] {
        if let Some(item) = trimmed.strip_prefix(marker) {
            return LineKind::Bullet(item.trim());
        }
    }
    LineKind::Prose(trimmed)
}

pub fn is_advisory_footer(line: &str) -> bool {
    let trimmed = line.trim();
    let unwrapped = trimmed.trim_matches(|c| c == '*' || c == '_').trim();
    ADVISORY_FOOTERS
        .iter()
        .any(|footer| trimmed == *footer || unwrapped == *footer)
}

/// Rewrites bare or decorated title lines as headings and drops footer lines.
pub fn normalize_markdown(raw: &str) -> String {
    let text = strip_outer_fences(&raw.replace("\r\n", "\n").replace('\r', "\n"));

    let mut lines = Vec::new();
    for line in text.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            lines.push(line.to_string());
            continue;
        }
        if is_advisory_footer(trimmed) {
            continue;
        }
        match heading_for(trimmed) {
            Some(heading) => lines.push(heading),
            None => lines.push(line.to_string()),
        }
    }
    lines.join("\n")
}

fn strip_outer_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    match RE_OUTER_FENCES.captures(trimmed) {
        Some(caps) => caps[1].to_string(),
        None => raw.to_string(),
    }
}

fn heading_for(trimmed: &str) -> Option<String> {
    if is_section_title(trimmed) {
        return Some(format!("{SECTION_PREFIX}{trimmed}"));
    }
    if is_subheading_title(trimmed) {
        return Some(format!("{SUBSECTION_PREFIX}{trimmed}"));
    }

    let candidate = heading_candidate(trimmed)?;
    if let Some(title) = canonical_section_title(candidate) {
        // A bare block name is usually a reference inside another section.
        let numbered = leading_number(candidate).is_some_and(|n| leading_number(title) == Some(n));
        return (numbered || has_major_marker(trimmed))
            .then(|| format!("{SECTION_PREFIX}{title}"));
    }
    canonical_subheading_title(candidate).map(|title| format!("{SUBSECTION_PREFIX}{title}"))
}

/// One or two leading `#`; deeper levels are subheadings.
fn has_major_marker(trimmed: &str) -> bool {
    let hashes = trimmed.len() - trimmed.trim_start_matches('#').len();
    (1..=2).contains(&hashes)
}

fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Text of a line that might be a paraphrased title, without heading
/// markers or bold wrapping. Bullets are never candidates.
fn heading_candidate(trimmed: &str) -> Option<&str> {
    if ["- ", "* ", "• ", "> "]
        .iter()
        .any(|marker| trimmed.starts_with(marker))
    {
        return None;
    }
    let without_hashes = trimmed.trim_start_matches('#').trim();
    let unwrapped = without_hashes
        .strip_prefix("**")
        .and_then(|rest| rest.strip_suffix("**").or_else(|| rest.strip_suffix("**:")))
        .unwrap_or(without_hashes)
        .trim();
    if unwrapped.is_empty() {
        None
    } else {
        Some(unwrapped)
    }
}

/// A run of lines headed by a major section heading, or the preamble
/// before the first heading (`title == None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub title: Option<&'a str>,
    pub lines: Vec<&'a str>,
}

impl<'a> Section<'a> {
    /// Lines after the heading.
    pub fn body(&self) -> &[&'a str] {
        match self.title {
            Some(_) => &self.lines[1..],
            None => &self.lines,
        }
    }
}

/// Splits a normalized document at its `## ` section headings.
pub fn sections(markdown: &str) -> Vec<Section<'_>> {
    let mut result = Vec::new();
    let mut current = Section {
        title: None,
        lines: Vec::new(),
    };

    for line in markdown.split('\n') {
        if let Some(title) = section_heading_title(line) {
            if current.title.is_some() || !current.lines.is_empty() {
                result.push(current);
            }
            current = Section {
                title: Some(title),
                lines: vec![line],
            };
        } else {
            current.lines.push(line);
        }
    }

    if current.title.is_some() || !current.lines.is_empty() {
        result.push(current);
    }
    result
}

/// Title of a `## ` heading line; `### ` lines are not section headings.
pub fn section_heading_title(line: &str) -> Option<&str> {
    line.trim_end()
        .strip_prefix(SECTION_PREFIX)
        .map(str::trim)
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_subheading_gets_marker() {
        let raw = "## 1) Problem\nStrengths\n- Clear pain point";
        assert_eq!(
            normalize_markdown(raw),
            "## 1) Problem\n### Strengths\n- Clear pain point"
        );
    }

    #[test]
    fn test_bare_section_title_gets_marker() {
        let raw = "10) Revenue Streams\n\nWeaknesses\nPricing is unclear.";
        assert_eq!(
            normalize_markdown(raw),
            "## 10) Revenue Streams\n\n### Weaknesses\nPricing is unclear."
        );
    }

    #[test]
    fn test_footer_lines_are_dropped() {
        let raw = format!(
            "## 14) Final Assessment\n{ADVISORY_FOOTER}\nKey Risks\n- Cash runway\n*{ADVISORY_FOOTER}*\n"
        );
        let normalized = normalize_markdown(&raw);
        assert!(!normalized.contains(ADVISORY_FOOTER));
        assert_eq!(
            normalized,
            "## 14) Final Assessment\n### Key Risks\n- Cash runway\n"
        );
    }

    #[test]
    fn test_decorated_and_paraphrased_titles() {
        let raw = "# 2) Value Proposition\n**Strengths**\n#### probing questions:\n**3. Unfair Advantage**\n## channels";
        assert_eq!(
            normalize_markdown(raw),
            "## 2) Value Proposition\n### Strengths\n### Probing Questions\n## 3) Unfair Advantage\n## 5) Channels"
        );
    }

    #[test]
    fn test_unnumbered_block_names_stay_in_place() {
        let raw = "## 13) Cross-Block Observations\n### Alignment Across Blocks\n**Channels:**\n- Carts on platforms fit commuters\nRevenue Streams\nPROBLEM\n### Channels\n### Gaps and Inconsistencies\n- Pricing unclear";
        assert_eq!(normalize_markdown(raw), raw);
    }

    #[test]
    fn test_prose_and_bullets_are_untouched() {
        let raw = "- Strengths\nThe strengths here are many.\n> Strengths\n  indented prose  ";
        assert_eq!(normalize_markdown(raw), raw);
    }

    #[test]
    fn test_outer_fence_and_crlf_are_removed() {
        let raw = "```markdown\r\n## 5) Channels\r\nStrengths\r\n```";
        assert_eq!(normalize_markdown(raw), "## 5) Channels\n### Strengths");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = "Intro\n1) Problem\nstrengths:\n- a\n**Weaknesses**\n\n13) Cross-Block Observations\n";
        let once = normalize_markdown(raw);
        assert_eq!(normalize_markdown(&once), once);
    }

    #[test]
    fn test_sections_split_on_level_two_only() {
        let doc = "Preamble\n## 1) Problem\n### Strengths\n- a\n## 2) Value Proposition\n- b";
        let parts = sections(doc);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].title, None);
        assert_eq!(parts[1].title, Some("1) Problem"));
        assert_eq!(parts[1].body(), &["### Strengths", "- a"]);
        assert_eq!(parts[2].title, Some("2) Value Proposition"));
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line(""), LineKind::Blank);
        assert_eq!(classify_line("## 1) Problem"), LineKind::Section("1) Problem"));
        assert_eq!(classify_line("### Strengths"), LineKind::Subsection("Strengths"));
        assert_eq!(classify_line("* item"), LineKind::Bullet("item"));
        assert_eq!(classify_line("Plain text"), LineKind::Prose("Plain text"));
    }
}
