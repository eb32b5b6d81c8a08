//! Placeholder substitution for canvas blocks the founder left empty.
//!
//! Whatever the model wrote for an empty block is discarded and replaced by
//! the canonical subheadings, each carrying the single [`MISSING_MARKER`]
//! bullet. This holds regardless of whether the model followed its
//! instructions, so no invented content reaches the founder.

use crate::markdown::sections;
use crate::taxonomy::{subheadings_for, SECTION_PREFIX, SECTION_TITLES, SUBSECTION_PREFIX};
use log::debug;

pub const MISSING_MARKER: &str = "Missing/Needs input.";

/// The replacement lines for one empty section, ending with a blank line.
pub fn placeholder_block(title: &str) -> Vec<String> {
    let mut lines = vec![format!("{SECTION_PREFIX}{title}")];
    for subheading in subheadings_for(title) {
        lines.push(format!("{SUBSECTION_PREFIX}{subheading}"));
        lines.push(format!("- {MISSING_MARKER}"));
    }
    lines.push(String::new());
    lines
}

fn taxonomy_index(title: &str) -> Option<usize> {
    SECTION_TITLES.iter().position(|candidate| *candidate == title)
}

/// Replaces every section listed in `empty_blocks` with its placeholder block.
///
/// Sections not listed pass through byte-identical. A listed taxonomy section
/// the model omitted is inserted before the next section in taxonomy order
/// (or at the end). Applying this twice with the same list changes nothing.
pub fn enforce_missing_blocks<S: AsRef<str>>(markdown: &str, empty_blocks: &[S]) -> String {
    let is_empty_block =
        |title: &str| empty_blocks.iter().any(|candidate| candidate.as_ref() == title);

    let parts = sections(markdown);

    let mut pending: Vec<(usize, &str)> = empty_blocks
        .iter()
        .map(|title| title.as_ref())
        .filter(|title| !parts.iter().any(|part| part.title == Some(*title)))
        .filter_map(|title| taxonomy_index(title).map(|index| (index, title)))
        .collect();
    pending.sort_by_key(|(index, _)| *index);
    pending.dedup();

    let mut output: Vec<String> = Vec::new();

    for part in &parts {
        if let Some(index) = part.title.and_then(taxonomy_index) {
            while let Some((missing_index, missing_title)) = pending.first().copied() {
                if missing_index > index {
                    break;
                }
                debug!("Inserting placeholder for omitted section '{}'", missing_title);
                push_block(&mut output, placeholder_block(missing_title));
                pending.remove(0);
            }
        }

        match part.title {
            Some(title) if is_empty_block(title) => {
                debug!("Replacing model output for empty block '{}'", title);
                push_block(&mut output, placeholder_block(title));
            }
            _ => output.extend(part.lines.iter().map(|line| line.to_string())),
        }
    }

    for (_, missing_title) in pending {
        debug!("Appending placeholder for omitted section '{}'", missing_title);
        push_block(&mut output, placeholder_block(missing_title));
    }

    output.join("\n")
}

fn push_block(output: &mut Vec<String>, block: Vec<String>) {
    if output.last().is_some_and(|line| !line.trim().is_empty()) {
        output.push(String::new());
    }
    output.extend(block);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "# Feedback\n\n## 1) Problem\n### Strengths\n- Invented strength\n### Weaknesses\n- Invented weakness\n\n## 2) Value Proposition\n### Strengths\n- Fast delivery\n";

    #[test]
    fn test_empty_block_is_replaced() {
        let enforced = enforce_missing_blocks(RESPONSE, &["1) Problem"]);
        assert!(!enforced.contains("Invented"));
        assert_eq!(
            enforced,
            "# Feedback\n\n## 1) Problem\n### Strengths\n- Missing/Needs input.\n### Weaknesses\n- Missing/Needs input.\n### Probing Questions\n- Missing/Needs input.\n### Suggested Explorations\n- Missing/Needs input.\n\n## 2) Value Proposition\n### Strengths\n- Fast delivery\n"
        );
    }

    #[test]
    fn test_no_empty_blocks_is_identity() {
        let empty: [&str; 0] = [];
        assert_eq!(enforce_missing_blocks(RESPONSE, &empty), RESPONSE);
    }

    #[test]
    fn test_enforcement_is_idempotent() {
        let blocks = ["1) Problem", "2) Value Proposition"];
        let once = enforce_missing_blocks(RESPONSE, &blocks);
        assert_eq!(enforce_missing_blocks(&once, &blocks), once);
    }

    #[test]
    fn test_special_sections_use_their_subheadings() {
        let block = placeholder_block("13) Cross-Block Observations");
        assert_eq!(block.len(), 1 + 2 * 2 + 1);
        let block = placeholder_block("14) Final Assessment");
        assert_eq!(block[1], "### Overall Strengths");
        assert_eq!(block.len(), 1 + 3 * 2 + 1);
    }

    #[test]
    fn test_omitted_section_is_inserted_in_order() {
        let markdown = "## 1) Problem\n- ok\n\n## 5) Channels\n- ok\n";
        let enforced = enforce_missing_blocks(markdown, &["4) Customer Segments", "12) Kingdom Impact"]);
        let segments = enforced.find("## 4) Customer Segments").unwrap();
        let channels = enforced.find("## 5) Channels").unwrap();
        let kingdom = enforced.find("## 12) Kingdom Impact").unwrap();
        assert!(segments < channels && channels < kingdom);
        assert_eq!(
            enforce_missing_blocks(&enforced, &["4) Customer Segments", "12) Kingdom Impact"]),
            enforced
        );
    }
}
