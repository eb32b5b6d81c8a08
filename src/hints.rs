//! Placeholder text from the authoring template.
//!
//! Founders often leave the template's guidance questions in place. Those
//! lines must not count as founder content, otherwise an untouched block would
//! look filled in.

/// Lowercase snippets of the guidance text printed in each template block.
pub const HINT_SNIPPETS: &[&str] = &[
    "enter the name of your business",
    "describe your business in one or two sentences",
    "what problem are you solving",
    "what unique value do you offer",
    "what makes you hard to copy",
    "which customer groups are you targeting",
    "how will you reach your customers",
    "how will you build and keep relationships",
    "what key activities does your business",
    "what key resources do you need",
    "who are your key partners",
    "how will you make money",
    "what are your main costs",
    "how does your business advance the kingdom",
];

pub fn is_hint_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    HINT_SNIPPETS
        .iter()
        .any(|snippet| lowered.contains(snippet))
}

/// Drops blank lines and template guidance lines, keeping founder text.
pub fn clean_hint_text(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !is_hint_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
