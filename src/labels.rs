//! Label normalization and the canonical field alias table.
//!
//! Every comparison between a human-written label and a canonical field goes
//! through [`normalize_label`], so numbering, casing, trailing colons and
//! stray whitespace never affect matching.

use crate::schema::CanvasField;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static RE_ENUMERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.):\-]\s*").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Canonicalizes a label into a lookup key.
///
/// `"  3) Unfair Advantage: "` becomes `"unfair advantage"`. Total and pure:
/// empty input yields an empty string. The cleanup steps are repeated until
/// nothing changes, so `normalize_label(normalize_label(x)) == normalize_label(x)`.
pub fn normalize_label(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_number = RE_ENUMERATOR.replace(trimmed, "");
    let without_colon = without_number
        .strip_suffix(':')
        .unwrap_or(&without_number)
        .trim();
    let lowered = without_colon.to_lowercase();
    RE_WHITESPACE.replace_all(&lowered, " ").trim().to_string()
}

struct FieldLabels {
    field: CanvasField,
    aliases: &'static [&'static str],
    base_phrase: &'static str,
}

static FIELD_LABELS: &[FieldLabels] = &[
    FieldLabels {
        field: CanvasField::BusinessName,
        aliases: &[
            "Business Name",
            "Company Name",
            "Name of Business",
            "Venture Name",
            "Startup Name",
            "Organization Name",
            "Organisation Name",
        ],
        base_phrase: "business name",
    },
    FieldLabels {
        field: CanvasField::BriefDescription,
        aliases: &[
            "Brief Description",
            "Description",
            "Business Description",
            "Short Description",
            "Brief Description of Business",
            "Elevator Pitch",
        ],
        base_phrase: "brief description",
    },
    FieldLabels {
        field: CanvasField::Problem,
        aliases: &[
            "Problem",
            "Problems",
            "The Problem",
            "Customer Problem",
            "Problem Statement",
            "Top Problems",
        ],
        base_phrase: "problem",
    },
    FieldLabels {
        field: CanvasField::ValueProposition,
        aliases: &[
            "Value Proposition",
            "Value Propositions",
            "Unique Value Proposition",
            "UVP",
        ],
        base_phrase: "value proposition",
    },
    FieldLabels {
        field: CanvasField::UnfairAdvantage,
        aliases: &["Unfair Advantage", "Competitive Advantage"],
        base_phrase: "unfair advantage",
    },
    FieldLabels {
        field: CanvasField::CustomerSegments,
        aliases: &[
            "Customer Segments",
            "Customer Segment",
            "Target Customers",
            "Target Market",
        ],
        base_phrase: "customer segment",
    },
    FieldLabels {
        field: CanvasField::Channels,
        aliases: &["Channels", "Channel", "Distribution Channels"],
        base_phrase: "channel",
    },
    FieldLabels {
        field: CanvasField::CustomerRelationships,
        aliases: &[
            "Customer Relationships",
            "Customer Relationship",
            "Relationships",
        ],
        base_phrase: "customer relationship",
    },
    FieldLabels {
        field: CanvasField::KeyActivities,
        aliases: &["Key Activities", "Key Activity", "Activities"],
        base_phrase: "key activit",
    },
    FieldLabels {
        field: CanvasField::KeyResources,
        aliases: &["Key Resources", "Key Resource", "Resources"],
        base_phrase: "key resource",
    },
    FieldLabels {
        field: CanvasField::KeyPartners,
        aliases: &[
            "Key Partners",
            "Key Partner",
            "Key Partnerships",
            "Partners",
        ],
        base_phrase: "key partner",
    },
    FieldLabels {
        field: CanvasField::RevenueStreams,
        aliases: &[
            "Revenue Streams",
            "Revenue Stream",
            "Revenue",
            "Revenue Model",
        ],
        base_phrase: "revenue",
    },
    FieldLabels {
        field: CanvasField::CostStructure,
        aliases: &["Cost Structure", "Costs", "Cost"],
        base_phrase: "cost structure",
    },
    FieldLabels {
        field: CanvasField::KingdomImpact,
        aliases: &["Kingdom Impact", "Impact", "Kingdom"],
        base_phrase: "kingdom",
    },
];

static ALIAS_INDEX: Lazy<HashMap<String, CanvasField>> = Lazy::new(|| {
    FIELD_LABELS
        .iter()
        .flat_map(|entry| {
            entry
                .aliases
                .iter()
                .map(move |alias| (normalize_label(alias), entry.field))
        })
        .collect()
});

// Longest phrase first so "customer relationship" wins over a bare "problem"
// mentioned in the same label.
static BASE_PHRASES: Lazy<Vec<(&'static str, CanvasField)>> = Lazy::new(|| {
    let mut phrases: Vec<(&'static str, CanvasField)> = FIELD_LABELS
        .iter()
        .map(|entry| (entry.base_phrase, entry.field))
        .collect();
    phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.1.cmp(&b.1)));
    phrases
});

/// Accepted label spellings for a field, as written in templates.
pub fn aliases_for(field: CanvasField) -> &'static [&'static str] {
    FIELD_LABELS
        .iter()
        .find(|entry| entry.field == field)
        .map(|entry| entry.aliases)
        .unwrap_or(&[])
}

/// Exact lookup: the normalized label must equal a normalized alias.
pub fn match_alias(label: &str) -> Option<CanvasField> {
    let key = normalize_label(label);
    if key.is_empty() {
        return None;
    }
    ALIAS_INDEX.get(&key).copied()
}

/// Fallback lookup: the normalized label contains a field's base phrase.
pub fn match_base_phrase(label: &str) -> Option<CanvasField> {
    let key = normalize_label(label);
    if key.is_empty() {
        return None;
    }
    BASE_PHRASES
        .iter()
        .find(|(phrase, _)| key.contains(phrase))
        .map(|(_, field)| *field)
}

/// Resolves a (possibly multi-line) label cell to a field.
///
/// Exact alias matches on any non-empty line take priority; only when no line
/// matches exactly is the substring fallback tried, line by line.
pub fn resolve_label(cell: &str) -> Option<CanvasField> {
    let lines: Vec<&str> = cell
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .iter()
        .find_map(|line| match_alias(line))
        .or_else(|| lines.iter().find_map(|line| match_base_phrase(line)))
}

/// Normalized aliases claimed by more than one field. Empty for a valid table.
pub fn alias_conflicts() -> Vec<(String, CanvasField, CanvasField)> {
    let mut seen: HashMap<String, CanvasField> = HashMap::new();
    let mut conflicts = Vec::new();
    for entry in FIELD_LABELS {
        for alias in entry.aliases {
            let key = normalize_label(alias);
            match seen.get(&key) {
                Some(owner) if *owner != entry.field => {
                    conflicts.push((key, *owner, entry.field));
                }
                _ => {
                    seen.insert(key, entry.field);
                }
            }
        }
    }
    conflicts
}
