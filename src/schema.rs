use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fixed set of fields a canvas submission is reduced to.
///
/// Declaration order is the canonical order: it drives payload serialization,
/// empty-block ordering and the layout of the response template.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CanvasField {
    BusinessName,
    BriefDescription,
    Problem,
    ValueProposition,
    UnfairAdvantage,
    CustomerSegments,
    Channels,
    CustomerRelationships,
    KeyActivities,
    KeyResources,
    KeyPartners,
    RevenueStreams,
    CostStructure,
    KingdomImpact,
}

impl CanvasField {
    pub const ALL: [CanvasField; 14] = [
        CanvasField::BusinessName,
        CanvasField::BriefDescription,
        CanvasField::Problem,
        CanvasField::ValueProposition,
        CanvasField::UnfairAdvantage,
        CanvasField::CustomerSegments,
        CanvasField::Channels,
        CanvasField::CustomerRelationships,
        CanvasField::KeyActivities,
        CanvasField::KeyResources,
        CanvasField::KeyPartners,
        CanvasField::RevenueStreams,
        CanvasField::CostStructure,
        CanvasField::KingdomImpact,
    ];

    /// The twelve canvas blocks, in section order.
    pub const BLOCKS: [CanvasField; 12] = [
        CanvasField::Problem,
        CanvasField::ValueProposition,
        CanvasField::UnfairAdvantage,
        CanvasField::CustomerSegments,
        CanvasField::Channels,
        CanvasField::CustomerRelationships,
        CanvasField::KeyActivities,
        CanvasField::KeyResources,
        CanvasField::KeyPartners,
        CanvasField::RevenueStreams,
        CanvasField::CostStructure,
        CanvasField::KingdomImpact,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CanvasField::BusinessName => "business_name",
            CanvasField::BriefDescription => "brief_description",
            CanvasField::Problem => "problem",
            CanvasField::ValueProposition => "value_proposition",
            CanvasField::UnfairAdvantage => "unfair_advantage",
            CanvasField::CustomerSegments => "customer_segments",
            CanvasField::Channels => "channels",
            CanvasField::CustomerRelationships => "customer_relationships",
            CanvasField::KeyActivities => "key_activities",
            CanvasField::KeyResources => "key_resources",
            CanvasField::KeyPartners => "key_partners",
            CanvasField::RevenueStreams => "revenue_streams",
            CanvasField::CostStructure => "cost_structure",
            CanvasField::KingdomImpact => "kingdom_impact",
        }
    }

    /// True for the twelve canvas blocks, false for the metadata fields.
    pub fn is_block(self) -> bool {
        !matches!(
            self,
            CanvasField::BusinessName | CanvasField::BriefDescription
        )
    }
}

/// Founder-supplied text for one submission, keyed by canonical field.
///
/// Every field is always present; absent input is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<CanvasField, String>",
    into = "BTreeMap<CanvasField, String>"
)]
pub struct FounderPayload {
    fields: BTreeMap<CanvasField, String>,
}

impl Default for FounderPayload {
    fn default() -> Self {
        Self {
            fields: CanvasField::ALL
                .iter()
                .map(|field| (*field, String::new()))
                .collect(),
        }
    }
}

impl From<BTreeMap<CanvasField, String>> for FounderPayload {
    fn from(mut fields: BTreeMap<CanvasField, String>) -> Self {
        for field in CanvasField::ALL {
            fields.entry(field).or_default();
        }
        Self { fields }
    }
}

impl From<FounderPayload> for BTreeMap<CanvasField, String> {
    fn from(payload: FounderPayload) -> Self {
        payload.fields
    }
}

impl FounderPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanvasField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: CanvasField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// Assigns `value` only when it carries content, so a filled field is
    /// never overwritten with an empty one. Returns whether it was assigned.
    pub fn merge_non_empty(&mut self, field: CanvasField, value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }
        self.set(field, value);
        true
    }

    /// Appends a line of text to a field, newline-joined.
    pub fn append(&mut self, field: CanvasField, text: &str) {
        let entry = self.fields.entry(field).or_default();
        if !entry.is_empty() {
            entry.push('\n');
        }
        entry.push_str(text);
    }

    pub fn is_blank(&self, field: CanvasField) -> bool {
        self.get(field).trim().is_empty()
    }

    /// Number of fields (metadata included) holding non-blank text.
    pub fn filled_count(&self) -> usize {
        CanvasField::ALL
            .iter()
            .filter(|field| !self.is_blank(**field))
            .count()
    }

    pub fn has_content(&self) -> bool {
        self.filled_count() > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanvasField, &str)> {
        self.fields.iter().map(|(field, value)| (*field, value.as_str()))
    }

    pub fn metadata(&self) -> ReportMetadata {
        ReportMetadata {
            business_name: self.get(CanvasField::BusinessName).trim().to_string(),
            brief_description: self.get(CanvasField::BriefDescription).trim().to_string(),
        }
    }
}

/// The structured web form record. Every block is optional; the form layer
/// posts this as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FormSubmission {
    #[schemars(description = "Name of the business or venture.")]
    #[serde(default)]
    pub business_name: String,

    #[schemars(description = "One or two sentences describing what the business does.")]
    #[serde(default)]
    pub brief_description: String,

    #[schemars(description = "The top problems the business solves for its customers.")]
    #[serde(default)]
    pub problem: String,

    #[schemars(description = "The unique value the business delivers.")]
    #[serde(default)]
    pub value_proposition: String,

    #[schemars(description = "What makes the business hard to copy or buy.")]
    #[serde(default)]
    pub unfair_advantage: String,

    #[schemars(description = "The customer groups the business targets.")]
    #[serde(default)]
    pub customer_segments: String,

    #[schemars(description = "How the business reaches its customers.")]
    #[serde(default)]
    pub channels: String,

    #[schemars(description = "How the business wins, keeps and grows customer relationships.")]
    #[serde(default)]
    pub customer_relationships: String,

    #[schemars(description = "The most important things the business must do.")]
    #[serde(default)]
    pub key_activities: String,

    #[schemars(description = "The most important assets the business needs.")]
    #[serde(default)]
    pub key_resources: String,

    #[schemars(description = "Partners and suppliers the business depends on.")]
    #[serde(default)]
    pub key_partners: String,

    #[schemars(description = "How the business makes money.")]
    #[serde(default)]
    pub revenue_streams: String,

    #[schemars(description = "The main costs of operating the business.")]
    #[serde(default)]
    pub cost_structure: String,

    #[schemars(description = "How the business advances kingdom values and serves its community.")]
    #[serde(default)]
    pub kingdom_impact: String,
}

impl FormSubmission {
    pub fn value(&self, field: CanvasField) -> &str {
        match field {
            CanvasField::BusinessName => &self.business_name,
            CanvasField::BriefDescription => &self.brief_description,
            CanvasField::Problem => &self.problem,
            CanvasField::ValueProposition => &self.value_proposition,
            CanvasField::UnfairAdvantage => &self.unfair_advantage,
            CanvasField::CustomerSegments => &self.customer_segments,
            CanvasField::Channels => &self.channels,
            CanvasField::CustomerRelationships => &self.customer_relationships,
            CanvasField::KeyActivities => &self.key_activities,
            CanvasField::KeyResources => &self.key_resources,
            CanvasField::KeyPartners => &self.key_partners,
            CanvasField::RevenueStreams => &self.revenue_streams,
            CanvasField::CostStructure => &self.cost_structure,
            CanvasField::KingdomImpact => &self.kingdom_impact,
        }
    }
}

/// JSON Schema of [`FormSubmission`], for the form layer.
pub fn form_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(FormSubmission);
    serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
}

/// Title block data for the rendered report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub business_name: String,
    pub brief_description: String,
}

/// What the coach receives after an upload has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Field-level content from a Word document, text document or web form.
    Structured(FounderPayload),
    /// Free text with no field structure (PDF uploads).
    Unstructured { text: String },
}
