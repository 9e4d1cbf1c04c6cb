//! Core types for readiness scoring.
//!
//! These types model a project's checklist stages and the completion values
//! derived from them.
//!
//! With the `typescript` feature enabled, the output types can be exported to
//! TypeScript using ts-rs so the frontend renders the same shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Checklist categories a project may reference.
///
/// Declaration order is the fixed aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    Documentation,
    Logistics,
    Maintenance,
    Packaging,
    ProcessStatus,
    ProductProcess,
    RunAtRateProduction,
    Safety,
    ToolingStatus,
    Training,
    SupplierOrder,
}

impl StageCategory {
    /// Wire key used in project documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Documentation => "documentation",
            Self::Logistics => "logistics",
            Self::Maintenance => "maintenance",
            Self::Packaging => "packaging",
            Self::ProcessStatus => "process_status",
            Self::ProductProcess => "product_process",
            Self::RunAtRateProduction => "run_at_rate_production",
            Self::Safety => "safety",
            Self::ToolingStatus => "tooling_status",
            Self::Training => "training",
            Self::SupplierOrder => "supplier_order",
        }
    }

    /// Camel-case spelling some documents use for the same key.
    pub fn camel_alias(&self) -> &'static str {
        match self {
            Self::Documentation => "documentation",
            Self::Logistics => "logistics",
            Self::Maintenance => "maintenance",
            Self::Packaging => "packaging",
            Self::ProcessStatus => "processStatus",
            Self::ProductProcess => "productProcess",
            Self::RunAtRateProduction => "runAtRateProduction",
            Self::Safety => "safety",
            Self::ToolingStatus => "toolingStatus",
            Self::Training => "training",
            Self::SupplierOrder => "supplierOrder",
        }
    }

    /// Human-readable name for reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Documentation => "Documentation",
            Self::Logistics => "Logistics",
            Self::Maintenance => "Maintenance",
            Self::Packaging => "Packaging",
            Self::ProcessStatus => "Process Status",
            Self::ProductProcess => "Product Process",
            Self::RunAtRateProduction => "Run-at-Rate Production",
            Self::Safety => "Safety",
            Self::ToolingStatus => "Tooling Status",
            Self::Training => "Training",
            Self::SupplierOrder => "Supplier Order",
        }
    }

    /// Parse a wire key or its camel-case alias.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|c| c.as_str() == key || c.camel_alias() == key)
    }

    /// All categories in aggregation order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Documentation,
            Self::Logistics,
            Self::Maintenance,
            Self::Packaging,
            Self::ProcessStatus,
            Self::ProductProcess,
            Self::RunAtRateProduction,
            Self::Safety,
            Self::ToolingStatus,
            Self::Training,
            Self::SupplierOrder,
        ]
    }
}

impl fmt::Display for StageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome an evaluator assigned to a validated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum ValidationStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOK")]
    Nok,
}

impl ValidationStatus {
    /// Parse `"OK"`/`"NOK"` case-insensitively. Anything else is unset.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OK" => Some(Self::Ok),
            "NOK" => Some(Self::Nok),
            _ => None,
        }
    }
}

/// Validation sub-record attached to a checklist item.
///
/// Milestone flags are independent; no ordering between them is enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetails {
    /// The record's own completion flag (`done`/`check`/`value` on the wire)
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub tko: bool,
    #[serde(default)]
    pub ot: bool,
    #[serde(default, rename = "ot_op")]
    pub ot_op: bool,
    #[serde(default)]
    pub is: bool,
    #[serde(default)]
    pub sop: bool,
    #[serde(default)]
    pub validation_check: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ValidationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ValidationDetails {
    /// Whether the record itself marks its item as done.
    pub fn is_checked(&self) -> bool {
        self.done || self.validation_check
    }
}

/// One entry of a checklist stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ChecklistItem {
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationDetails>,
}

impl ChecklistItem {
    /// Create an item with only a top-level flag.
    pub fn new(done: bool) -> Self {
        Self { done, details: None }
    }

    /// Attach validation details.
    pub fn with_details(mut self, details: ValidationDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Complete if the item or its nested details record is marked done.
    pub fn is_complete(&self) -> bool {
        self.done || self.details.as_ref().is_some_and(ValidationDetails::is_checked)
    }
}

/// A stage document in one of its two legal shapes.
///
/// The shape is decided once at ingestion (see [`StageValue::from_json`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StageValue {
    /// Single check/value pair with no sub-items
    Flat(bool),
    /// Named checklist items
    Checklist(BTreeMap<String, ChecklistItem>),
}

impl StageValue {
    /// Build a checklist stage from `(name, item)` pairs.
    pub fn checklist<K, I>(items: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ChecklistItem)>,
    {
        Self::Checklist(items.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Number of items the classifier will count.
    pub fn item_count(&self) -> usize {
        match self {
            Self::Flat(_) => 1,
            Self::Checklist(items) => items.len(),
        }
    }
}

impl<'de> Deserialize<'de> for StageValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&raw).unwrap_or_else(|| Self::Checklist(BTreeMap::new())))
    }
}

/// Completion status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub enum CompletionStatus {
    Completed,
    InProgress,
    Missing,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "inProgress",
            Self::Missing => "missing",
        }
    }
}

/// Classifier output for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct StageCompletion {
    pub status: CompletionStatus,
    /// 0 - 100
    pub percentage: u8,
    pub completed_items: usize,
    pub total_items: usize,
}

impl StageCompletion {
    /// Completion of an absent stage.
    pub fn missing() -> Self {
        Self {
            status: CompletionStatus::Missing,
            percentage: 0,
            completed_items: 0,
            total_items: 0,
        }
    }
}

/// Discrete project progress band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum ProgressLabel {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "Started")]
    Started,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Halfway")]
    Halfway,
    #[serde(rename = "Nearly Done")]
    NearlyDone,
    #[serde(rename = "Almost Complete")]
    AlmostComplete,
}

impl ProgressLabel {
    /// Band for an overall percentage.
    pub fn for_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => Self::AlmostComplete,
            75..=89 => Self::NearlyDone,
            50..=74 => Self::Halfway,
            25..=49 => Self::InProgress,
            1..=24 => Self::Started,
            0 => Self::NotStarted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Started => "Started",
            Self::InProgress => "In Progress",
            Self::Halfway => "Halfway",
            Self::NearlyDone => "Nearly Done",
            Self::AlmostComplete => "Almost Complete",
        }
    }
}

impl fmt::Display for ProgressLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for readiness scoring configuration.
#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    /// Threshold outside 1..=100
    #[error("Invalid completion threshold: {0} (expected 1-100)")]
    InvalidThreshold(u8),

    /// Negative or non-finite aggregation weight
    #[error("Invalid weight {weight} for stage {category}")]
    InvalidWeight { category: StageCategory, weight: f64 },

    /// Category listed more than once for aggregation
    #[error("Stage {0} is listed more than once")]
    DuplicateCategory(StageCategory),

    /// Malformed YAML configuration
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ReadinessError>;
