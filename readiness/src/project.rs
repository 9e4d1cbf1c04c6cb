//! Project documents and their stage references.
//!
//! A project refers to each stage category at most once, either by embedding
//! the stage document or by an opaque identifier the persistence layer
//! resolves. Both forms occur in stored projects.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::{StageCategory, StageValue};

/// How a project holds one category's stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum StageSlot {
    /// Stage document embedded in the project
    Embedded(StageValue),
    /// Identifier of a stage document stored elsewhere
    Reference(String),
}

/// A project as far as scoring is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectDocument {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    /// Stages present on the project. Absent categories have no entry.
    pub stages: BTreeMap<StageCategory, StageSlot>,
}

impl ProjectDocument {
    /// Create an empty project.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Embed a stage document.
    pub fn with_stage(mut self, category: StageCategory, stage: StageValue) -> Self {
        self.stages.insert(category, StageSlot::Embedded(stage));
        self
    }

    /// Reference a stage stored elsewhere.
    pub fn with_reference(mut self, category: StageCategory, stage_id: impl Into<String>) -> Self {
        self.stages.insert(category, StageSlot::Reference(stage_id.into()));
        self
    }

    /// Read a project from its JSON document.
    ///
    /// Non-object input yields an empty project. Unknown keys are ignored.
    pub fn from_json(raw: &Value) -> Self {
        let Some(map) = raw.as_object() else {
            return Self::default();
        };

        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        };

        let mut stages = BTreeMap::new();
        for (key, value) in map {
            let Some(category) = StageCategory::from_key(key) else {
                continue;
            };
            let slot = match value {
                Value::String(id) if !id.is_empty() => Some(StageSlot::Reference(id.clone())),
                Value::String(_) => None,
                other => StageValue::from_json(other).map(StageSlot::Embedded),
            };
            if let Some(slot) = slot {
                stages.insert(category, slot);
            }
        }

        Self {
            id: text(&["_id", "id"]),
            name: text(&["name", "project_name", "projectName"]),
            status: text(&["status"]),
            assignee: text(&["assignee", "assigned_to", "assignedTo"]),
            stages,
        }
    }

    /// Stage references, for prefetching.
    pub fn references(&self) -> impl Iterator<Item = (StageCategory, &str)> {
        self.stages.iter().filter_map(|(category, slot)| match slot {
            StageSlot::Reference(id) => Some((*category, id.as_str())),
            StageSlot::Embedded(_) => None,
        })
    }
}

/// Resolves stage references to stage documents.
pub trait StageResolver {
    /// Look up a referenced stage. `None` counts as absent.
    fn resolve(&self, category: StageCategory, stage_id: &str) -> Option<StageValue>;
}

/// Resolver for callers that only pass embedded stages.
///
/// Every reference counts as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferences;

impl StageResolver for NoReferences {
    fn resolve(&self, _category: StageCategory, _stage_id: &str) -> Option<StageValue> {
        None
    }
}

/// Stages fetched ahead of time, keyed by category and id.
#[derive(Debug, Clone, Default)]
pub struct PrefetchedStages {
    stages: BTreeMap<(StageCategory, String), StageValue>,
}

impl PrefetchedStages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: StageCategory, stage_id: impl Into<String>, stage: StageValue) {
        self.stages.insert((category, stage_id.into()), stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl StageResolver for PrefetchedStages {
    fn resolve(&self, category: StageCategory, stage_id: &str) -> Option<StageValue> {
        self.stages.get(&(category, stage_id.to_string())).cloned()
    }
}
