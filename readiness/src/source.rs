//! Stage document sources.
//!
//! Stage documents referenced by id live with the persistence collaborator.
//! This module only defines the read seam and an in-memory implementation;
//! it never writes back.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::types::{StageCategory, StageValue};

/// Error types for stage fetches.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No stage with this id
    #[error("Stage not found: {0}")]
    NotFound(String),

    /// Backing store not reachable
    #[error("Stage source unavailable: {0}")]
    Unavailable(String),

    /// Document could not be read as a stage
    #[error("Invalid stage document: {0}")]
    InvalidDocument(String),
}

/// Read-only access to stored stage documents.
#[async_trait]
pub trait StageSource: Send + Sync {
    /// Fetch a stage by category and id.
    ///
    /// `Ok(None)` means the stored document is null. A document that is
    /// neither an object nor a boolean is [`SourceError::InvalidDocument`].
    async fn fetch(&self, category: StageCategory, stage_id: &str) -> Result<Option<StageValue>, SourceError>;
}

/// In-memory stage source holding raw JSON documents.
#[derive(Debug, Default)]
pub struct InMemoryStageSource {
    documents: DashMap<(StageCategory, String), Value>,
}

impl InMemoryStageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw stage document.
    pub fn insert(&self, category: StageCategory, stage_id: impl Into<String>, document: Value) {
        let stage_id = stage_id.into();
        tracing::debug!(category = category.as_str(), stage_id = %stage_id, "Stored stage document");
        self.documents.insert((category, stage_id), document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl StageSource for InMemoryStageSource {
    async fn fetch(&self, category: StageCategory, stage_id: &str) -> Result<Option<StageValue>, SourceError> {
        let doc = self
            .documents
            .get(&(category, stage_id.to_string()))
            .ok_or_else(|| SourceError::NotFound(stage_id.to_string()))?;

        match doc.value() {
            Value::Null | Value::Bool(_) | Value::Object(_) => Ok(StageValue::from_json(doc.value())),
            _ => Err(SourceError::InvalidDocument(format!(
                "{}/{stage_id} is not an object or boolean",
                category.as_str()
            ))),
        }
    }
}
