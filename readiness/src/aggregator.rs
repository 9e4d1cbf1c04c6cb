//! Project progress aggregation.
//!
//! Rolls the completion of every configured stage category into one project
//! percentage. An absent stage contributes 0 and stays in the denominator.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::classifier::StageClassifier;
use crate::config::{AggregatorConfig, ReadinessConfig};
use crate::project::{ProjectDocument, StageResolver, StageSlot};
use crate::types::{ProgressLabel, Result, StageCategory, StageCompletion};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// One category's contribution to a project's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgress {
    pub category: StageCategory,
    pub completion: StageCompletion,
    pub weight: f64,
}

/// Aggregated progress of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub project_id: Option<String>,
    /// 0 - 100
    pub percentage: u8,
    pub label: ProgressLabel,
    /// Per-category breakdown in configured order
    pub categories: Vec<CategoryProgress>,
    /// SHA256 of the breakdown, for skipping unchanged re-renders
    pub fingerprint: String,
}

impl ProjectProgress {
    /// Breakdown entry for a category, if it was scored.
    pub fn category(&self, category: StageCategory) -> Option<&CategoryProgress> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Combines stage completions into project progress.
#[derive(Debug, Clone)]
pub struct ProjectAggregator {
    classifier: StageClassifier,
    config: AggregatorConfig,
}

impl ProjectAggregator {
    /// Create an aggregator from validated config.
    pub fn new(config: &ReadinessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: StageClassifier::new(config.threshold),
            config: config.aggregator.clone(),
        })
    }

    pub fn classifier(&self) -> &StageClassifier {
        &self.classifier
    }

    /// Score a project. References are looked up through `resolver`.
    pub fn aggregate(&self, project: &ProjectDocument, resolver: &dyn StageResolver) -> ProjectProgress {
        let categories: Vec<CategoryProgress> = self
            .config
            .categories
            .iter()
            .map(|&category| {
                let resolved = match project.stages.get(&category) {
                    Some(StageSlot::Embedded(stage)) => Some(stage.clone()),
                    Some(StageSlot::Reference(id)) => resolver.resolve(category, id),
                    None => None,
                };
                CategoryProgress {
                    category,
                    completion: self.classifier.classify(resolved.as_ref()),
                    weight: self.config.weight(category),
                }
            })
            .collect();

        let percentage = weighted_percent(&categories);
        let label = ProgressLabel::for_percentage(percentage);
        let fingerprint = fingerprint(&categories);

        debug!(
            project_id = project.id.as_deref().unwrap_or("-"),
            percentage,
            label = label.as_str(),
            "Aggregated project progress"
        );

        ProjectProgress {
            project_id: project.id.clone(),
            percentage,
            label,
            categories,
            fingerprint,
        }
    }

    /// Score a list of projects, preserving order.
    pub fn aggregate_all(
        &self,
        projects: &[ProjectDocument],
        resolver: &dyn StageResolver,
    ) -> Vec<ProjectProgress> {
        projects
            .iter()
            .map(|project| self.aggregate(project, resolver))
            .collect()
    }
}

/// `round(100 * Σ(weight * pct / 100) / Σweight)`, 0 when all weights are 0.
fn weighted_percent(categories: &[CategoryProgress]) -> u8 {
    let total_weight: f64 = categories.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return 0;
    }
    let earned: f64 = categories
        .iter()
        .map(|c| c.weight * f64::from(c.completion.percentage) / 100.0)
        .sum();
    (100.0 * earned / total_weight).round().clamp(0.0, 100.0) as u8
}

fn fingerprint(categories: &[CategoryProgress]) -> String {
    let json = serde_json::to_string(categories).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}
