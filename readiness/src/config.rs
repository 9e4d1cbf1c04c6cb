//! Configuration for readiness scoring.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use crate::classifier::CompletionThreshold;
use crate::types::{ReadinessError, Result, StageCategory};

/// Scoring configuration for one call site.
///
/// `threshold` has no default and must be present in YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Completion threshold for checklist stages
    pub threshold: CompletionThreshold,
    /// Aggregation settings
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

impl ReadinessConfig {
    /// Create a config for a threshold with default aggregation.
    pub fn new(threshold: CompletionThreshold) -> Self {
        Self {
            threshold,
            aggregator: AggregatorConfig::default(),
        }
    }

    /// Load and validate config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        info!(
            threshold = config.threshold.percent(),
            categories = config.aggregator.categories.len(),
            "Loaded readiness config"
        );
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject weights and category lists the aggregator cannot use.
    pub fn validate(&self) -> Result<()> {
        self.aggregator.validate()
    }
}

/// Aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Categories scored for each project, in order
    #[serde(default = "StageCategory::all")]
    pub categories: Vec<StageCategory>,
    /// Per-category weights. Unlisted categories weigh 1.0.
    ///
    /// Every known deployment leaves these at 1.0; the knob is kept so a
    /// deployment that wants it does not fork the aggregator.
    #[serde(default)]
    pub weights: BTreeMap<StageCategory, f64>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            categories: StageCategory::all(),
            weights: BTreeMap::new(),
        }
    }
}

impl AggregatorConfig {
    /// Weight of a category.
    pub fn weight(&self, category: StageCategory) -> f64 {
        self.weights.get(&category).copied().unwrap_or(1.0)
    }

    /// Set a category weight.
    pub fn with_weight(mut self, category: StageCategory, weight: f64) -> Result<Self> {
        check_weight(category, weight)?;
        self.weights.insert(category, weight);
        Ok(self)
    }

    /// Each category may be listed once; weights must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        if let Some(duplicate) = self.categories.iter().find(|category| !seen.insert(**category)) {
            return Err(ReadinessError::DuplicateCategory(*duplicate));
        }

        self.weights
            .iter()
            .try_for_each(|(category, weight)| check_weight(*category, *weight))
    }
}

fn check_weight(category: StageCategory, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ReadinessError::InvalidWeight { category, weight })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aggregation() {
        let config = ReadinessConfig::new(CompletionThreshold::PROJECT_OVERVIEW);
        assert_eq!(config.aggregator.categories.len(), 11);
        assert_eq!(config.aggregator.weight(StageCategory::Safety), 1.0);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ReadinessConfig::new(CompletionThreshold::STAGE_DETAIL);
        let yaml = config.to_yaml().unwrap();
        let parsed = ReadinessConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.threshold, CompletionThreshold::STAGE_DETAIL);
        assert_eq!(parsed.aggregator.categories, StageCategory::all());
    }

    #[test]
    fn test_threshold_is_required() {
        let err = ReadinessConfig::from_yaml("aggregator: {}\n").unwrap_err();
        assert!(matches!(err, ReadinessError::Config(_)));
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "threshold: 80\naggregator:\n  categories: [safety, training]\n  weights:\n    safety: 1.0\n";
        let config = ReadinessConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.threshold, CompletionThreshold::PROJECT_OVERVIEW);
        assert_eq!(
            config.aggregator.categories,
            vec![StageCategory::Safety, StageCategory::Training]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ReadinessConfig::from_yaml("threshold: 0\n").is_err());
        assert!(ReadinessConfig::from_yaml("threshold: 80\naggregator:\n  weights:\n    safety: -1.0\n").is_err());
        assert!(AggregatorConfig::default()
            .with_weight(StageCategory::Training, f64::NAN)
            .is_err());
    }

    #[test]
    fn test_duplicate_categories_rejected() {
        let yaml = "threshold: 80\naggregator:\n  categories: [safety, training, safety]\n";
        let err = ReadinessConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ReadinessError::DuplicateCategory(StageCategory::Safety)));

        let mut config = ReadinessConfig::new(CompletionThreshold::PROJECT_OVERVIEW);
        config.aggregator.categories.push(StageCategory::Documentation);
        assert!(matches!(
            config.validate(),
            Err(ReadinessError::DuplicateCategory(StageCategory::Documentation))
        ));
        assert!(crate::aggregator::ProjectAggregator::new(&config).is_err());
    }
}
