//! Stage completion classifier.
//!
//! Scores one stage document as completed, in progress or missing, with a
//! 0-100 percentage. The completion threshold is always supplied by the
//! caller: project overview pages historically used 80% and stage detail
//! pages 90% for the same data, so there is no default.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{CompletionStatus, ReadinessError, Result, StageCompletion, StageValue};

/// Percentage at or above which a checklist stage counts as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CompletionThreshold(u8);

impl CompletionThreshold {
    /// Threshold used by the project list and overview pages.
    pub const PROJECT_OVERVIEW: Self = Self(80);

    /// Threshold used by the per-stage detail pages.
    pub const STAGE_DETAIL: Self = Self(90);

    /// Create a threshold. Must be within 1..=100.
    pub fn new(percent: u8) -> Result<Self> {
        if (1..=100).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(ReadinessError::InvalidThreshold(percent))
        }
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CompletionThreshold {
    type Error = ReadinessError;

    fn try_from(percent: u8) -> Result<Self> {
        Self::new(percent)
    }
}

impl From<CompletionThreshold> for u8 {
    fn from(threshold: CompletionThreshold) -> Self {
        threshold.0
    }
}

/// Classifies stage documents against a fixed threshold.
#[derive(Debug, Clone, Copy)]
pub struct StageClassifier {
    threshold: CompletionThreshold,
}

impl StageClassifier {
    /// Create a classifier for a call site's threshold.
    pub fn new(threshold: CompletionThreshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> CompletionThreshold {
        self.threshold
    }

    /// Classify a stage. `None` means the project has no such stage.
    pub fn classify(&self, stage: Option<&StageValue>) -> StageCompletion {
        let completion = match stage {
            None => StageCompletion::missing(),
            Some(StageValue::Flat(true)) => StageCompletion {
                status: CompletionStatus::Completed,
                percentage: 100,
                completed_items: 1,
                total_items: 1,
            },
            Some(StageValue::Flat(false)) => StageCompletion {
                status: CompletionStatus::Missing,
                percentage: 0,
                completed_items: 0,
                total_items: 1,
            },
            Some(StageValue::Checklist(items)) => {
                let total_items = items.len();
                let completed_items = items.values().filter(|item| item.is_complete()).count();
                let percentage = ratio_percent(completed_items, total_items);

                StageCompletion {
                    status: self.status_for(percentage),
                    percentage,
                    completed_items,
                    total_items,
                }
            }
        };

        debug!(
            status = completion.status.as_str(),
            percentage = completion.percentage,
            threshold = self.threshold.percent(),
            "Classified stage"
        );

        completion
    }

    fn status_for(&self, percentage: u8) -> CompletionStatus {
        if percentage >= self.threshold.percent() {
            CompletionStatus::Completed
        } else if percentage > 0 {
            CompletionStatus::InProgress
        } else {
            CompletionStatus::Missing
        }
    }
}

/// Classify a stage with an explicit threshold.
pub fn classify_stage(stage: Option<&StageValue>, threshold: CompletionThreshold) -> StageCompletion {
    StageClassifier::new(threshold).classify(stage)
}

/// `round(100 * part / whole)`, 0 for an empty whole.
pub(crate) fn ratio_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (100.0 * part as f64 / whole as f64).round();
    pct.clamp(0.0, 100.0) as u8
}
