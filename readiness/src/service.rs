//! Readiness service: fetch referenced stages, then score.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::aggregator::{ProjectAggregator, ProjectProgress};
use crate::config::ReadinessConfig;
use crate::project::{PrefetchedStages, ProjectDocument};
use crate::source::StageSource;
use crate::types::Result;

/// Scores projects whose stages may live in a [`StageSource`].
pub struct ReadinessService {
    aggregator: ProjectAggregator,
    source: Arc<dyn StageSource>,
}

impl ReadinessService {
    /// Create a service for a call site's config.
    pub fn new(config: &ReadinessConfig, source: Arc<dyn StageSource>) -> Result<Self> {
        Ok(Self {
            aggregator: ProjectAggregator::new(config)?,
            source,
        })
    }

    pub fn aggregator(&self) -> &ProjectAggregator {
        &self.aggregator
    }

    /// Fetch every referenced stage of a project concurrently.
    ///
    /// Failed fetches are logged and left out, so the stage scores as absent.
    pub async fn prefetch(&self, project: &ProjectDocument) -> PrefetchedStages {
        let fetches = project.references().map(|(category, stage_id)| async move {
            (category, stage_id, self.source.fetch(category, stage_id).await)
        });

        let mut prefetched = PrefetchedStages::new();
        for (category, stage_id, result) in join_all(fetches).await {
            match result {
                Ok(Some(stage)) => prefetched.insert(category, stage_id, stage),
                Ok(None) => {
                    debug!(category = category.as_str(), stage_id = %stage_id, "Referenced stage is empty");
                }
                Err(e) => {
                    warn!(
                        category = category.as_str(),
                        stage_id = %stage_id,
                        error = %e,
                        "Failed to fetch stage, scoring as absent"
                    );
                }
            }
        }
        prefetched
    }

    /// Fetch and score one project.
    pub async fn progress(&self, project: &ProjectDocument) -> ProjectProgress {
        let prefetched = self.prefetch(project).await;
        self.aggregator.aggregate(project, &prefetched)
    }

    /// Fetch and score many projects, preserving order.
    pub async fn progress_all(&self, projects: &[ProjectDocument]) -> Vec<ProjectProgress> {
        join_all(projects.iter().map(|project| self.progress(project))).await
    }
}
