//! Readiness scoring for manufacturing launch projects.
//!
//! A project is tracked through checklist stages (documentation, safety,
//! training, ...). This crate decides how complete each stage is and rolls
//! the stages up into one project percentage:
//!
//! - **Stage model**: a stage is either a flat check or a named checklist,
//!   decided once at ingestion
//! - **Classifier**: completed / in progress / missing plus a 0-100 score,
//!   against a caller-supplied threshold
//! - **Aggregator**: mean of stage scores over a fixed category list, absent
//!   stages counting as 0
//!
//! Scoring is pure and total: malformed input lowers the score, it never
//! errors. The only fallible step is building a configuration.
//!
//! # Example
//!
//! ```
//! use readiness::{CompletionThreshold, NoReferences, ProjectAggregator, ProjectDocument, ReadinessConfig};
//! use serde_json::json;
//!
//! let config = ReadinessConfig::new(CompletionThreshold::PROJECT_OVERVIEW);
//! let aggregator = ProjectAggregator::new(&config).unwrap();
//!
//! let project = ProjectDocument::from_json(&json!({
//!     "_id": "p-1",
//!     "safety": { "ppe": { "done": true }, "lockout": { "done": true } },
//! }));
//! let progress = aggregator.aggregate(&project, &NoReferences);
//! assert_eq!(progress.percentage, 9);
//! ```

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod ingest;
pub mod project;
pub mod service;
pub mod source;
pub mod types;

// Re-export main types
pub use aggregator::{CategoryProgress, ProjectAggregator, ProjectProgress};
pub use classifier::{classify_stage, CompletionThreshold, StageClassifier};
pub use config::{AggregatorConfig, ReadinessConfig};
pub use project::{NoReferences, PrefetchedStages, ProjectDocument, StageResolver, StageSlot};
pub use service::ReadinessService;
pub use source::{InMemoryStageSource, SourceError, StageSource};
pub use types::*;
