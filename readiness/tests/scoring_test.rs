//! End-to-end scoring of stored project documents.

use std::sync::Arc;

use readiness::{
    classify_stage, CompletionStatus, CompletionThreshold, InMemoryStageSource, NoReferences,
    ProgressLabel, ProjectAggregator, ProjectDocument, ReadinessConfig, ReadinessService,
    StageCategory, StageValue,
};
use serde_json::{json, Value};

fn checklist(done: usize, total: usize) -> Value {
    let items: serde_json::Map<String, Value> = (0..total)
        .map(|i| (format!("item_{i}"), json!({ "done": i < done })))
        .collect();
    Value::Object(items)
}

fn overview() -> ProjectAggregator {
    ProjectAggregator::new(&ReadinessConfig::new(CompletionThreshold::PROJECT_OVERVIEW))
        .expect("valid config")
}

#[test]
fn test_stored_stage_scores_under_both_call_sites() {
    let raw = json!({
        "_id": "65f1",
        "__v": 3,
        "checkin": { "quality_manager": { "done": false } },
        "control_plan": { "done": true },
        "pfmea": { "done": true },
        "flow_chart": { "done": true },
        "work_instructions": { "done": false, "details": { "validationCheck": true, "status": "OK" } },
        "packaging_spec": { "check": true },
        "gauge_rr": { "done": true },
        "capability_study": { "value": true },
        "spc_plan": { "done": true, "details": { "tko": true } },
        "msa": { "done": false, "task": { "tko": true, "ot": true, "status": "NOK" } },
        "layered_audit": { "done": false },
    });
    let stage = StageValue::from_json(&raw);
    assert_eq!(stage.as_ref().map(StageValue::item_count), Some(10));

    let overview = classify_stage(stage.as_ref(), CompletionThreshold::PROJECT_OVERVIEW);
    assert_eq!(overview.completed_items, 8);
    assert_eq!(overview.percentage, 80);
    assert_eq!(overview.status, CompletionStatus::Completed);

    let detail = classify_stage(stage.as_ref(), CompletionThreshold::STAGE_DETAIL);
    assert_eq!(detail.percentage, 80);
    assert_eq!(detail.status, CompletionStatus::InProgress);
}

#[test]
fn test_project_document_aggregation() {
    let raw = json!({
        "_id": "p-311",
        "name": "Seat frame K9",
        "status": "in progress",
        "documentation": checklist(4, 4),
        "safety": { "check": true },
        "training": true,
        "packaging": checklist(1, 2),
        "toolingStatus": checklist(3, 6),
        "maintenance": null,
    });

    let progress = overview().aggregate(&ProjectDocument::from_json(&raw), &NoReferences);
    assert_eq!(progress.percentage, 36);
    assert_eq!(progress.label, ProgressLabel::InProgress);

    let tooling = progress.category(StageCategory::ToolingStatus).expect("scored");
    assert_eq!(tooling.completion.status, CompletionStatus::InProgress);
    let maintenance = progress.category(StageCategory::Maintenance).expect("scored");
    assert_eq!(maintenance.completion.status, CompletionStatus::Missing);
}

#[test]
fn test_flipping_any_field_never_lowers_project() {
    let aggregator = overview();
    let base = json!({
        "documentation": checklist(2, 5),
        "safety": checklist(0, 3),
        "logistics": checklist(1, 1),
    });
    let before = aggregator
        .aggregate(&ProjectDocument::from_json(&base), &NoReferences)
        .percentage;

    for category in ["documentation", "safety"] {
        let count = base[category].as_object().map(|m| m.len()).unwrap_or(0);
        for i in 0..count {
            let mut flipped = base.clone();
            flipped[category][format!("item_{i}")]["done"] = json!(true);
            let after = aggregator
                .aggregate(&ProjectDocument::from_json(&flipped), &NoReferences)
                .percentage;
            assert!(after >= before, "{category}/item_{i}: {after} < {before}");
        }
    }
}

#[test]
fn test_progress_serializes_for_frontend() {
    let project = ProjectDocument::new("p-1").with_stage(StageCategory::Safety, StageValue::Flat(true));
    let progress = overview().aggregate(&project, &NoReferences);
    let json = serde_json::to_value(&progress).expect("encode");

    assert_eq!(json["projectId"], "p-1");
    assert_eq!(json["label"], "Started");
    assert_eq!(json["categories"][7]["category"], "safety");
    assert_eq!(json["categories"][7]["completion"]["status"], "completed");
    assert_eq!(json["categories"][0]["completion"]["status"], "missing");
}

#[test]
fn test_service_blocking_round() {
    let source = Arc::new(InMemoryStageSource::new());
    source.insert(StageCategory::Documentation, "d-1", checklist(9, 10));
    source.insert(StageCategory::Safety, "s-1", json!(null));

    let service = ReadinessService::new(
        &ReadinessConfig::new(CompletionThreshold::STAGE_DETAIL),
        source,
    )
    .expect("valid config");

    let projects = vec![
        ProjectDocument::from_json(&json!({ "_id": "a", "documentation": "d-1", "safety": "s-1" })),
        ProjectDocument::from_json(&json!({ "_id": "b" })),
    ];

    let results = tokio_test::block_on(service.progress_all(&projects));
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].project_id.as_deref(), Some("a"));
    // 90 / 11
    assert_eq!(results[0].percentage, 8);
    let docs = results[0].category(StageCategory::Documentation).expect("scored");
    assert_eq!(docs.completion.status, CompletionStatus::Completed);
    assert_eq!(results[1].percentage, 0);
}
