//! Ingestion of JSON stage documents.
//!
//! Stage documents arrive in several shapes: a bare boolean, a single
//! check/value pair, or a map of named items whose completion may live at
//! the top level or one level down in a `details`/`task` record. The shape is
//! decided here, once, so scoring code only ever matches on [`StageValue`].
//!
//! Ingestion never fails. Anything unrecognized degrades to fewer items.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::types::{ChecklistItem, StageValue, ValidationDetails, ValidationStatus};

/// Key reserved for check-in sign-off data stored alongside a stage.
pub const RESERVED_CHECKIN_KEY: &str = "checkin";

/// Keys that carry an item's (or a flat stage's) own completion flag.
const FLAG_KEYS: [&str; 3] = ["done", "check", "value"];

/// Keys under which nested validation details are stored, in lookup order.
const DETAIL_KEYS: [&str; 2] = ["details", "task"];

/// Whether a stage key is excluded from scoring.
pub fn is_skipped_key(key: &str) -> bool {
    key.starts_with('_') || key == RESERVED_CHECKIN_KEY
}

impl StageValue {
    /// Decide the shape of a raw stage document.
    ///
    /// Returns `None` for `null`, meaning the stage is absent.
    pub fn from_json(raw: &Value) -> Option<Self> {
        match raw {
            Value::Null => None,
            Value::Bool(done) => Some(Self::Flat(*done)),
            Value::Object(map) => Some(
                flat_from_object(map).unwrap_or_else(|| Self::Checklist(checklist_from_object(map))),
            ),
            _ => Some(Self::Checklist(BTreeMap::new())),
        }
    }
}

impl ChecklistItem {
    /// Read one checklist entry from its JSON object.
    pub fn from_json(map: &Map<String, Value>) -> Self {
        Self {
            done: read_flag(map),
            details: details_record(map).map(ValidationDetails::from_json),
        }
    }
}

impl ValidationDetails {
    /// Read a nested validation record. Missing or mistyped fields stay unset.
    pub fn from_json(map: &Map<String, Value>) -> Self {
        Self {
            done: read_flag(map),
            tko: read_bool(map, "tko"),
            ot: read_bool(map, "ot"),
            ot_op: read_bool(map, "ot_op") || read_bool(map, "otOp"),
            is: read_bool(map, "is"),
            sop: read_bool(map, "sop"),
            validation_check: read_bool(map, "validationCheck")
                || read_bool(map, "validation_check"),
            status: map
                .get("status")
                .and_then(Value::as_str)
                .and_then(ValidationStatus::parse),
            responsible: read_string(map, "responsible"),
            when: read_string(map, "when"),
            comment: read_string(map, "comment"),
        }
    }
}

/// A flat stage has a boolean marker and no sub-items besides its own
/// details record.
fn flat_from_object(map: &Map<String, Value>) -> Option<StageValue> {
    let marker = FLAG_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_bool))?;

    let has_sub_items = map
        .iter()
        .any(|(key, value)| value.is_object() && !DETAIL_KEYS.contains(&key.as_str()) && !is_skipped_key(key));
    if has_sub_items {
        return None;
    }

    let nested = details_record(map)
        .map(ValidationDetails::from_json)
        .is_some_and(|d| d.is_checked());

    Some(StageValue::Flat(marker || nested))
}

fn checklist_from_object(map: &Map<String, Value>) -> BTreeMap<String, ChecklistItem> {
    map.iter()
        .filter(|(key, _)| !is_skipped_key(key))
        .filter_map(|(key, value)| {
            value
                .as_object()
                .map(|item| (key.clone(), ChecklistItem::from_json(item)))
        })
        .collect()
}

fn details_record(map: &Map<String, Value>) -> Option<&Map<String, Value>> {
    DETAIL_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_object))
}

fn read_flag(map: &Map<String, Value>) -> bool {
    FLAG_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_bool))
        .unwrap_or(false)
}

fn read_bool(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn read_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_absent() {
        assert_eq!(StageValue::from_json(&Value::Null), None);
    }

    #[test]
    fn test_flat_shapes() {
        assert_eq!(StageValue::from_json(&json!(true)), Some(StageValue::Flat(true)));
        assert_eq!(
            StageValue::from_json(&json!({ "check": false, "comment": "waiting" })),
            Some(StageValue::Flat(false))
        );
        assert_eq!(
            StageValue::from_json(&json!({ "value": true, "_id": "abc" })),
            Some(StageValue::Flat(true))
        );
    }

    #[test]
    fn test_flat_with_nested_details() {
        let raw = json!({ "check": false, "details": { "validationCheck": true } });
        assert_eq!(StageValue::from_json(&raw), Some(StageValue::Flat(true)));
    }

    #[test]
    fn test_checklist_skips_private_and_checkin_keys() {
        let raw = json!({
            "_id": "65f0c1",
            "__v": 0,
            "_meta": { "done": true },
            "checkin": { "quality_manager": { "done": true } },
            "drawing_released": { "done": true },
            "fmea_updated": { "done": false },
            "label": "not an item",
        });

        let Some(StageValue::Checklist(items)) = StageValue::from_json(&raw) else {
            panic!("expected checklist");
        };
        assert_eq!(items.len(), 2);
        assert!(items["drawing_released"].done);
        assert!(!items["fmea_updated"].done);
    }

    #[test]
    fn test_item_reads_task_record() {
        let raw = json!({
            "work_instructions": {
                "value": false,
                "task": {
                    "check": true,
                    "tko": true,
                    "ot_op": true,
                    "status": "ok",
                    "responsible": "J. Martin",
                    "when": "2024-03-14",
                    "comment": ""
                }
            }
        });

        let Some(StageValue::Checklist(items)) = StageValue::from_json(&raw) else {
            panic!("expected checklist");
        };
        let item = &items["work_instructions"];
        assert!(!item.done);
        let details = item.details.as_ref().unwrap();
        assert!(details.done);
        assert!(details.tko);
        assert!(details.ot_op);
        assert_eq!(details.status, Some(ValidationStatus::Ok));
        assert_eq!(details.responsible.as_deref(), Some("J. Martin"));
        assert_eq!(details.comment, None);
        assert!(item.is_complete());
    }

    #[test]
    fn test_unrecognized_shapes_degrade() {
        assert_eq!(
            StageValue::from_json(&json!(42)),
            Some(StageValue::Checklist(BTreeMap::new()))
        );
        assert_eq!(
            StageValue::from_json(&json!(["a", "b"])),
            Some(StageValue::Checklist(BTreeMap::new()))
        );
        let item = ChecklistItem::from_json(json!({ "done": "yes" }).as_object().unwrap());
        assert!(!item.done);
    }

    #[test]
    fn test_serialized_stage_reingests() {
        let stage = StageValue::checklist([
            ("a", ChecklistItem::new(true)),
            (
                "b",
                ChecklistItem::new(false).with_details(ValidationDetails {
                    validation_check: true,
                    status: Some(ValidationStatus::Nok),
                    ..Default::default()
                }),
            ),
        ]);

        let json = serde_json::to_value(&stage).unwrap();
        let parsed: StageValue = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, stage);
    }
}
