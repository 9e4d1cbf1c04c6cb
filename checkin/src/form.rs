//! Check-in form state and guarded edits.
//!
//! The form lives under the reserved `checkin` key of a stage document. Edits
//! go through [`CheckinForm::apply`], which refuses anything the actor does
//! not own and leaves the stored value untouched when it does.

use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use readiness::ingest::RESERVED_CHECKIN_KEY;

use crate::evaluator::FieldAuthorizer;
use crate::types::{Actor, CheckinError, CheckinField, Result, RoleFieldUpdate, RoleFieldValue};

/// Values of every section of one check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinForm {
    values: BTreeMap<CheckinField, RoleFieldValue>,
}

impl CheckinForm {
    /// Form with every section blank.
    pub fn new() -> Self {
        Self {
            values: CheckinField::all()
                .into_iter()
                .map(|field| (field, RoleFieldValue::default()))
                .collect(),
        }
    }

    /// Read the form from its JSON object.
    ///
    /// Unknown sections and unreadable values are skipped; missing sections
    /// start blank.
    pub fn from_json(raw: &Value) -> Self {
        let mut form = Self::new();
        let Some(map) = raw.as_object() else {
            return form;
        };

        for (key, value) in map {
            let Some(field) = CheckinField::from_id(key) else {
                continue;
            };
            match serde_json::from_value::<RoleFieldValue>(value.clone()) {
                Ok(parsed) => {
                    form.values.insert(field, parsed);
                }
                Err(e) => {
                    debug!(field = key.as_str(), error = %e, "Skipping unreadable check-in value");
                }
            }
        }
        form
    }

    /// Read the form embedded in a stage document.
    pub fn from_stage_document(stage: &Value) -> Self {
        stage
            .get(RESERVED_CHECKIN_KEY)
            .map(Self::from_json)
            .unwrap_or_else(Self::new)
    }

    /// Serialize back to the stored JSON shape.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .filter_map(|(field, value)| {
                serde_json::to_value(value)
                    .ok()
                    .map(|json| (field.id().to_string(), json))
            })
            .collect();
        Value::Object(map)
    }

    /// Current value of a section.
    pub fn get(&self, field: CheckinField) -> Option<&RoleFieldValue> {
        self.values.get(&field)
    }

    /// Number of signed-off sections.
    pub fn done_count(&self) -> usize {
        self.values.values().filter(|value| value.done).count()
    }

    /// Apply an edit if the actor may make it.
    ///
    /// On denial the form is unchanged and the returned error is what the
    /// actor should be shown.
    pub fn apply(
        &mut self,
        actor: &Actor,
        field_id: &str,
        update: RoleFieldUpdate,
        authorizer: &FieldAuthorizer,
    ) -> Result<&RoleFieldValue> {
        if let Err(denied) = authorizer.check(actor, field_id) {
            warn!(actor = %actor.name, field = field_id, "Check-in edit denied");
            return Err(denied);
        }

        let field = CheckinField::from_id(field_id)
            .ok_or_else(|| CheckinError::UnknownField(field_id.to_string()))?;

        let value = self.values.entry(field).or_default();
        if let Some(done) = update.done {
            value.done = done;
        }
        if let Some(when) = update.when {
            value.when = Some(when);
        }
        if let Some(comment) = update.comment {
            value.comment = Some(comment);
        }
        value.editor_name = Some(actor.name.clone());
        value.edited_at = Some(Utc::now());

        debug!(actor = %actor.name, field = field_id, done = value.done, "Check-in edit applied");
        Ok(&*value)
    }
}

impl Default for CheckinForm {
    fn default() -> Self {
        Self::new()
    }
}
