//! Farm work items.

use crate::ids::RecordId;
use crate::mapping::{RecordMapping, WriteMode};
use crate::record::{optional_text, record_of, FieldAccess, RawRecord, NAME_FIELD};
use crate::relation::{relation_value, resolve_relation};
use crate::schema::{FieldSpec, TableSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub static TASK_SCHEMA: TableSchema = TableSchema {
    table: "task_c",
    fields: &[
        FieldSpec::id(),
        FieldSpec::text(NAME_FIELD),
        FieldSpec::text("title_c"),
        FieldSpec::text("description_c"),
        FieldSpec::date("due_date_c"),
        FieldSpec::text("priority_c"),
        FieldSpec::text("category_c"),
        FieldSpec::bool("completed_c"),
        FieldSpec::text("status_c"),
        FieldSpec::relation("crop_id_c"),
    ],
    order_by: None,
    paging: None,
};

/// A unit of farm work, optionally tied to a crop.
///
/// `status` and `completed` are stored independently; nothing here keeps
/// them consistent with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub priority: String,
    pub category: String,
    pub completed: bool,
    pub status: String,
    pub crop_id: Option<RecordId>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            due_date: None,
            priority: "medium".to_string(),
            category: "general".to_string(),
            completed: false,
            status: "pending".to_string(),
            crop_id: None,
        }
    }
}

impl RecordMapping for Task {
    const KIND: &'static str = "task";

    fn schema() -> &'static TableSchema {
        &TASK_SCHEMA
    }

    fn from_record(raw: &RawRecord) -> Self {
        let defaults = Self::default();
        Self {
            id: raw.record_id(),
            title: raw
                .text("title_c")
                .or_else(|| raw.text(NAME_FIELD))
                .unwrap_or(defaults.title),
            description: raw.text("description_c").unwrap_or(defaults.description),
            due_date: raw.text("due_date_c"),
            priority: raw.text("priority_c").unwrap_or(defaults.priority),
            category: raw.text("category_c").unwrap_or(defaults.category),
            completed: raw.flag("completed_c").unwrap_or(defaults.completed),
            status: raw.text("status_c").unwrap_or(defaults.status),
            crop_id: resolve_relation(raw.get("crop_id_c")),
        }
    }

    fn to_record(&self, mode: WriteMode) -> RawRecord {
        let display_name = if self.title.trim().is_empty() {
            mode.placeholder_name("Task")
        } else {
            self.title.clone()
        };
        record_of([
            (NAME_FIELD, Value::String(display_name)),
            ("title_c", Value::String(self.title.clone())),
            ("description_c", Value::String(self.description.clone())),
            ("due_date_c", optional_text(&self.due_date)),
            ("priority_c", Value::String(self.priority.clone())),
            ("category_c", Value::String(self.category.clone())),
            ("completed_c", Value::Bool(self.completed)),
            ("status_c", Value::String(self.status.clone())),
            ("crop_id_c", relation_value(self.crop_id)),
        ])
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
