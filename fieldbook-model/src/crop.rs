//! Crops planted on the farm.

use crate::ids::RecordId;
use crate::mapping::{RecordMapping, WriteMode};
use crate::record::{finite_number, optional_text, record_of, FieldAccess, RawRecord, NAME_FIELD};
use crate::schema::{FieldSpec, TableSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Crops table: projection and write allow-list.
pub static CROP_SCHEMA: TableSchema = TableSchema {
    table: "crop_c",
    fields: &[
        FieldSpec::id(),
        FieldSpec::text(NAME_FIELD),
        FieldSpec::text("name_c"),
        FieldSpec::text("variety_c"),
        FieldSpec::date("planting_date_c"),
        FieldSpec::date("expected_harvest_c"),
        FieldSpec::text("field_location_c"),
        FieldSpec::number("quantity_c"),
        FieldSpec::text("status_c"),
        FieldSpec::text("notes_c"),
    ],
    order_by: None,
    paging: None,
};

/// A planting tracked through to harvest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Crop {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub variety: String,
    pub planting_date: Option<String>,
    pub expected_harvest: Option<String>,
    pub field_location: String,
    pub quantity: f64,
    pub status: String,
    pub notes: String,
}

impl Crop {
    pub const DEFAULT_STATUS: &'static str = "planted";
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            variety: String::new(),
            planting_date: None,
            expected_harvest: None,
            field_location: String::new(),
            quantity: 0.0,
            status: Self::DEFAULT_STATUS.to_string(),
            notes: String::new(),
        }
    }
}

impl RecordMapping for Crop {
    const KIND: &'static str = "crop";

    fn schema() -> &'static TableSchema {
        &CROP_SCHEMA
    }

    fn from_record(raw: &RawRecord) -> Self {
        let defaults = Self::default();
        Self {
            id: raw.record_id(),
            name: raw
                .text("name_c")
                .or_else(|| raw.text(NAME_FIELD))
                .unwrap_or(defaults.name),
            variety: raw.text("variety_c").unwrap_or(defaults.variety),
            planting_date: raw.text("planting_date_c"),
            expected_harvest: raw.text("expected_harvest_c"),
            field_location: raw.text("field_location_c").unwrap_or(defaults.field_location),
            quantity: raw.number("quantity_c").unwrap_or(defaults.quantity),
            status: raw.text("status_c").unwrap_or(defaults.status),
            notes: raw.text("notes_c").unwrap_or(defaults.notes),
        }
    }

    fn to_record(&self, mode: WriteMode) -> RawRecord {
        let display_name = if self.name.trim().is_empty() {
            mode.placeholder_name("Crop")
        } else {
            self.name.clone()
        };
        record_of([
            (NAME_FIELD, Value::String(display_name)),
            ("name_c", Value::String(self.name.clone())),
            ("variety_c", Value::String(self.variety.clone())),
            ("planting_date_c", optional_text(&self.planting_date)),
            ("expected_harvest_c", optional_text(&self.expected_harvest)),
            ("field_location_c", Value::String(self.field_location.clone())),
            ("quantity_c", finite_number(self.quantity, 0.0)),
            ("status_c", Value::String(self.status.clone())),
            ("notes_c", Value::String(self.notes.clone())),
        ])
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
