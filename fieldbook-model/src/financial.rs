//! Income and expense entries.

use crate::ids::RecordId;
use crate::mapping::{RecordMapping, WriteMode};
use crate::record::{finite_number, optional_text, record_of, FieldAccess, RawRecord, NAME_FIELD};
use crate::relation::{relation_value, resolve_relation};
use crate::schema::{FieldSpec, FieldType, TableSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ledger table. `Name` is projected for the description fallback but never written.
pub static FINANCIAL_SCHEMA: TableSchema = TableSchema {
    table: "financial_c",
    fields: &[
        FieldSpec::id(),
        FieldSpec::read_only(NAME_FIELD, FieldType::Text),
        FieldSpec::text("type_c"),
        FieldSpec::text("category_c"),
        FieldSpec::number("amount_c"),
        FieldSpec::text("description_c"),
        FieldSpec::date("date_c"),
        FieldSpec::relation("crop_id_c"),
    ],
    order_by: None,
    paging: None,
};

/// An income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Financial {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// `"income"` or `"expense"`. Other values pass through untouched.
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub date: Option<String>,
    pub crop_id: Option<RecordId>,
}

impl Financial {
    pub fn is_income(&self) -> bool {
        self.kind == "income"
    }

    /// Amount with expenses negated.
    pub fn signed_amount(&self) -> f64 {
        if self.is_income() { self.amount } else { -self.amount }
    }
}

impl Default for Financial {
    fn default() -> Self {
        Self {
            id: None,
            kind: "expense".to_string(),
            category: String::new(),
            amount: 0.0,
            description: String::new(),
            date: None,
            crop_id: None,
        }
    }
}

impl RecordMapping for Financial {
    const KIND: &'static str = "financial";

    fn schema() -> &'static TableSchema {
        &FINANCIAL_SCHEMA
    }

    fn from_record(raw: &RawRecord) -> Self {
        let defaults = Self::default();
        Self {
            id: raw.record_id(),
            kind: raw.text("type_c").unwrap_or(defaults.kind),
            category: raw.text("category_c").unwrap_or(defaults.category),
            amount: raw.number("amount_c").unwrap_or(defaults.amount),
            description: raw
                .text("description_c")
                .or_else(|| raw.text(NAME_FIELD))
                .unwrap_or(defaults.description),
            date: raw.text("date_c"),
            crop_id: resolve_relation(raw.get("crop_id_c")),
        }
    }

    fn to_record(&self, _mode: WriteMode) -> RawRecord {
        record_of([
            ("type_c", Value::String(self.kind.clone())),
            ("category_c", Value::String(self.category.clone())),
            ("amount_c", finite_number(self.amount, 0.0)),
            ("description_c", Value::String(self.description.clone())),
            ("date_c", optional_text(&self.date)),
            ("crop_id_c", relation_value(self.crop_id)),
        ])
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
