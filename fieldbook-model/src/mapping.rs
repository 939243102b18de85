//! The contract between an entity type and its store table.

use crate::ids::RecordId;
use crate::record::{RawRecord, ID_FIELD};
use crate::schema::TableSchema;
use serde_json::Value;

/// Which write a payload is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

impl WriteMode {
    /// Placeholder display name for a row whose own name is blank,
    /// e.g. `"New Crop"` or `"Updated Crop"`.
    pub fn placeholder_name(&self, noun: &str) -> String {
        match self {
            WriteMode::Create => format!("New {noun}"),
            WriteMode::Update => format!("Updated {noun}"),
        }
    }
}

/// Two-way mapping between a store record and a typed entity.
///
/// Every entity kind implements this once. `from_record` is total: it never
/// fails and fills every missing or malformed column with the entity's
/// default. `to_record` emits exactly the table's updateable columns and
/// never the identity or audit columns.
pub trait RecordMapping: Sized + Send + Sync + 'static {
    /// Short lowercase label used in log lines and errors, e.g. `"crop"`.
    const KIND: &'static str;

    /// The table this entity lives in.
    fn schema() -> &'static TableSchema;

    /// Builds the entity from a store record.
    fn from_record(raw: &RawRecord) -> Self;

    /// Builds a write payload without the identity column.
    fn to_record(&self, mode: WriteMode) -> RawRecord;

    /// The store-assigned identifier, if the entity has been created.
    fn id(&self) -> Option<RecordId>;

    /// Payload for a create batch.
    fn to_create_record(&self) -> RawRecord {
        self.to_record(WriteMode::Create)
    }

    /// Payload for an update batch, addressed to `id`.
    fn to_update_record(&self, id: RecordId) -> RawRecord {
        let mut record = self.to_record(WriteMode::Update);
        record.insert(ID_FIELD.to_string(), Value::from(id.get()));
        record
    }
}
