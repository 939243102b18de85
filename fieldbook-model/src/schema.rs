//! Static table descriptions: projected columns, write allow-lists, ordering and paging.

use crate::error::{ModelError, ModelResult};
use crate::record::{RawRecord, ID_FIELD};

/// Describes one record table: which columns a read projects, how results are
/// ordered and paged, and which columns a write may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    pub order_by: Option<SortSpec>,
    pub paging: Option<PageSpec>,
}

/// A column in a table's read projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    /// Whether the column may appear in create/update payloads.
    /// Identity and audit columns never do.
    pub updateable: bool,
}

impl FieldSpec {
    const fn simple(name: &'static str, field_type: FieldType, updateable: bool) -> Self {
        Self {
            name,
            field_type,
            updateable,
        }
    }

    /// The identity column.
    pub const fn id() -> Self {
        Self::simple(ID_FIELD, FieldType::Number, false)
    }

    /// Shorthand for an updateable text column.
    pub const fn text(name: &'static str) -> Self {
        Self::simple(name, FieldType::Text, true)
    }

    /// Shorthand for an updateable numeric column.
    pub const fn number(name: &'static str) -> Self {
        Self::simple(name, FieldType::Number, true)
    }

    /// Shorthand for an updateable boolean column.
    pub const fn bool(name: &'static str) -> Self {
        Self::simple(name, FieldType::Bool, true)
    }

    /// Shorthand for an updateable date column (`YYYY-MM-DD` text).
    pub const fn date(name: &'static str) -> Self {
        Self::simple(name, FieldType::Date, true)
    }

    /// Shorthand for an updateable foreign-key column.
    pub const fn relation(name: &'static str) -> Self {
        Self::simple(name, FieldType::Relation, true)
    }

    /// Shorthand for an updateable encoded high/low temperature column.
    pub const fn temperature(name: &'static str) -> Self {
        Self::simple(name, FieldType::EncodedTemperature, true)
    }

    /// A column that is projected on reads but never written.
    pub const fn read_only(name: &'static str, field_type: FieldType) -> Self {
        Self::simple(name, field_type, false)
    }
}

/// The shape of a column's value in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    Bool,
    Date,
    Relation,
    EncodedTemperature,
    Timestamp,
}

/// Result ordering for a table read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub sort: SortType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortType {
    Asc,
    Desc,
}

impl SortType {
    /// The store's spelling of the sort direction.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortType::Asc => "ASC",
            SortType::Desc => "DESC",
        }
    }
}

/// Page window for a table read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub limit: u32,
    pub offset: u32,
}

impl TableSchema {
    /// Column names requested on every read, in declaration order.
    pub fn projection(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Column names a write payload may carry.
    pub fn updateable_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.updateable).map(|f| f.name)
    }

    /// Looks up a column by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_updateable(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.updateable)
    }

    /// Rejects a write payload carrying anything outside the allow-list.
    ///
    /// `Id` is accepted because update payloads address their row with it.
    pub fn check_payload(&self, record: &RawRecord) -> ModelResult<()> {
        match record
            .keys()
            .find(|k| k.as_str() != ID_FIELD && !self.is_updateable(k))
        {
            Some(field) => Err(ModelError::FieldNotUpdateable {
                table: self.table,
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }
}
