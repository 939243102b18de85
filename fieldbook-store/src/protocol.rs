//! Request and response bodies exchanged with the record store.
//!
//! Field spellings follow the store's wire format exactly, which mixes
//! `PascalCase` (`FieldName`, `RecordIds`) and `camelCase` (`orderBy`,
//! `fieldLabel`) keys.

use fieldbook_model::{RawRecord, RecordId, SortType, TableSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a read projection: `{"field": {"Name": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub field: FieldName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

impl FieldRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
        }
    }
}

/// Comparison applied by a [`WhereClause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Contains,
}

/// A filter on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: FilterOperator,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
}

impl WhereClause {
    pub fn new(field_name: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            values: vec![value.into()],
        }
    }

    pub fn equal_to(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, FilterOperator::EqualTo, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    pub sorttype: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

/// Parameters for `fetchRecords`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    pub fields: Vec<FieldRef>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<WhereClause>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(rename = "pagingInfo", default, skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
}

impl FetchParams {
    /// The table's projection, ordering and paging.
    pub fn for_schema(schema: &TableSchema) -> Self {
        Self {
            fields: projection(schema),
            filters: Vec::new(),
            order_by: schema
                .order_by
                .iter()
                .map(|sort| OrderBy {
                    field_name: sort.field.to_string(),
                    sorttype: sort.sort.as_str().to_string(),
                })
                .collect(),
            paging_info: schema.paging.map(|page| PagingInfo {
                limit: page.limit,
                offset: page.offset,
            }),
        }
    }

    /// Adds filters to the request.
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = WhereClause>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Overrides the page size of a paged request. Unpaged requests stay unpaged.
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        if let Some(page) = self.paging_info.as_mut() {
            page.limit = limit;
        }
        self
    }

    /// Whether the request sorts `field` in `direction`.
    pub fn sorts_by(&self, field: &str, direction: SortType) -> bool {
        self.order_by
            .iter()
            .any(|o| o.field_name == field && o.sorttype == direction.as_str())
    }
}

/// Parameters for `getRecordById`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub fields: Vec<FieldRef>,
}

impl ProjectionParams {
    pub fn for_schema(schema: &TableSchema) -> Self {
        Self {
            fields: projection(schema),
        }
    }
}

fn projection(schema: &TableSchema) -> Vec<FieldRef> {
    schema.projection().map(FieldRef::new).collect()
}

/// Body of a create or update batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsPayload {
    pub records: Vec<RawRecord>,
}

/// Body of a delete batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<RecordId>,
}

/// Reply to `fetchRecords`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<RawRecord>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FetchResponse {
    pub fn ok(data: Vec<RawRecord>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Reply to `getRecordById`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<RawRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GetResponse {
    pub fn ok(data: Option<RawRecord>) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Reply to a create, update or delete batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Option<Vec<RecordResult>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl WriteResponse {
    pub fn ok(results: Vec<RecordResult>) -> Self {
        Self {
            success: true,
            results: Some(results),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            message: Some(message.into()),
        }
    }
}

/// Outcome of one record within a write batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default)]
    pub data: Option<RawRecord>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
}

impl RecordResult {
    pub fn succeeded(data: Option<RawRecord>) -> Self {
        Self {
            success: true,
            data,
            ..Self::default()
        }
    }

    pub fn failed(message: Option<&str>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.map(str::to_string),
            errors: Some(errors),
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        self.errors.as_deref().unwrap_or_default()
    }
}

/// A per-column validation error reported for a failed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "fieldLabel")]
    pub field_label: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field_label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_label: field_label.into(),
            message: message.into(),
        }
    }
}

/// Reply from a hosted function invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}
