//! Farms and their profile validation.

use crate::ids::RecordId;
use crate::mapping::{RecordMapping, WriteMode};
use crate::record::{finite_number, record_of, FieldAccess, RawRecord, NAME_FIELD};
use crate::schema::{FieldSpec, FieldType, PageSpec, SortSpec, SortType, TableSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Farms table. The audit columns are projected for display only.
pub static FARM_SCHEMA: TableSchema = TableSchema {
    table: "farm_c",
    fields: &[
        FieldSpec::id(),
        FieldSpec::text(NAME_FIELD),
        FieldSpec::text("Tags"),
        FieldSpec::read_only("Owner", FieldType::Relation),
        FieldSpec::read_only("CreatedOn", FieldType::Timestamp),
        FieldSpec::read_only("CreatedBy", FieldType::Relation),
        FieldSpec::read_only("ModifiedOn", FieldType::Timestamp),
        FieldSpec::read_only("ModifiedBy", FieldType::Relation),
        FieldSpec::text("farm_name_c"),
        FieldSpec::text("location_c"),
        FieldSpec::text("contact_email_c"),
        FieldSpec::text("farm_type_c"),
        FieldSpec::number("farm_size_c"),
    ],
    order_by: Some(SortSpec {
        field: "CreatedOn",
        sort: SortType::Desc,
    }),
    paging: Some(PageSpec {
        limit: 100,
        offset: 0,
    }),
};

/// A farm profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Farm {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub tags: String,
    pub farm_name: String,
    pub location: String,
    pub contact_email: String,
    pub farm_type: String,
    /// Acreage. `None` when the farm has not recorded one.
    pub farm_size: Option<f64>,
    /// Store-maintained audit columns. Ignored on writes.
    #[serde(skip_serializing_if = "FarmAudit::is_empty")]
    pub audit: FarmAudit,
}

/// Who owns a farm row and when it last changed.
///
/// User columns come back expanded as `{Id, Name}`; the display name is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FarmAudit {
    pub owner: Option<String>,
    pub created_on: Option<String>,
    pub created_by: Option<String>,
    pub modified_on: Option<String>,
    pub modified_by: Option<String>,
}

impl FarmAudit {
    fn from_record(raw: &RawRecord) -> Self {
        Self {
            owner: user_name(raw, "Owner"),
            created_on: raw.text("CreatedOn"),
            created_by: user_name(raw, "CreatedBy"),
            modified_on: raw.text("ModifiedOn"),
            modified_by: user_name(raw, "ModifiedBy"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn user_name(raw: &RawRecord, field: &str) -> Option<String> {
    match raw.present(field)? {
        Value::Object(user) => user.text(NAME_FIELD),
        _ => raw.text(field),
    }
}

/// One problem found by [`Farm::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Farm {
    /// Checks the profile before it is submitted.
    ///
    /// Collects every issue rather than stopping at the first. Writes do not
    /// call this; it is up to the caller.
    pub fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        for (field, value, label) in [
            ("name", &self.name, "Name"),
            ("farmName", &self.farm_name, "Farm name"),
            ("location", &self.location, "Location"),
            ("farmType", &self.farm_type, "Farm type"),
        ] {
            if value.trim().is_empty() {
                issues.push(FieldIssue::new(field, format!("{label} is required")));
            }
        }

        if let Some(size) = self.farm_size {
            if !(size.is_finite() && size > 0.0) {
                issues.push(FieldIssue::new("farmSize", "Farm size must be a positive number"));
            }
        }

        if !self.contact_email.is_empty() && !looks_like_email(&self.contact_email) {
            issues.push(FieldIssue::new(
                "contactEmail",
                "Please enter a valid email address",
            ));
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

impl RecordMapping for Farm {
    const KIND: &'static str = "farm";

    fn schema() -> &'static TableSchema {
        &FARM_SCHEMA
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.record_id(),
            name: raw.text(NAME_FIELD).unwrap_or_default(),
            tags: raw.text("Tags").unwrap_or_default(),
            farm_name: raw.text("farm_name_c").unwrap_or_default(),
            location: raw.text("location_c").unwrap_or_default(),
            contact_email: raw.text("contact_email_c").unwrap_or_default(),
            farm_type: raw.text("farm_type_c").unwrap_or_default(),
            farm_size: raw.number("farm_size_c"),
            audit: FarmAudit::from_record(raw),
        }
    }

    fn to_record(&self, _mode: WriteMode) -> RawRecord {
        record_of([
            (NAME_FIELD, Value::String(self.name.clone())),
            ("Tags", Value::String(self.tags.clone())),
            ("farm_name_c", Value::String(self.farm_name.clone())),
            ("location_c", Value::String(self.location.clone())),
            ("contact_email_c", Value::String(self.contact_email.clone())),
            ("farm_type_c", Value::String(self.farm_type.clone())),
            (
                "farm_size_c",
                self.farm_size
                    .filter(|size| size.is_finite())
                    .map_or(Value::Null, |size| finite_number(size, 0.0)),
            ),
        ])
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
