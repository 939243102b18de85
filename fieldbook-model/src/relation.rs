//! Foreign-key columns.
//!
//! The store returns a relation either as a bare identifier or expanded into
//! an embedded object carrying its own `Id` (and usually a `Name`).

use crate::ids::RecordId;
use crate::record::{coerce_integer, ID_FIELD};
use serde_json::Value;
use tracing::warn;

/// Normalizes a relation column to an optional identifier.
///
/// In order: absent or null gives `None`; an embedded object gives its `Id`;
/// anything else is coerced to an integer. A value that cannot be coerced is
/// logged and yields `None`.
pub fn resolve_relation(value: Option<&Value>) -> Option<RecordId> {
    let value = value.filter(|v| !v.is_null())?;
    let resolved = match value {
        Value::Object(embedded) => embedded
            .get(ID_FIELD)
            .filter(|id| !id.is_null())
            .and_then(coerce_integer),
        scalar => coerce_integer(scalar),
    };
    if resolved.is_none() {
        warn!(value = %value, "could not resolve relation reference");
    }
    resolved.map(RecordId::new)
}

/// Renders a relation for a write payload: the bare identifier or null.
pub fn relation_value(id: Option<RecordId>) -> Value {
    id.map_or(Value::Null, |id| Value::from(id.get()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_object_without_id_is_unresolved() {
        assert_eq!(resolve_relation(Some(&json!({"Name": "x"}))), None);
        assert_eq!(resolve_relation(Some(&json!({"Id": null}))), None);
    }

    #[test]
    fn arrays_and_booleans_are_unresolved() {
        assert_eq!(resolve_relation(Some(&json!([1]))), None);
        assert_eq!(resolve_relation(Some(&json!(true))), None);
    }

    #[test]
    fn relation_value_writes_bare_id() {
        assert_eq!(relation_value(Some(RecordId::new(3))), json!(3));
        assert_eq!(relation_value(None), Value::Null);
    }
}
