//! Aggregation of per-record batch write outcomes.
//!
//! A batch write reports one result per submitted record. Mixed outcomes
//! are a normal terminal state: every failure is logged, and callers get a
//! single entity, a boolean, or [`StoreError::WriteFailed`] depending on the
//! operation.

use crate::error::{StoreError, StoreResult};
use crate::protocol::{FieldError, RecordResult};
use fieldbook_model::{RawRecord, RecordMapping};
use tracing::{error, warn};

/// A failed record's diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub message: Option<String>,
    pub field_errors: Vec<FieldError>,
}

impl BatchFailure {
    /// The record's own message, else its first field error as `field: message`.
    pub fn summary(&self) -> Option<String> {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| {
                self.field_errors
                    .first()
                    .map(|e| format!("{}: {}", e.field_label, e.message))
            })
    }
}

/// Successes and failures of one batch, each in submission order.
///
/// A success holds the stored row when the store echoed one back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub successes: Vec<Option<RawRecord>>,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    /// Partitions `results`, logging every failure against `table`.
    ///
    /// Every result is classified; a failure never stops the scan.
    pub fn aggregate(table: &str, results: Vec<RecordResult>) -> Self {
        let mut summary = Self::default();
        for (index, result) in results.into_iter().enumerate() {
            if result.success {
                summary.successes.push(result.data.filter(|raw| !raw.is_empty()));
                continue;
            }

            for field_error in result.field_errors() {
                error!(
                    table,
                    index,
                    field = %field_error.field_label,
                    reason = %field_error.message,
                    "batch record field error"
                );
            }
            if let Some(message) = &result.message {
                error!(table, index, reason = %message, "batch record failed");
            }

            summary.failures.push(BatchFailure {
                message: result.message,
                field_errors: result.errors.unwrap_or_default(),
            });
        }

        if summary.is_partial() {
            warn!(
                table,
                succeeded = summary.successes.len(),
                failed = summary.failures.len(),
                "batch partially failed"
            );
        }
        summary
    }

    /// Some records succeeded and some failed.
    pub fn is_partial(&self) -> bool {
        !self.successes.is_empty() && !self.failures.is_empty()
    }

    /// The message reported for the batch as a whole: the first failure's
    /// summary, or `fallback` when there is nothing more specific.
    pub fn representative_message(&self, fallback: &str) -> String {
        self.failures
            .first()
            .and_then(BatchFailure::summary)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Maps every successful record the store echoed back, failing only when
    /// none succeeded. Successes without a stored row are not mapped.
    pub fn into_created<E: RecordMapping>(self) -> StoreResult<Vec<E>> {
        if self.successes.is_empty() {
            let fallback = format!("failed to create {}", E::KIND);
            return Err(StoreError::WriteFailed(self.representative_message(&fallback)));
        }
        Ok(self.successes.iter().flatten().map(E::from_record).collect())
    }

    /// Outcome of an update: `true` when at least one record was updated.
    pub fn updated<E: RecordMapping>(&self) -> StoreResult<bool> {
        if self.successes.is_empty() {
            let fallback = format!("failed to update {}", E::KIND);
            return Err(StoreError::WriteFailed(self.representative_message(&fallback)));
        }
        Ok(true)
    }

    /// Outcome of a delete: `true` when at least one record was deleted.
    pub fn deleted(&self) -> bool {
        !self.successes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(message: Option<&str>, errors: &[(&str, &str)]) -> RecordResult {
        RecordResult::failed(
            message,
            errors.iter().map(|(f, m)| FieldError::new(*f, *m)).collect(),
        )
    }

    #[test]
    fn representative_message_prefers_top_level_message() {
        let summary = BatchSummary::aggregate(
            "t",
            vec![
                failed(Some("quota exceeded"), &[("Name", "required")]),
                failed(Some("second"), &[]),
            ],
        );
        assert_eq!(summary.representative_message("x"), "quota exceeded");
    }

    #[test]
    fn representative_message_falls_back_to_field_error() {
        let summary = BatchSummary::aggregate("t", vec![failed(None, &[("Amount", "must be > 0")])]);
        assert_eq!(summary.representative_message("x"), "Amount: must be > 0");
    }

    #[test]
    fn representative_message_generic_fallback() {
        let summary = BatchSummary::aggregate("t", vec![failed(None, &[])]);
        assert_eq!(
            summary.representative_message("failed to create crop"),
            "failed to create crop"
        );
        assert_eq!(BatchSummary::default().representative_message("none"), "none");
    }

    #[test]
    fn partial_is_mixed_only() {
        let mixed = BatchSummary::aggregate(
            "t",
            vec![RecordResult::succeeded(None), failed(Some("no"), &[])],
        );
        assert!(mixed.is_partial());
        assert!(mixed.deleted());

        let all_failed = BatchSummary::aggregate("t", vec![failed(Some("no"), &[])]);
        assert!(!all_failed.is_partial());
        assert!(!all_failed.deleted());
    }

    #[test]
    fn created_skips_successes_without_data() {
        let summary = BatchSummary::aggregate(
            "crop_c",
            vec![
                RecordResult::succeeded(None),
                RecordResult::succeeded(Some(serde_json::Map::new())),
            ],
        );
        assert_eq!(summary.successes, vec![None, None]);
        let created = summary.into_created::<fieldbook_model::Crop>().unwrap();
        assert!(created.is_empty());
    }
}
