//! Record identifiers.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier the record store assigns to a row on first successful create.
///
/// Entities carry `Option<RecordId>`: `None` until the store has accepted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a raw store identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw store identifier.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Parses an identifier from its decimal form, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> ModelResult<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
