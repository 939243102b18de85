//! High/low temperature pairs and their ambiguous text encoding.
//!
//! The weather table stores a day's temperature in a single column that has
//! been written three different ways over time:
//!
//! | form            | example                   | decodes to      |
//! |-----------------|---------------------------|-----------------|
//! | `high,low`      | `"70,55"`                 | `{70, 55}`      |
//! | JSON object     | `{"high":80,"low":65}`    | `{80, 65}`      |
//! | single reading  | `"72"`                    | `{77, 67}`      |
//!
//! The checks run in that order and the first applicable form wins. Anything
//! that fails to parse decodes to [`Temperature::DEFAULT`] with a warning.

use crate::record::parse_leading_int;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;
use tracing::warn;

/// A day's forecast high and low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Temperature {
    pub high: i64,
    pub low: i64,
}

impl Temperature {
    /// Substituted whenever the column is missing or unreadable.
    pub const DEFAULT: Temperature = Temperature { high: 75, low: 60 };

    /// Offset applied either side of a single reading.
    pub const SPREAD: i64 = 5;

    pub const fn new(high: i64, low: i64) -> Self {
        Self { high, low }
    }

    /// Decodes a raw column value. Never fails.
    ///
    /// Numbers are treated like their decimal text and embedded objects like
    /// their JSON text, so both flow through the same precedence list.
    pub fn decode(value: Option<&Value>) -> Self {
        let text: Cow<'_, str> = match value {
            None | Some(Value::Null) => return Self::DEFAULT,
            Some(Value::String(s)) => Cow::Borrowed(s),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(object @ Value::Object(_)) => Cow::Owned(object.to_string()),
            Some(other) => {
                warn!(value = %other, "unsupported temperature encoding, using default");
                return Self::DEFAULT;
            }
        };

        match EncodedTemperature::classify(&text).decode() {
            Ok(temperature) => temperature,
            Err(err) => {
                warn!(value = %text, error = %err, "error parsing temperature, using default");
                Self::DEFAULT
            }
        }
    }

    /// Encodes for a write payload using the `high,low` form.
    pub fn encode(&self) -> Value {
        Value::String(format!("{},{}", self.high, self.low))
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The forms a stored temperature can take, classified by sniffing the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedTemperature<'a> {
    /// Empty or whitespace-only text.
    Missing,
    /// `high,low`, split on the first comma.
    Pair {
        text: &'a str,
        high: &'a str,
        low: &'a str,
    },
    /// Text containing `{`, parsed as an object with `high` and `low` keys.
    Structured(&'a str),
    /// A single reading.
    Scalar(&'a str),
}

#[derive(Debug, Error)]
enum DecodeError {
    #[error("pair halves are not integers")]
    Pair,
    #[error("malformed temperature object: {0}")]
    Structured(#[from] serde_json::Error),
    #[error("reading is not an integer")]
    Scalar,
    #[error("reading out of range")]
    Overflow,
}

impl<'a> EncodedTemperature<'a> {
    /// Classifies `text` using the fixed precedence: comma, brace, scalar.
    pub fn classify(text: &'a str) -> Self {
        if text.trim().is_empty() {
            EncodedTemperature::Missing
        } else if let Some((high, low)) = text.split_once(',') {
            EncodedTemperature::Pair { text, high, low }
        } else if text.contains('{') {
            EncodedTemperature::Structured(text)
        } else {
            EncodedTemperature::Scalar(text)
        }
    }

    fn decode(self) -> Result<Temperature, DecodeError> {
        match self {
            EncodedTemperature::Missing => Ok(Temperature::DEFAULT),
            EncodedTemperature::Pair { text, high, low } => {
                match (parse_leading_int(high), parse_leading_int(low)) {
                    (Some(high), Some(low)) => Ok(Temperature::new(high, low)),
                    // JSON objects contain commas too; only they get a second chance.
                    _ if text.contains('{') => EncodedTemperature::Structured(text).decode(),
                    _ => Err(DecodeError::Pair),
                }
            }
            EncodedTemperature::Structured(text) => Ok(serde_json::from_str(text)?),
            EncodedTemperature::Scalar(text) => {
                let reading = parse_leading_int(text).ok_or(DecodeError::Scalar)?;
                let high = reading
                    .checked_add(Temperature::SPREAD)
                    .ok_or(DecodeError::Overflow)?;
                let low = reading
                    .checked_sub(Temperature::SPREAD)
                    .ok_or(DecodeError::Overflow)?;
                Ok(Temperature::new(high, low))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_comma_over_brace() {
        let text = r#"{"high":80,"low":65}"#;
        assert!(matches!(
            EncodedTemperature::classify(text),
            EncodedTemperature::Pair { .. }
        ));
        assert_eq!(
            EncodedTemperature::classify(r#"{"high":80}"#),
            EncodedTemperature::Structured(r#"{"high":80}"#)
        );
        assert_eq!(EncodedTemperature::classify("  "), EncodedTemperature::Missing);
        assert_eq!(EncodedTemperature::classify("72"), EncodedTemperature::Scalar("72"));
    }

    #[test]
    fn scalar_overflow_is_an_error() {
        let max = i64::MAX.to_string();
        assert!(EncodedTemperature::classify(&max).decode().is_err());
    }
}
