//! Raw store records and their coercing field readers.

use crate::ids::RecordId;
use serde_json::{Map, Value};
use tracing::warn;

/// A record as the store hands it over: field name to loosely-typed value.
pub type RawRecord = Map<String, Value>;

/// Identity column present on every table.
pub const ID_FIELD: &str = "Id";

/// The store's built-in display-name column.
pub const NAME_FIELD: &str = "Name";

/// Builds a record from `(field, value)` pairs.
pub fn record_of<const N: usize>(pairs: [(&str, Value); N]) -> RawRecord {
    pairs
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect()
}

/// Typed, non-failing readers over a [`RawRecord`].
///
/// Every reader returns `None` for an absent or null field. A present value
/// of the wrong shape also yields `None` and is logged at `warn`, so callers
/// can substitute their default without branching on the cause.
pub trait FieldAccess {
    /// Returns the field's value unless it is absent or null.
    fn present(&self, field: &str) -> Option<&Value>;

    /// Reads a text column. Numbers and booleans are rendered as text.
    fn text(&self, field: &str) -> Option<String>;

    /// Reads a floating-point column, parsing numeric strings.
    fn number(&self, field: &str) -> Option<f64>;

    /// Reads an integer column, parsing numeric strings.
    fn integer(&self, field: &str) -> Option<i64>;

    /// Reads a boolean column. Accepts `"true"` / `"false"` strings.
    fn flag(&self, field: &str) -> Option<bool>;

    /// Reads the record's identity column.
    fn record_id(&self) -> Option<RecordId> {
        self.integer(ID_FIELD).map(RecordId::new)
    }
}

impl FieldAccess for RawRecord {
    fn present(&self, field: &str) -> Option<&Value> {
        self.get(field).filter(|v| !v.is_null())
    }

    fn text(&self, field: &str) -> Option<String> {
        match self.present(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                warn!(field, value = %other, "expected text, using default");
                None
            }
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        let value = self.present(field)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_leading_float(s),
            _ => None,
        };
        // Overflowing exponents parse to infinity.
        match parsed.filter(|n| n.is_finite()) {
            Some(n) => Some(n),
            None => {
                warn!(field, value = %value, "numeric coercion failed, using default");
                None
            }
        }
    }

    fn integer(&self, field: &str) -> Option<i64> {
        let value = self.present(field)?;
        match coerce_integer(value) {
            Some(n) => Some(n),
            None => {
                warn!(field, value = %value, "integer coercion failed, using default");
                None
            }
        }
    }

    fn flag(&self, field: &str) -> Option<bool> {
        match self.present(field)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            other => {
                warn!(field, value = %other, "expected boolean, using default");
                None
            }
        }
    }
}

/// Coerces a scalar JSON value to an integer without logging.
pub(crate) fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Parses the leading integer of `s`.
///
/// Leading whitespace and a single sign are accepted and parsing stops at the
/// first non-digit, so `" 72F"` is `72` and `"72.6"` is `72`. Returns `None`
/// when no digit precedes the first other character or the value overflows.
pub(crate) fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign = usize::from(matches!(s.as_bytes().first(), Some(b'-' | b'+')));
    let digits = leading_digits(&s[sign..]);
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse().ok()
}

/// Parses the leading decimal number of `s`.
///
/// Accepts the same prefix rules as [`parse_leading_int`] plus a fraction and
/// an exponent, so `"12kg"` is `12.0` and `"2.5e3 m"` is `2500.0`. An exponent
/// without digits is left unconsumed.
pub(crate) fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));

    let whole = leading_digits(&s[end..]);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = leading_digits(&s[end + 1..]);
        if whole > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole == 0 && fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        let exp_digits = leading_digits(&s[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    s[..end].parse().ok()
}

fn leading_digits(s: &str) -> usize {
    s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len())
}

/// Renders an optional text column for a write payload.
pub(crate) fn optional_text(value: &Option<String>) -> Value {
    value.as_ref().map_or(Value::Null, |s| Value::String(s.clone()))
}

/// Renders a number for a write payload. Non-finite values fall back to `default`.
pub(crate) fn finite_number(value: f64, default: f64) -> Value {
    let value = if value.is_finite() { value } else { default };
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leading_int_matches_loose_parsing() {
        assert_eq!(parse_leading_int("72"), Some(72));
        assert_eq!(parse_leading_int("  -4"), Some(-4));
        assert_eq!(parse_leading_int("+9 "), Some(9));
        assert_eq!(parse_leading_int("72.6"), Some(72));
        assert_eq!(parse_leading_int("55F"), Some(55));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
        assert_eq!(parse_leading_int("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_leading_int("9223372036854775807,0"), Some(i64::MAX));
    }

    #[test]
    fn leading_float_stops_at_the_first_non_numeric_character() {
        assert_eq!(parse_leading_float("12kg"), Some(12.0));
        assert_eq!(parse_leading_float(" -0.5 acres"), Some(-0.5));
        assert_eq!(parse_leading_float(".25"), Some(0.25));
        assert_eq!(parse_leading_float("3."), Some(3.0));
        assert_eq!(parse_leading_float("2.5e3 m"), Some(2500.0));
        assert_eq!(parse_leading_float("7e"), Some(7.0));
        assert_eq!(parse_leading_float("1e-2x"), Some(0.01));
        assert_eq!(parse_leading_float("kg12"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("NaN"), None);
        assert_eq!(parse_leading_float("1e400"), Some(f64::INFINITY));
    }

    #[test]
    fn number_reads_unit_suffixed_text() {
        let raw = record_of([
            ("quantity_c", json!("12kg")),
            ("area_c", json!("1e400")),
            ("bad_c", json!("lots")),
        ]);
        assert_eq!(raw.number("quantity_c"), Some(12.0));
        assert_eq!(raw.number("area_c"), None);
        assert_eq!(raw.number("bad_c"), None);
    }

    #[test]
    fn coerce_integer_accepts_whole_floats_only() {
        assert_eq!(coerce_integer(&json!(7)), Some(7));
        assert_eq!(coerce_integer(&json!(7.0)), Some(7));
        assert_eq!(coerce_integer(&json!(7.5)), None);
        assert_eq!(coerce_integer(&json!("12")), Some(12));
        assert_eq!(coerce_integer(&json!(true)), None);
    }

    #[test]
    fn finite_number_replaces_nan() {
        assert_eq!(finite_number(f64::NAN, 0.0), json!(0.0));
        assert_eq!(finite_number(2.5, 0.0), json!(2.5));
    }
}
