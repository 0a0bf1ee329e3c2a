//! Field codec: form strings to typed values and back.
//!
//! Encoding sniffs the type of a raw input: numbers become integers
//! (truncated toward zero), `true`/`false` in any case become booleans,
//! everything else stays a string. Empty inputs produce no value at all and
//! are dropped from the outgoing field set.
//!
//! Decoding picks the first *present* member in the fixed order string,
//! integer, boolean. Integer `0` and boolean `false` are real values and
//! display as `0` and `false`; only a value carrying none of the three tags
//! displays as [`ABSENT`].

use docdesk_store::{FieldSet, FieldValue, TypedValue};

/// Display text for a field with no string, integer or boolean member.
pub const ABSENT: &str = "N/A";

/// Encode one raw form input.
///
/// Returns `None` for empty or whitespace-only input.
pub fn encode(raw: &str) -> Option<TypedValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(n) = parse_numeric(trimmed) {
        return Some(TypedValue::Integer(n));
    }

    let value = match trimmed.to_ascii_lowercase().as_str() {
        "true" => TypedValue::Boolean(true),
        "false" => TypedValue::Boolean(false),
        _ => TypedValue::String(trimmed.to_owned()),
    };
    Some(value)
}

/// Encode a set of `(field, raw)` inputs, dropping the empty ones.
pub fn encode_fields<'a, I>(inputs: I) -> FieldSet
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    inputs
        .into_iter()
        .filter_map(|(name, raw)| encode(raw).map(|v| (name.to_owned(), v)))
        .collect()
}

/// Display text for a wire value.
pub fn decode(value: &FieldValue) -> String {
    value
        .typed()
        .map_or_else(|| ABSENT.to_owned(), |v| display(&v))
}

/// Pre-fill text for a form input: like [`decode`], but absent is empty.
pub fn decode_for_input(value: &FieldValue) -> String {
    value.typed().map(|v| display(&v)).unwrap_or_default()
}

/// Display text for a typed value.
pub fn display(value: &TypedValue) -> String {
    match value {
        TypedValue::String(s) => s.clone(),
        TypedValue::Integer(n) => n.to_string(),
        TypedValue::Boolean(b) => b.to_string(),
    }
}

/// Locale-agnostic numeric test. Accepts plain decimal notation with an
/// optional sign, fraction and exponent that parses as a finite number;
/// rejects `inf`, `NaN` and hex.
///
/// The value is the leading signed digit run only: a fraction or exponent is
/// dropped, so `3.9` gives 3 and `1e3` gives 1. A run outside the `i64`
/// range is not numeric.
fn parse_numeric(s: &str) -> Option<i64> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }

    let decimal_only = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal_only
        || !s.bytes().any(|b| b.is_ascii_digit())
        || !s.parse::<f64>().is_ok_and(f64::is_finite)
    {
        return None;
    }

    let unsigned = s.trim_start_matches(['+', '-']);
    let negative = s.starts_with('-');
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        // `.5` and the like: no integer part.
        return Some(0);
    }

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_owned()
    };
    signed.parse().ok()
}
