//! Value coercion.
//!
//! A raw record value turns into exactly one [`Value`] variant, decided once
//! here rather than re-inspected downstream. `;` separates list items, `|`
//! separates the ends of a `min|max` range (limit-shaped keys only), and a
//! literal `0` inside a `;` list is the sentinel for an empty slot.

use std::fmt;

use serde::Serialize;

use crate::{
    definition::{KeyDefinition, ValueShape},
    error::Error,
};

pub(crate) const ITEM_SEPARATOR: char = ';';
pub(crate) const PAIR_SEPARATOR: char = '|';

/// A coerced record value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An empty slot (the literal `0` inside a `;`-separated list).
    Absent,
    Int(i64),
    Bool(bool),
    Str(String),
    /// A `min|max` range. A non-numeric end is `None`.
    Pair(Option<i64>, Option<i64>),
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(number) => Some(*number),
            Value::Absent
            | Value::Bool(_)
            | Value::Str(_)
            | Value::Pair(..)
            | Value::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(boolean) => Some(*boolean),
            Value::Absent
            | Value::Int(_)
            | Value::Str(_)
            | Value::Pair(..)
            | Value::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            Value::Absent
            | Value::Int(_)
            | Value::Bool(_)
            | Value::Pair(..)
            | Value::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            Value::Absent
            | Value::Int(_)
            | Value::Bool(_)
            | Value::Str(_)
            | Value::Pair(..) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "null"),
            Value::Int(number) => write!(f, "{number}"),
            Value::Bool(boolean) => write!(f, "{boolean}"),
            Value::Str(text) => write!(f, "{text}"),
            Value::Pair(min, max) => {
                let end = |v: &Option<i64>| v.map_or_else(|| "null".to_string(), |n| n.to_string());
                write!(f, "{}{PAIR_SEPARATOR}{}", end(min), end(max))
            }
            Value::List(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", joined.join(";"))
            }
        }
    }
}

/// Coerce a raw textual value for the given key.
pub(crate) fn coerce(
    definition: Option<&KeyDefinition>,
    code: &str,
    field: &str,
    raw: &str,
) -> Result<Value, Error> {
    if raw.contains(ITEM_SEPARATOR) {
        let mut items = raw
            .split(ITEM_SEPARATOR)
            .map(|part| coerce_single(definition, code, field, part))
            .collect::<Result<Vec<_>, _>>()?;
        // the literal 0 marks a slot with no value
        for item in &mut items {
            if *item == Value::Int(0) {
                *item = Value::Absent;
            }
        }
        if items.len() == 1 {
            if let Some(only) = items.pop() {
                return Ok(only);
            }
        }
        Ok(Value::List(items))
    } else {
        coerce_single(definition, code, field, raw)
    }
}

fn coerce_single(
    definition: Option<&KeyDefinition>,
    code: &str,
    field: &str,
    raw: &str,
) -> Result<Value, Error> {
    if raw.contains(PAIR_SEPARATOR) {
        if definition.is_some_and(|d| d.shape == ValueShape::LimitList) {
            // segments beyond the second are dropped
            let mut ends = raw.split(PAIR_SEPARATOR).map(parse_digits);
            let min = ends.next().flatten();
            let max = ends.next().flatten();
            return Ok(Value::Pair(min, max));
        }
        return Err(Error::ForbiddenListInList {
            code: code.to_string(),
            field: field.to_string(),
            value: raw.to_string(),
        });
    }
    if let Some(number) = parse_digits(raw) {
        return Ok(Value::Int(number));
    }
    if raw.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if raw.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if definition.is_some_and(|d| d.shape == ValueShape::Text) && !raw.is_empty() {
        return Ok(Value::Str(raw.trim().to_string()));
    }
    Ok(Value::Str(raw.to_string()))
}

fn parse_digits(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DefinitionTable;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn coerce_for(code: &str, raw: &str) -> Result<Value, Error> {
        let table = DefinitionTable::default();
        let definition = table.get(code);
        coerce(definition, code, table.field_name(code), raw)
    }

    #[rstest]
    #[case("42", Value::Int(42))]
    #[case("0", Value::Int(0))]
    #[case("true", Value::Bool(true))]
    #[case("FALSE", Value::Bool(false))]
    #[case("True", Value::Bool(true))]
    #[case("Alice", Value::Str("Alice".to_string()))]
    #[case("4 2", Value::Str("4 2".to_string()))]
    fn test_scalar_round_trips(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(coerce_for("MAX", raw).unwrap(), expected);
    }

    #[test]
    fn test_semicolon_splits_into_list() {
        assert_eq!(
            coerce_for("AVA", "3;2;1").unwrap(),
            Value::List(vec![Value::Int(3), Value::Int(2), Value::Int(1)])
        );
    }

    #[test]
    fn test_sentinel_zero_becomes_absent() {
        assert_eq!(
            coerce_for("AVA", "3;0;1").unwrap(),
            Value::List(vec![Value::Int(3), Value::Absent, Value::Int(1)])
        );
    }

    #[test]
    fn test_scalar_zero_is_kept() {
        assert_eq!(coerce_for("AVA", "0").unwrap(), Value::Int(0));
    }

    #[test]
    fn test_limit_pair() {
        assert_eq!(
            coerce_for("LIM", "3|7").unwrap(),
            Value::Pair(Some(3), Some(7))
        );
    }

    #[test]
    fn test_limit_pair_truncates_to_two_segments() {
        assert_eq!(
            coerce_for("LIM", "1|2|3").unwrap(),
            Value::Pair(Some(1), Some(2))
        );
    }

    #[test]
    fn test_limit_pair_non_numeric_end_is_null() {
        assert_eq!(
            coerce_for("LIM", "a|4").unwrap(),
            Value::Pair(None, Some(4))
        );
    }

    #[test]
    fn test_pair_inside_limit_list() {
        assert_eq!(
            coerce_for("LIM", "1|2;3").unwrap(),
            Value::List(vec![Value::Pair(Some(1), Some(2)), Value::Int(3)])
        );
    }

    #[test]
    fn test_pair_forbidden_outside_limit() {
        let error = coerce_for("AVA", "1|2").unwrap_err();
        assert_eq!(
            error,
            Error::ForbiddenListInList {
                code: "AVA".to_string(),
                field: "available".to_string(),
                value: "1|2".to_string(),
            }
        );
    }

    #[test]
    fn test_pair_forbidden_on_unknown_code() {
        let error = coerce_for("XYZ", "1|2").unwrap_err();
        assert!(matches!(error, Error::ForbiddenListInList { .. }));
    }

    #[test]
    fn test_theme_is_trimmed_text() {
        assert_eq!(
            coerce_for("THM", " Spring Fest ").unwrap(),
            Value::Str("Spring Fest".to_string())
        );
    }

    #[test]
    fn test_serialized_forms() {
        let value = Value::List(vec![
            Value::Int(3),
            Value::Absent,
            Value::Pair(Some(1), None),
            Value::Bool(true),
            Value::Str("x".to_string()),
        ]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"[3,null,[1,null],true,"x"]"#
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Pair(Some(1), None).to_string(), "1|null");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Absent]).to_string(),
            "1;null"
        );
    }
}
