//! Shaping the validated flat mapping into the final edition record.
//!
//! Staff entries come from a positional zip over the staff-parallel fields.
//! A list-shaped field is read at the entry's index; a scalar applies to
//! every entry. Identifier and color candidates are try-parsed: values that
//! do not match their pattern keep their raw form.

use std::str::FromStr;

use crate::{
    assemble::FlatMetadata,
    color::Color,
    error::Error,
    identifier::{EditionIdentifier, StaffIdentifier},
    model::{EditionMetadata, EditionRef, Limit, StaffEntry, StaffRef},
    value::Value,
};

impl EditionMetadata {
    /// Shape a validated flat mapping into the normalized edition record.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingRequiredKey`] when `theme`, `maximum` or
    /// `staff` is absent from the mapping, [`Error::UnexpectedShape`] when
    /// `maximum` is not an integer, and [`Error::InvalidHexColor`] on a
    /// malformed color entry.
    pub fn from_flat(flat: &FlatMetadata) -> Result<Self, Error> {
        let theme = require(flat, "THM", "theme")?.to_string();
        let maximum = require(flat, "MAX", "maximum")?
            .as_int()
            .ok_or_else(|| Error::UnexpectedShape {
                code: "MAX".to_string(),
                field: "maximum".to_string(),
                expected: "an integer",
            })?;

        let staff = require(flat, "STF", "staff")?;
        let staff_items: Vec<&Value> = match staff {
            Value::List(items) => items.iter().collect(),
            scalar => vec![scalar],
        };
        let count = staff_items.iter().filter(|v| !v.is_absent()).count();

        let available = flat.get("available");
        let limit = flat.get("limit");
        let staff_id = flat.get("staff_id");
        let allow_slip = flat.get("is_allow_slip");

        let mut staffs = Vec::with_capacity(count);
        for index in 0..count {
            let nickname = match staff_items.get(index) {
                Some(Value::Absent) | None => String::new(),
                Some(value) => value.to_string(),
            };
            staffs.push(StaffEntry {
                nickname,
                available: resolve(available, index).and_then(Value::as_int),
                limit: resolve(limit, index).and_then(limit_entry),
                identifier: resolve(staff_id, index).and_then(staff_ref),
                is_allow_slip: resolve(allow_slip, index)
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
            });
        }

        Ok(Self {
            theme,
            maximum,
            staffs,
            theme_id: flat.get("theme_id").and_then(edition_ref),
            theme_emoji: flat.get("theme_emoji").and_then(|value| match value {
                Value::Absent => None,
                value => Some(value.to_string()),
            }),
            colors: resolve_colors(flat.get("color"))?,
            custom: if flat.custom_fields().is_empty() {
                None
            } else {
                Some(flat.custom_fields().clone())
            },
        })
    }
}

fn require<'flat>(flat: &'flat FlatMetadata, code: &str, field: &str) -> Result<&'flat Value, Error> {
    flat.get(field).ok_or_else(|| Error::MissingRequiredKey {
        code: code.to_string(),
        field: field.to_string(),
    })
}

// A list-shaped field is read per index; a scalar applies to every slot.
fn resolve<'flat>(value: Option<&'flat Value>, index: usize) -> Option<&'flat Value> {
    match value {
        Some(Value::List(items)) => items.get(index),
        Some(scalar) => Some(scalar),
        None => None,
    }
}

fn limit_entry(value: &Value) -> Option<Limit> {
    match value {
        Value::Int(number) => Some(Limit::Flat(*number)),
        Value::Pair(min, max) => Some(Limit::Range(*min, *max)),
        Value::Absent | Value::Bool(_) | Value::Str(_) | Value::List(_) => None,
    }
}

fn staff_ref(value: &Value) -> Option<StaffRef> {
    match value {
        Value::Absent => None,
        Value::Int(number) => Some(StaffRef::Number(*number)),
        Value::Str(text) => Some(match StaffIdentifier::from_str(text) {
            Ok(identifier) => StaffRef::Parsed(identifier),
            Err(_) => StaffRef::Text(text.clone()),
        }),
        other => Some(StaffRef::Text(other.to_string())),
    }
}

fn edition_ref(value: &Value) -> Option<EditionRef> {
    match value {
        Value::Absent => None,
        Value::Int(number) => Some(EditionRef::Number(*number)),
        Value::Str(text) => Some(match EditionIdentifier::from_str(text) {
            Ok(identifier) => EditionRef::Parsed(identifier),
            Err(_) => EditionRef::Text(text.clone()),
        }),
        other => Some(EditionRef::Text(other.to_string())),
    }
}

fn resolve_colors(value: Option<&Value>) -> Result<Option<Vec<Color>>, Error> {
    let Some(value) = value else {
        return Ok(None);
    };
    let entries: Vec<&Value> = match value {
        Value::List(items) => items.iter().collect(),
        scalar => vec![scalar],
    };
    let mut colors = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::Absent => {}
            Value::Str(hex) => colors.push(Color::new(hex.clone())?),
            other => return Err(Error::InvalidHexColor(other.to_string())),
        }
    }
    Ok(if colors.is_empty() { None } else { Some(colors) })
}
