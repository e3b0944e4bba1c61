use rustc_hash::FxHashMap;
use serde::{
    ser::{SerializeMap, Serializer},
    Serialize,
};

use crate::{
    definition::DefinitionTable,
    error::Error,
    value::{coerce, Value},
};

/// The validated flat mapping: resolved field name to coerced value, with
/// caller-defined keys kept apart in the custom bucket.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatMetadata {
    fields: FxHashMap<String, Value>,
    custom: FxHashMap<String, Value>,
}

impl Serialize for FlatMetadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = self.fields.len() + usize::from(!self.custom.is_empty());
        let mut state = serializer.serialize_map(Some(len))?;
        for (field, value) in &self.fields {
            state.serialize_entry(field, value)?;
        }
        // an empty custom bucket is dropped from the output
        if !self.custom.is_empty() {
            state.serialize_entry("custom", &self.custom)?;
        }
        state.end()
    }
}

impl FlatMetadata {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn custom(&self, field: &str) -> Option<&Value> {
        self.custom.get(field)
    }

    #[must_use]
    pub fn custom_fields(&self) -> &FxHashMap<String, Value> {
        &self.custom
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.custom.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    /// Insert a top-level field. Useful for callers assembling a mapping by
    /// hand before [`crate::EditionMetadata::from_flat`].
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Insert a field into the custom bucket.
    pub fn insert_custom(&mut self, field: impl Into<String>, value: Value) {
        self.custom.insert(field.into(), value);
    }
}

/// Walk the extracted record lines into a validated [`FlatMetadata`].
pub(crate) fn assemble(lines: &[String], table: &DefinitionTable) -> Result<FlatMetadata, Error> {
    let mut flat = FlatMetadata::default();
    let mut expected_items: Option<usize> = None;

    for line in lines {
        let record = line.strip_prefix(">>>").unwrap_or(line);
        let Some((code, raw)) = record.split_once(">>") else {
            return Err(Error::MalformedRecord(record.to_string()));
        };
        let code = code.to_uppercase();
        let definition = table.get(&code);
        if definition.is_none() {
            tracing::warn!(%code, "unknown key code in metadata block");
        }
        let field = table.field_name(&code).to_string();
        let value = coerce(definition, &code, &field, raw)?;

        if definition.is_some_and(|d| d.global_item) {
            if let Some(items) = value.as_list() {
                match expected_items {
                    None => expected_items = Some(items.len()),
                    Some(expected) if expected != items.len() => {
                        return Err(Error::ItemExceedsGlobalLimit {
                            code,
                            field,
                            expected,
                            actual: items.len(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        if table.is_custom(&code) {
            flat.custom.insert(field, value);
        } else {
            flat.fields.insert(field, value);
        }
    }

    for (code, definition) in table.iter() {
        if !definition.required {
            continue;
        }
        let bucket = if table.is_custom(code) {
            &flat.custom
        } else {
            &flat.fields
        };
        if !bucket.contains_key(&definition.field) {
            return Err(Error::MissingRequiredKey {
                code: code.to_string(),
                field: definition.field.clone(),
            });
        }
    }

    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{KeyDefinition, ValueShape};
    use pretty_assertions::assert_eq;

    fn lines(records: &[&str]) -> Vec<String> {
        records.iter().map(ToString::to_string).collect()
    }

    fn full_block() -> Vec<String> {
        lines(&[
            ">>>THM>>Spring Fest",
            ">>>MAX>>10",
            ">>>STF>>Alice;Bob",
            ">>>AVA>>3;2",
            ">>>LIM>>1;1",
        ])
    }

    #[test]
    fn test_assembles_flat_mapping() {
        let table = DefinitionTable::default();
        let flat = assemble(&full_block(), &table).unwrap();
        assert_eq!(flat.get("theme"), Some(&Value::Str("Spring Fest".to_string())));
        assert_eq!(flat.get("maximum"), Some(&Value::Int(10)));
        assert_eq!(
            flat.get("staff"),
            Some(&Value::List(vec![
                Value::Str("Alice".to_string()),
                Value::Str("Bob".to_string()),
            ]))
        );
        assert!(flat.custom_fields().is_empty());
    }

    #[test]
    fn test_codes_are_case_insensitive() {
        let table = DefinitionTable::default();
        let mut records = full_block();
        records[0] = ">>>thm>>Spring Fest".to_string();
        let flat = assemble(&records, &table).unwrap();
        assert_eq!(flat.get("theme"), Some(&Value::Str("Spring Fest".to_string())));
    }

    #[test]
    fn test_unknown_code_resolves_to_itself() {
        let table = DefinitionTable::default();
        let mut records = full_block();
        records.push(">>>XYZ>>mystery".to_string());
        let flat = assemble(&records, &table).unwrap();
        assert_eq!(flat.get("XYZ"), Some(&Value::Str("mystery".to_string())));
    }

    #[test]
    fn test_leading_separator_is_optional() {
        let table = DefinitionTable::default();
        let records = lines(&[
            "THM>>Spring Fest",
            "STF>>Alice;Bob",
            "AVA>>3;2",
            "LIM>>1;1",
        ]);
        let flat = assemble(&records, &table).unwrap();
        assert_eq!(flat.get("theme"), Some(&Value::Str("Spring Fest".to_string())));
    }

    #[test]
    fn test_value_may_contain_separator_token() {
        let table = DefinitionTable::default();
        let mut records = full_block();
        records[0] = ">>>THM>>Fest >> More Fest".to_string();
        let flat = assemble(&records, &table).unwrap();
        assert_eq!(
            flat.get("theme"),
            Some(&Value::Str("Fest >> More Fest".to_string()))
        );
    }

    #[test]
    fn test_global_item_count_mismatch() {
        let table = DefinitionTable::default();
        let mut records = full_block();
        records[3] = ">>>AVA>>3;2;1".to_string();
        let error = assemble(&records, &table).unwrap_err();
        assert_eq!(
            error,
            Error::ItemExceedsGlobalLimit {
                code: "AVA".to_string(),
                field: "available".to_string(),
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_non_global_lists_are_not_counted() {
        let table = DefinitionTable::default();
        let mut records = full_block();
        records.push(">>>CLR>>#336699;#ffcc00;#000000".to_string());
        assert!(assemble(&records, &table).is_ok());
    }

    #[test]
    fn test_bare_pair_does_not_set_global_count() {
        let table = DefinitionTable::default();
        let records = lines(&[
            ">>>THM>>Fest",
            ">>>LIM>>1|2",
            ">>>STF>>Alice;Bob;Carol",
            ">>>AVA>>3;2;1",
        ]);
        assert!(assemble(&records, &table).is_ok());
    }

    #[test]
    fn test_missing_required_key() {
        let table = DefinitionTable::default();
        let records = lines(&[">>>THM>>Fest", ">>>STF>>Alice;Bob", ">>>AVA>>3;2"]);
        let error = assemble(&records, &table).unwrap_err();
        assert_eq!(
            error,
            Error::MissingRequiredKey {
                code: "LIM".to_string(),
                field: "limit".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_record_line() {
        let table = DefinitionTable::default();
        let records = lines(&["THM-Spring Fest"]);
        assert_eq!(
            assemble(&records, &table).unwrap_err(),
            Error::MalformedRecord("THM-Spring Fest".to_string())
        );
    }

    #[test]
    fn test_custom_codes_route_to_custom_bucket() {
        let mut table = DefinitionTable::default();
        table.insert_custom("TWT", KeyDefinition::new("twitter", ValueShape::Text));
        let mut records = full_block();
        records.push(">>>TWT>>@spring_fest".to_string());
        let flat = assemble(&records, &table).unwrap();
        assert_eq!(
            flat.custom("twitter"),
            Some(&Value::Str("@spring_fest".to_string()))
        );
        assert_eq!(flat.get("twitter"), None);
    }

    #[test]
    fn test_required_custom_key_is_checked_in_bucket() {
        let mut table = DefinitionTable::default();
        table.insert_custom(
            "TWT",
            KeyDefinition::new("twitter", ValueShape::Text).with_required(),
        );
        let error = assemble(&full_block(), &table).unwrap_err();
        assert_eq!(
            error,
            Error::MissingRequiredKey {
                code: "TWT".to_string(),
                field: "twitter".to_string(),
            }
        );
        let mut records = full_block();
        records.push(">>>TWT>>@spring_fest".to_string());
        assert!(assemble(&records, &table).is_ok());
    }

    #[test]
    fn test_serialization_drops_empty_custom_bucket() {
        let table = DefinitionTable::default();
        let flat = assemble(&full_block(), &table).unwrap();
        let json = serde_json::to_value(&flat).unwrap();
        assert!(json.get("custom").is_none());
    }

    #[test]
    fn test_serialization_keeps_populated_custom_bucket() {
        let mut table = DefinitionTable::default();
        table.insert_custom("TWT", KeyDefinition::new("twitter", ValueShape::Text));
        let mut records = full_block();
        records.push(">>>TWT>>@spring_fest".to_string());
        let flat = assemble(&records, &table).unwrap();
        let json = serde_json::to_value(&flat).unwrap();
        assert_eq!(
            json.get("custom").and_then(|c| c.get("twitter")),
            Some(&serde_json::json!("@spring_fest"))
        );
    }
}
