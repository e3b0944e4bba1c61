//! The TNCPAS-0001 key vocabulary.
//!
//! Every record code resolves through a [`KeyDefinition`]: the semantic field
//! name, the declared value shape, whether the key is mandatory, and whether
//! its list length takes part in the global item count. Callers may extend
//! the vocabulary per parse through [`crate::Options`]; the base table itself
//! is never mutated.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Declared shape of a key's coerced value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// A single integer.
    Int,
    /// A single piece of text.
    Text,
    /// A single integer or text value (identifier keys).
    IntOrText,
    /// One integer per staff slot.
    IntList,
    /// One text value per staff slot.
    TextList,
    /// One boolean per staff slot.
    BoolList,
    /// One integer or `min|max` range per staff slot. The only shape on
    /// which the `|` pair separator is legal.
    LimitList,
    /// Hex color strings.
    ColorList,
    /// One integer or text identifier per staff slot.
    IdList,
}

/// A `KeyDefinition` describes one entry of the key vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeyDefinition {
    /// Resolved field name the coerced value is stored under.
    pub field: String,
    pub shape: ValueShape,
    /// Parsing fails if a required key has no record in the block.
    pub required: bool,
    /// Whether the key's list length must agree with the global item count.
    pub global_item: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl KeyDefinition {
    #[must_use]
    pub fn new(field: impl Into<String>, shape: ValueShape) -> Self {
        Self {
            field: field.into(),
            shape,
            required: false,
            global_item: false,
            description: None,
        }
    }

    #[must_use]
    pub fn with_required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_global_item(mut self) -> Self {
        self.global_item = true;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The base TNCPAS-0001 vocabulary.
pub fn base_definitions() -> Vec<(&'static str, KeyDefinition)> {
    vec![
        (
            "AVA",
            KeyDefinition::new("available", ValueShape::IntList)
                .with_required()
                .with_global_item()
                .with_description(
                    "Total number of cards designed by the contributors/staff in a release",
                ),
        ),
        (
            "CLR",
            KeyDefinition::new("color", ValueShape::ColorList)
                .with_description("Font colors used on a thread in Hex format"),
        ),
        (
            "LIM",
            KeyDefinition::new("limit", ValueShape::LimitList)
                .with_required()
                .with_global_item()
                .with_description(
                    "Maximum number of cards an user can have in a release per contributor/staff",
                ),
        ),
        (
            "MAX",
            KeyDefinition::new("maximum", ValueShape::Int)
                .with_description("Maximum requests to accept in a release"),
        ),
        (
            "SID",
            KeyDefinition::new("staff_id", ValueShape::IdList)
                .with_global_item()
                .with_description("Staff/Contributor ID"),
        ),
        (
            "SLP",
            KeyDefinition::new("is_allow_slip", ValueShape::BoolList)
                .with_global_item()
                .with_description("Whether or not the staff/contributor allows slip"),
        ),
        (
            "STF",
            KeyDefinition::new("staff", ValueShape::TextList)
                .with_required()
                .with_global_item()
                .with_description("Staff/Contributor name"),
        ),
        (
            "TEM",
            KeyDefinition::new("theme_emoji", ValueShape::Text)
                .with_description("Edition title/theme emoji"),
        ),
        (
            "THM",
            KeyDefinition::new("theme", ValueShape::Text)
                .with_required()
                .with_description("Edition title/theme"),
        ),
        (
            "TID",
            KeyDefinition::new("theme_id", ValueShape::IntOrText)
                .with_description("Edition ID"),
        ),
    ]
}

/// A `DefinitionTable` is one parser instance's view of the vocabulary: the
/// base table plus any caller-supplied custom definitions.
///
/// Merging happens on construction and affects this table only. Custom codes
/// are upper-cased so lookup behaves the same as for record codes; a custom
/// code colliding with a base code overrides it and the key's values are
/// routed into the custom bucket.
#[derive(Clone, Debug)]
pub struct DefinitionTable {
    entries: FxHashMap<String, KeyDefinition>,
    custom: FxHashSet<String>,
}

impl Default for DefinitionTable {
    fn default() -> Self {
        Self {
            entries: base_definitions()
                .into_iter()
                .map(|(code, definition)| (code.to_string(), definition))
                .collect(),
            custom: FxHashSet::default(),
        }
    }
}

impl DefinitionTable {
    pub(crate) fn insert_custom(&mut self, code: &str, definition: KeyDefinition) {
        let code = code.to_uppercase();
        self.custom.insert(code.clone());
        self.entries.insert(code, definition);
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&KeyDefinition> {
        self.entries.get(code)
    }

    /// Whether the code was supplied by the caller rather than the base
    /// vocabulary.
    #[must_use]
    pub fn is_custom(&self, code: &str) -> bool {
        self.custom.contains(code)
    }

    /// Resolved field name for a code. Unknown codes resolve to themselves.
    #[must_use]
    pub fn field_name<'table>(&'table self, code: &'table str) -> &'table str {
        self.entries.get(code).map_or(code, |d| d.field.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyDefinition)> {
        self.entries
            .iter()
            .map(|(code, definition)| (code.as_str(), definition))
    }
}
