use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    color::Color,
    identifier::{EditionIdentifier, StaffIdentifier},
    value::Value,
};

/// Per-user card limit for one staff slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Limit {
    Flat(i64),
    /// A `min|max` range; a non-numeric end is `None`.
    Range(Option<i64>, Option<i64>),
}

/// A staff identifier as found in the post: the structured TNCPAS form when
/// it matches, otherwise the raw value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StaffRef {
    Parsed(StaffIdentifier),
    Number(i64),
    Text(String),
}

/// An edition identifier as found in the post.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EditionRef {
    Parsed(EditionIdentifier),
    Number(i64),
    Text(String),
}

/// Information about one staff/contributor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StaffEntry {
    /// Nickname of the staff/contributor.
    pub nickname: String,
    /// Total cards available to choose.
    pub available: Option<i64>,
    /// Limit of cards for each user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    /// Staff/contributor identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<StaffRef>,
    /// Whether the staff/contributor allows slip use.
    pub is_allow_slip: bool,
}

/// Metadata of the edition. Terminal output of a parse, never mutated
/// afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditionMetadata {
    /// Edition title/theme.
    pub theme: String,
    /// Maximum requests per edition.
    pub maximum: i64,
    /// Participating staff/contributors, in post order.
    pub staffs: Vec<StaffEntry>,
    /// Edition ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<EditionRef>,
    /// Edition title/theme emoji.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_emoji: Option<String>,
    /// Font colors used on the thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<Color>>,
    /// Caller-defined fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<FxHashMap<String, Value>>,
}
