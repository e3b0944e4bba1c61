#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no metadata block found in input")]
    NoMetadataBlockFound,

    #[error("invalid value \"{value}\" found in metadata on key \"{field}\" ({code})")]
    ForbiddenListInList {
        code: String,
        field: String,
        value: String,
    },

    #[error(
        "invalid number of items found in metadata on key \"{field}\" ({code}): expected {expected}, got {actual}"
    )]
    ItemExceedsGlobalLimit {
        code: String,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("required key \"{field}\" ({code}) can not be found in metadata")]
    MissingRequiredKey { code: String, field: String },

    #[error("malformed record line \"{0}\": missing the \">>\" separator")]
    MalformedRecord(String),

    #[error("unexpected value shape on key \"{field}\" ({code}): expected {expected}")]
    UnexpectedShape {
        code: String,
        field: String,
        expected: &'static str,
    },

    #[error("invalid hex color \"{0}\"")]
    InvalidHexColor(String),

    #[error("invalid staff identifier \"{0}\"")]
    InvalidStaffIdentifier(String),

    #[error("invalid edition identifier \"{0}\"")]
    InvalidEditionIdentifier(String),
}

impl Error {
    /// Get advice for this error if available.
    /// Returns helpful information for resolving the error.
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::NoMetadataBlockFound => {
                Some("A metadata block starts at a '###METADATA' marker and runs until the next '###'")
            }
            Self::ForbiddenListInList { .. } => {
                Some("A 'min|max' pair is only valid on the limit key (LIM)")
            }
            Self::ItemExceedsGlobalLimit { .. } => Some(
                "Every ';'-separated list on a per-staff key must have one entry per staff slot",
            ),
            Self::MissingRequiredKey { .. } => {
                Some("Theme (THM), staff (STF), available (AVA) and limit (LIM) records are mandatory")
            }
            Self::MalformedRecord(_) => {
                Some("Records have the shape '>>>CODE>>value', one per logical line")
            }
            Self::InvalidHexColor(_) => Some("Colors use the 7-character '#RRGGBB' form"),
            Self::UnexpectedShape { .. }
            | Self::InvalidStaffIdentifier(_)
            | Self::InvalidEditionIdentifier(_) => None,
        }
    }
}
