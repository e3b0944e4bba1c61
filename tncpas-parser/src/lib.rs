//! TNCPAS-0001 compliance metadata parser.
//!
//! Card release posts embed a tagged metadata block describing the edition
//! and its staff roster:
//!
//! ```text
//! ###METADATA
//! >>>THM>>Spring Fest
//! >>>MAX>>10
//! >>>STF>>Alice;Bob
//! >>>AVA>>3;2
//! >>>LIM>>1;1
//! ###
//! ```
//!
//! [`parse`] finds the first block in a string, coerces and validates every
//! record, and returns a normalized [`EditionMetadata`]. The intermediate
//! stages are public as well: [`MetadataParser::raw_records`] for the
//! extracted record lines and [`MetadataParser::flat`] for the validated
//! flat mapping.
//!
//! The key vocabulary is extensible per parse:
//!
//! ```
//! use tncpas_parser::{KeyDefinition, Options, ValueShape};
//!
//! let options = Options::builder()
//!     .with_definition("TWT", KeyDefinition::new("twitter", ValueShape::Text))
//!     .build();
//! let input = "###METADATA\n>>>THM>>Fest\n>>>STF>>Alice\n>>>AVA>>3\n>>>LIM>>1\n>>>MAX>>10\n>>>TWT>>@fest\n###";
//! let metadata = tncpas_parser::parse_with_options(input, &options)?;
//! assert!(metadata.custom.is_some());
//! # Ok::<(), tncpas_parser::Error>(())
//! ```

mod assemble;
mod block;
mod color;
mod definition;
mod error;
mod format;
mod identifier;
mod model;
mod options;
mod value;

pub use assemble::FlatMetadata;
pub use color::Color;
pub use definition::{base_definitions, DefinitionTable, KeyDefinition, ValueShape};
pub use error::Error;
pub use identifier::{EditionIdentifier, StaffIdentifier};
pub use model::{EditionMetadata, EditionRef, Limit, StaffEntry, StaffRef};
pub use options::{Options, OptionsBuilder};
pub use value::Value;

/// Parser for one input string.
///
/// Each instance owns its merged definition table: custom definitions given
/// through [`Options`] never touch the base vocabulary or other instances,
/// so concurrent parses on independent inputs need no synchronization.
#[derive(Debug)]
pub struct MetadataParser<'input> {
    input: &'input str,
    table: DefinitionTable,
}

impl<'input> MetadataParser<'input> {
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            table: DefinitionTable::default(),
        }
    }

    #[must_use]
    pub fn with_options(input: &'input str, options: &Options) -> Self {
        let mut table = DefinitionTable::default();
        for (code, definition) in &options.definitions {
            table.insert_custom(code, definition.clone());
        }
        Self { input, table }
    }

    /// This parser's view of the key vocabulary.
    #[must_use]
    pub fn definitions(&self) -> &DefinitionTable {
        &self.table
    }

    /// The trimmed record lines of the first metadata block.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoMetadataBlockFound`] when the input has no
    /// block marker.
    pub fn raw_records(&self) -> Result<Vec<String>, Error> {
        block::extract(self.input)
    }

    /// Extract and validate the block into the flat field mapping.
    ///
    /// # Errors
    ///
    /// Any of the parse errors: [`Error::NoMetadataBlockFound`],
    /// [`Error::MalformedRecord`], [`Error::ForbiddenListInList`],
    /// [`Error::ItemExceedsGlobalLimit`], [`Error::MissingRequiredKey`].
    #[tracing::instrument(skip(self))]
    pub fn flat(&self) -> Result<FlatMetadata, Error> {
        let records = block::extract(self.input)?;
        assemble::assemble(&records, &self.table)
    }

    /// The whole pipeline: extract, coerce, validate, and shape into the
    /// final edition record.
    ///
    /// # Errors
    ///
    /// See [`MetadataParser::flat`] and [`EditionMetadata::from_flat`].
    #[tracing::instrument(skip(self))]
    pub fn parse(&self) -> Result<EditionMetadata, Error> {
        let flat = self.flat()?;
        EditionMetadata::from_flat(&flat)
    }
}

/// Parse the first metadata block of `input` with the base key vocabulary.
///
/// # Errors
///
/// See [`MetadataParser::parse`].
pub fn parse(input: &str) -> Result<EditionMetadata, Error> {
    MetadataParser::new(input).parse()
}

/// Parse with caller-supplied custom key definitions merged in.
///
/// # Errors
///
/// See [`MetadataParser::parse`].
pub fn parse_with_options(input: &str, options: &Options) -> Result<EditionMetadata, Error> {
    MetadataParser::with_options(input, options).parse()
}
