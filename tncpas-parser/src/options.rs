use crate::definition::KeyDefinition;

/// Per-parse configuration.
///
/// The only knob today is the custom key vocabulary: extra `code -> definition`
/// entries merged into the parser's own definition table (never into the base
/// table). Values of custom keys land in the output's `custom` bucket.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct Options {
    pub definitions: Vec<(String, KeyDefinition)>,
}

impl Options {
    /// Create a new `OptionsBuilder` for fluent configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use tncpas_parser::{KeyDefinition, Options, ValueShape};
    ///
    /// let options = Options::builder()
    ///     .with_definition("TWT", KeyDefinition::new("twitter", ValueShape::Text))
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Create a new `Options` with default settings.
    ///
    /// Equivalent to `Options::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builder for `Options`.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct OptionsBuilder {
    definitions: Vec<(String, KeyDefinition)>,
}

impl OptionsBuilder {
    /// Register a custom key definition for this parse.
    #[must_use]
    pub fn with_definition(mut self, code: impl Into<String>, definition: KeyDefinition) -> Self {
        self.definitions.push((code.into(), definition));
        self
    }

    #[must_use]
    pub fn build(self) -> Options {
        Options {
            definitions: self.definitions,
        }
    }
}
