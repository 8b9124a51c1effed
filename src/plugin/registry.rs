//! The plugin registry: one parser and one generator slot per language.
//!
//! The registry is an explicit, constructed object owned by the embedding
//! application and passed by reference to the translation engine. Plugin
//! composition is expected to happen at startup; after that the registry
//! is read-only and safe to share across concurrent translations. Mutation
//! (`register_*`, `clear`) must be serialized externally relative to
//! lookups - the registry does no internal locking.

use std::sync::Arc;

use crate::error::PanconfigError;

use super::{Generator, Parser};

/// Holds the registered parser and generator plugins, keyed by
/// case-normalized language name.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    parsers: Vec<(String, Arc<dyn Parser>)>,
    generators: Vec<(String, Arc<dyn Generator>)>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parser for its language.
    ///
    /// The most recently registered parser for a language wins; the
    /// replaced plugin (if any) is returned so the caller can observe the
    /// overwrite. A failed validation leaves the registry unchanged.
    ///
    /// # Errors
    /// Returns [`PanconfigError::InvalidParser`] if the language name is
    /// empty or the extension set is empty or contains an empty entry.
    pub fn register_parser(
        &mut self,
        parser: Arc<dyn Parser>,
    ) -> Result<Option<Arc<dyn Parser>>, PanconfigError> {
        let language = parser.language_name().trim().to_string();
        if language.is_empty() {
            return Err(PanconfigError::InvalidParser {
                language,
                reason: "language name must be a non-empty string".to_string(),
            });
        }

        let extensions = parser.file_extensions();
        if extensions.is_empty() {
            return Err(PanconfigError::InvalidParser {
                language,
                reason: "at least one file extension is required".to_string(),
            });
        }
        if extensions.iter().any(|ext| ext.is_empty()) {
            return Err(PanconfigError::InvalidParser {
                language,
                reason: "file extensions must be non-empty".to_string(),
            });
        }

        let slot = self
            .parsers
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&language));

        Ok(match slot {
            Some((name, existing)) => {
                *name = language;
                Some(std::mem::replace(existing, parser))
            }
            None => {
                self.parsers.push((language, parser));
                None
            }
        })
    }

    /// Registers a generator for its language.
    ///
    /// Same replacement and validation rules as [`register_parser`].
    ///
    /// # Errors
    /// Returns [`PanconfigError::InvalidGenerator`] if the language name
    /// or output extension is empty.
    ///
    /// [`register_parser`]: PluginRegistry::register_parser
    pub fn register_generator(
        &mut self,
        generator: Arc<dyn Generator>,
    ) -> Result<Option<Arc<dyn Generator>>, PanconfigError> {
        let language = generator.language_name().trim().to_string();
        if language.is_empty() {
            return Err(PanconfigError::InvalidGenerator {
                language,
                reason: "language name must be a non-empty string".to_string(),
            });
        }

        if generator.file_extension().is_empty() {
            return Err(PanconfigError::InvalidGenerator {
                language,
                reason: "the output file extension must be non-empty".to_string(),
            });
        }

        let slot = self
            .generators
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&language));

        Ok(match slot {
            Some((name, existing)) => {
                *name = language;
                Some(std::mem::replace(existing, generator))
            }
            None => {
                self.generators.push((language, generator));
                None
            }
        })
    }

    /// Looks up a parser by language name, case-insensitively.
    pub fn parser(&self, language: &str) -> Option<Arc<dyn Parser>> {
        self.parsers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(language))
            .map(|(_, parser)| Arc::clone(parser))
    }

    /// Looks up a generator by language name, case-insensitively.
    pub fn generator(&self, language: &str) -> Option<Arc<dyn Generator>> {
        self.generators
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(language))
            .map(|(_, generator)| Arc::clone(generator))
    }

    /// Returns true if a parser is registered for the language.
    pub fn has_parser(&self, language: &str) -> bool {
        self.parser(language).is_some()
    }

    /// Returns true if a generator is registered for the language.
    pub fn has_generator(&self, language: &str) -> bool {
        self.generator(language).is_some()
    }

    /// Parser language names, in registration order.
    pub fn parser_languages(&self) -> Vec<&str> {
        self.parsers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Generator language names, in registration order.
    pub fn generator_languages(&self) -> Vec<&str> {
        self.generators
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Empties both plugin slots. Used for test isolation.
    pub fn clear(&mut self) {
        self.parsers.clear();
        self.generators.clear();
    }
}
