//! Main data generator for producing document batches.

use crate::generators::{generate_fields, KeyStyle};
use datagen_core::{CollectionConfig, FieldConfig, GeneratedDocument, GeneratorConfig};
use datagen_pipeline::BatchGenerator;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Timestamp bound that is neither RFC 3339 nor YYYY-MM-DD
    #[error("invalid timestamp '{0}', expected RFC 3339 or YYYY-MM-DD")]
    InvalidTimestamp(String),

    /// Two sibling fields collapse to the same short name
    #[error("fields '{first}' and '{second}' both shorten to '{short}'")]
    DuplicateShortName {
        first: String,
        second: String,
        short: String,
    },
}

/// Data generator that produces documents for one collection.
///
/// The generator holds no randomness of its own: the caller threads a
/// random source through every call, so the same seed and config always
/// yield the same documents.
#[derive(Debug, Clone)]
pub struct DataGenerator {
    /// Field definitions, in document order
    fields: Vec<FieldConfig>,
    /// How keys are written
    keys: KeyStyle,
    /// Index of the next document
    index: u64,
}

impl DataGenerator {
    /// Create a generator for the given field list.
    pub fn new(fields: Vec<FieldConfig>) -> Self {
        Self {
            fields,
            keys: KeyStyle::Full,
            index: 0,
        }
    }

    /// Create a generator for a collection config.
    pub fn for_collection(collection: &CollectionConfig) -> Self {
        Self::new(collection.fields.clone())
    }

    /// Reduce every key to its first two characters.
    ///
    /// Fails when two fields at the same nesting level would end up with the
    /// same key.
    pub fn with_short_names(mut self, short: bool) -> Result<Self, GeneratorError> {
        if short {
            check_short_names(&self.fields)?;
            self.keys = KeyStyle::Short;
        } else {
            self.keys = KeyStyle::Full;
        }
        Ok(self)
    }

    /// Set the starting index for generation.
    pub fn with_start_index(mut self, index: u64) -> Self {
        self.index = index;
        self
    }

    /// Get the index of the next document.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Generate the next document.
    pub fn next_document<R: Rng>(&mut self, rng: &mut R) -> Result<GeneratedDocument, GeneratorError> {
        let index = self.index;
        let fields = generate_fields(&self.fields, rng, index, &self.keys)?;
        self.index += 1;
        Ok(GeneratedDocument::new(index, fields))
    }

    /// Generate `count` documents.
    pub fn documents<R: Rng>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<GeneratedDocument>, GeneratorError> {
        (0..count).map(|_| self.next_document(rng)).collect()
    }
}

impl BatchGenerator for DataGenerator {
    type Record = GeneratedDocument;
    type Source = StdRng;
    type Error = GeneratorError;

    fn generate(
        &mut self,
        size: usize,
        source: &mut StdRng,
    ) -> Result<Vec<GeneratedDocument>, GeneratorError> {
        self.documents(size, source)
    }
}

fn check_short_names(fields: &[FieldConfig]) -> Result<(), GeneratorError> {
    let mut seen: Vec<(&str, String)> = Vec::with_capacity(fields.len());
    let mut shorts = HashSet::new();

    for field in fields {
        let short = KeyStyle::Short.key(&field.name);
        if !shorts.insert(short.clone()) {
            let first = seen
                .iter()
                .find(|(_, s)| *s == short)
                .map(|(name, _)| name.to_string())
                .unwrap_or_default();
            return Err(GeneratorError::DuplicateShortName {
                first,
                second: field.name.clone(),
                short,
            });
        }
        seen.push((&field.name, short));

        if let GeneratorConfig::Object { fields } = &field.generator {
            check_short_names(fields)?;
        }
    }
    Ok(())
}
