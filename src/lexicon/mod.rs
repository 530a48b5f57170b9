/*!
 * Reference lexicon for emergency-notice translation.
 *
 * The lexicon holds three read-only tables loaded from a JSON data asset:
 * - `terminology`: source term to non-empty ordered list of renderings
 * - `ambiguous`: source term to `{ contexts, translations: context -> renderings }`
 * - `cultural`: source term to `{ explanation, translations: language -> rendering }`
 *
 * Asset key order is preserved; it defines the iteration order used for
 * warnings and suggestions.
 */

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::errors::LexiconLoadError;

pub mod entries;
pub mod store;

pub use entries::{AmbiguousEntry, CulturalEntry, LexiconEntry, TermCategory, TerminologyEntry};
pub use store::{LexiconSource, LexiconStore};

/// The built-in reference asset
pub const BUILTIN_LEXICON: &str = include_str!("../../data/lexicon.json");

/// Immutable snapshot of all reference tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    /// Disaster terminology, in asset order
    pub terminology: Vec<TerminologyEntry>,
    /// Ambiguous terms, in asset order
    pub ambiguous: Vec<AmbiguousEntry>,
    /// Cultural-context terms, in asset order
    pub cultural: Vec<CulturalEntry>,
}

#[derive(Debug, Deserialize)]
struct LexiconDocument {
    #[serde(default, deserialize_with = "ordered_map")]
    terminology: Vec<(String, Vec<String>)>,
    #[serde(default, deserialize_with = "ordered_map")]
    ambiguous: Vec<(String, AmbiguousSpec)>,
    #[serde(default, deserialize_with = "ordered_map")]
    cultural: Vec<(String, CulturalSpec)>,
}

#[derive(Debug, Deserialize)]
struct AmbiguousSpec {
    contexts: Vec<String>,
    #[serde(default)]
    translations: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CulturalSpec {
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    translations: HashMap<String, String>,
}

/// Deserialize a JSON object into key/value pairs, keeping document order
fn ordered_map<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OrderedMapVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an object keyed by source term")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
}

impl Lexicon {
    /// Parse and validate a lexicon document
    pub fn from_json_str(json: &str) -> Result<Self, LexiconLoadError> {
        let document: LexiconDocument = serde_json::from_str(json)?;

        let lexicon = Self {
            terminology: document
                .terminology
                .into_iter()
                .map(|(term, renderings)| TerminologyEntry::new(term, renderings))
                .collect(),
            ambiguous: document
                .ambiguous
                .into_iter()
                .map(|(term, spec)| AmbiguousEntry::new(term, spec.contexts, spec.translations))
                .collect(),
            cultural: document
                .cultural
                .into_iter()
                .map(|(term, spec)| CulturalEntry::new(term, spec.explanation, spec.translations))
                .collect(),
        };

        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Read, parse and validate a lexicon file
    pub fn from_path(path: &Path) -> Result<Self, LexiconLoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| LexiconLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The built-in reference lexicon
    pub fn builtin() -> Result<Self, LexiconLoadError> {
        Self::from_json_str(BUILTIN_LEXICON)
    }

    /// Check every entry invariant
    pub fn validate(&self) -> Result<(), LexiconLoadError> {
        self.terminology.iter().try_for_each(|e| e.validate())?;
        self.ambiguous.iter().try_for_each(|e| e.validate())?;
        self.cultural.iter().try_for_each(|e| e.validate())?;
        Ok(())
    }

    /// Look up a terminology entry by source term
    pub fn terminology_entry(&self, term: &str) -> Option<&TerminologyEntry> {
        self.terminology.iter().find(|e| e.source_term == term)
    }

    /// Look up an ambiguous entry by source term
    pub fn ambiguous_entry(&self, term: &str) -> Option<&AmbiguousEntry> {
        self.ambiguous.iter().find(|e| e.source_term == term)
    }

    /// Look up a cultural-context entry by source term
    pub fn cultural_entry(&self, term: &str) -> Option<&CulturalEntry> {
        self.cultural.iter().find(|e| e.source_term == term)
    }

    /// Terminology source terms in asset order
    pub fn terminology_terms(&self) -> impl Iterator<Item = &str> {
        self.terminology.iter().map(|e| e.source_term.as_str())
    }

    /// Total number of entries across all tables
    pub fn len(&self) -> usize {
        self.terminology.len() + self.ambiguous.len() + self.cultural.len()
    }

    /// Check if the lexicon has no entries at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry matching `text`, as trait objects, terminology first
    pub fn entries_in<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a dyn LexiconEntry> + 'a {
        let terminology = self.terminology.iter().map(|e| e as &dyn LexiconEntry);
        let ambiguous = self.ambiguous.iter().map(|e| e as &dyn LexiconEntry);
        let cultural = self.cultural.iter().map(|e| e as &dyn LexiconEntry);
        terminology
            .chain(ambiguous)
            .chain(cultural)
            .filter(move |entry| entry.occurs_in(text))
    }

    /// One-line description of the table sizes
    pub fn summary(&self) -> String {
        format!(
            "{} terminology, {} ambiguous, {} cultural-context entries",
            self.terminology.len(),
            self.ambiguous.len(),
            self.cultural.len()
        )
    }
}
