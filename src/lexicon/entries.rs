/*!
 * Lexicon entry types.
 *
 * Three kinds of reference entries resolve a source term to target-language
 * renderings:
 * - `TerminologyEntry`: a disaster term with canonical renderings
 * - `AmbiguousEntry`: a term with several senses, rendered per context
 * - `CulturalEntry`: a term whose rendering depends on the target locale
 */

use std::collections::HashMap;

use crate::errors::LexiconLoadError;

/// Category of a lexicon entry, used in warnings and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermCategory {
    /// Disaster terminology
    Terminology,
    /// Term with several senses
    Ambiguous,
    /// Locale-specific convention
    Cultural,
}

impl TermCategory {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Terminology => "terminology",
            Self::Ambiguous => "ambiguous term",
            Self::Cultural => "cultural-context term",
        }
    }
}

impl std::fmt::Display for TermCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Common capability of all lexicon entries: resolving a source term to
/// renderings in a target language.
pub trait LexiconEntry {
    /// The source-language term this entry describes
    fn source_term(&self) -> &str;

    /// The entry category
    fn category(&self) -> TermCategory;

    /// Accepted renderings for a target language and optional sense.
    ///
    /// Returns an empty list when the entry has nothing for that target.
    fn renderings(&self, target_language: &str, context: Option<&str>) -> Vec<&str>;

    /// Check the entry invariants
    fn validate(&self) -> Result<(), LexiconLoadError>;

    /// Whether the source term occurs in `text`
    fn occurs_in(&self, text: &str) -> bool {
        !self.source_term().is_empty() && text.contains(self.source_term())
    }
}

fn invalid(term: &str, reason: impl Into<String>) -> LexiconLoadError {
    LexiconLoadError::Invalid {
        term: term.to_string(),
        reason: reason.into(),
    }
}

fn check_source_term(term: &str) -> Result<(), LexiconLoadError> {
    if term.trim().is_empty() {
        return Err(invalid(term, "source term must not be empty"));
    }
    Ok(())
}

/// A domain term with one or more canonical renderings
#[derive(Debug, Clone, PartialEq)]
pub struct TerminologyEntry {
    /// Source term
    pub source_term: String,
    /// Accepted renderings, preferred rendering first
    pub canonical_renderings: Vec<String>,
}

impl TerminologyEntry {
    /// Create a new terminology entry
    pub fn new(source_term: impl Into<String>, canonical_renderings: Vec<String>) -> Self {
        Self {
            source_term: source_term.into(),
            canonical_renderings,
        }
    }

    /// The rendering suggested to translators
    pub fn preferred_rendering(&self) -> Option<&str> {
        self.canonical_renderings.first().map(String::as_str)
    }

    /// Whether `translated` contains at least one canonical rendering
    pub fn is_rendered_in(&self, translated: &str) -> bool {
        let lowered = translated.to_lowercase();
        self.canonical_renderings
            .iter()
            .any(|rendering| lowered.contains(&rendering.to_lowercase()))
    }
}

impl LexiconEntry for TerminologyEntry {
    fn source_term(&self) -> &str {
        &self.source_term
    }

    fn category(&self) -> TermCategory {
        TermCategory::Terminology
    }

    fn renderings(&self, _target_language: &str, _context: Option<&str>) -> Vec<&str> {
        self.canonical_renderings.iter().map(String::as_str).collect()
    }

    fn validate(&self) -> Result<(), LexiconLoadError> {
        check_source_term(&self.source_term)?;
        if self.canonical_renderings.is_empty() {
            return Err(invalid(&self.source_term, "at least one canonical rendering is required"));
        }
        if self.canonical_renderings.iter().any(|r| r.trim().is_empty()) {
            return Err(invalid(&self.source_term, "canonical renderings must not be blank"));
        }
        Ok(())
    }
}

/// A source term with two or more senses
#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguousEntry {
    /// Source term
    pub source_term: String,
    /// Senses of the term, in asset order
    pub contexts: Vec<String>,
    /// Renderings for each sense
    pub renderings_by_context: HashMap<String, Vec<String>>,
}

impl AmbiguousEntry {
    /// Create a new ambiguous entry
    pub fn new(
        source_term: impl Into<String>,
        contexts: Vec<String>,
        renderings_by_context: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            source_term: source_term.into(),
            contexts,
            renderings_by_context,
        }
    }

    /// Whether `context` is one of the declared senses
    pub fn has_context(&self, context: &str) -> bool {
        self.contexts.iter().any(|c| c == context)
    }

    /// Whether `translated` contains a rendering of the given sense.
    ///
    /// Returns `None` when the sense has no renderings to check against.
    pub fn is_rendered_in(&self, context: &str, translated: &str) -> Option<bool> {
        let renderings = self.renderings_by_context.get(context)?;
        if renderings.is_empty() {
            return None;
        }
        let lowered = translated.to_lowercase();
        Some(renderings.iter().any(|r| lowered.contains(&r.to_lowercase())))
    }
}

impl LexiconEntry for AmbiguousEntry {
    fn source_term(&self) -> &str {
        &self.source_term
    }

    fn category(&self) -> TermCategory {
        TermCategory::Ambiguous
    }

    fn renderings(&self, _target_language: &str, context: Option<&str>) -> Vec<&str> {
        context
            .and_then(|c| self.renderings_by_context.get(c))
            .map(|list| list.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<(), LexiconLoadError> {
        check_source_term(&self.source_term)?;

        let mut distinct: Vec<&str> = Vec::with_capacity(self.contexts.len());
        for context in &self.contexts {
            if distinct.contains(&context.as_str()) {
                return Err(invalid(&self.source_term, format!("duplicate context \"{}\"", context)));
            }
            distinct.push(context);
        }
        if distinct.len() < 2 {
            return Err(invalid(&self.source_term, "an ambiguous term needs at least two contexts"));
        }

        if let Some(unknown) = self.renderings_by_context.keys().find(|k| !self.has_context(k)) {
            return Err(invalid(
                &self.source_term,
                format!("translations reference undeclared context \"{}\"", unknown),
            ));
        }
        Ok(())
    }
}

/// A term whose rendering follows locale-specific convention
#[derive(Debug, Clone, PartialEq)]
pub struct CulturalEntry {
    /// Source term
    pub source_term: String,
    /// Why the term needs care
    pub explanation: String,
    /// Expected rendering per target language code
    pub rendering_by_language: HashMap<String, String>,
}

impl CulturalEntry {
    /// Create a new cultural-context entry
    pub fn new(
        source_term: impl Into<String>,
        explanation: impl Into<String>,
        rendering_by_language: HashMap<String, String>,
    ) -> Self {
        Self {
            source_term: source_term.into(),
            explanation: explanation.into(),
            rendering_by_language,
        }
    }

    /// Expected rendering for a target language
    pub fn rendering_for(&self, target_language: &str) -> Option<&str> {
        self.rendering_by_language.get(target_language).map(String::as_str)
    }

    /// True when a rendering exists for the language and `translated` lacks it
    pub fn is_missing_from(&self, target_language: &str, translated: &str) -> bool {
        self.rendering_for(target_language)
            .is_some_and(|rendering| !translated.contains(rendering))
    }
}

impl LexiconEntry for CulturalEntry {
    fn source_term(&self) -> &str {
        &self.source_term
    }

    fn category(&self) -> TermCategory {
        TermCategory::Cultural
    }

    fn renderings(&self, target_language: &str, _context: Option<&str>) -> Vec<&str> {
        self.rendering_for(target_language).into_iter().collect()
    }

    fn validate(&self) -> Result<(), LexiconLoadError> {
        check_source_term(&self.source_term)?;
        if let Some((lang, _)) = self.rendering_by_language.iter().find(|(_, r)| r.trim().is_empty()) {
            return Err(invalid(&self.source_term, format!("blank rendering for language \"{}\"", lang)));
        }
        Ok(())
    }
}
