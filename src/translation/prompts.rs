/*!
 * Prompt templates for emergency notice translation.
 *
 * Two templates are used per assessment: the forward prompt renders the
 * notice into a target language, the reverse prompt renders that translation
 * back into the source language as literally as possible so the scorer can
 * compare it with the original.
 *
 * The forward prompt is extended with `term_guidance`: the lexicon entries
 * found in the notice, with their reference renderings and, for ambiguous
 * terms, every sense the term can carry.
 */

use crate::lexicon::{Lexicon, LexiconEntry};

/// System prompt template with `{source_language}` and `{target_language}` placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Forward translation of an official alert
    pub const EMERGENCY_TRANSLATOR: &'static str = r#"You are a professional translator of official public emergency alerts, translating from {source_language} to {target_language}.

## Requirements
- Keep the formal, urgent register of a government disaster alert
- Use the standard {target_language} terms for hazards and protective actions
- Render required actions as direct imperatives
- Keep place names, times, dates and emergency numbers (119, 112) exact
- Do not add, soften or omit any instruction

Respond with the translated text only, without explanations or notes."#;

    /// Back-translation used as a verification signal
    pub const REVERSE_TRANSLATOR: &'static str = r#"You are checking the translation of an official emergency alert. Translate the following {source_language} text back into {target_language}.

## Requirements
- Translate as literally as possible; do not correct or improve the text
- Preserve the level of urgency exactly as it is expressed
- Keep every time, place and instruction that appears, and add nothing that does not

Respond with the translated text only, without explanations or notes."#;

    /// Create a new prompt template
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// The forward template
    pub fn emergency_translator() -> Self {
        Self::new(Self::EMERGENCY_TRANSLATOR)
    }

    /// The back-translation template
    pub fn reverse_translator() -> Self {
        Self::new(Self::REVERSE_TRANSLATOR)
    }

    /// Render the template with the given language names
    pub fn render(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

/// Lexicon guidance for the terms that occur in `original`, or `None` when no term occurs
pub fn term_guidance(lexicon: &Lexicon, original: &str, target_language: &str) -> Option<String> {
    let mut lines = Vec::new();

    for entry in lexicon.terminology.iter().filter(|entry| entry.occurs_in(original)) {
        if let Some(rendering) = entry.preferred_rendering() {
            lines.push(format!("- {}: standard term \"{}\"", entry.source_term, rendering));
        }
    }

    for entry in lexicon.ambiguous.iter().filter(|entry| entry.occurs_in(original)) {
        let senses: Vec<String> = entry
            .contexts
            .iter()
            .map(|context| match entry.renderings_by_context.get(context).and_then(|r| r.first()) {
                Some(rendering) => format!("{} (\"{}\")", context, rendering),
                None => context.clone(),
            })
            .collect();
        lines.push(format!(
            "- {} is ambiguous: {}; translate the sense this notice uses",
            entry.source_term,
            senses.join(" or ")
        ));
    }

    for entry in lexicon.cultural.iter().filter(|entry| entry.occurs_in(original)) {
        if let Some(rendering) = entry.rendering_for(target_language) {
            lines.push(format!("- {}: write \"{}\"", entry.source_term, rendering));
        }
    }

    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "## Terms in this notice\nReference renderings are in English; use the matching standard term of the target language.\n{}",
        lines.join("\n")
    ))
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::emergency_translator()
    }
}
