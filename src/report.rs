/*!
 * Report rendering for assessment results.
 *
 * Languages are always listed in code order so that reports are stable
 * across runs regardless of which language finished first.
 */

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::language_utils;
use crate::pipeline::{ResultMap, TranslationRecord};

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON keyed by language code
    Json,
}

/// Render a result map in the requested format
pub fn render(results: &ResultMap, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(results)),
        ReportFormat::Json => render_json(results),
    }
}

/// Results as pretty JSON, keys sorted
pub fn render_json(results: &ResultMap) -> anyhow::Result<String> {
    let sorted: BTreeMap<&String, &TranslationRecord> = results.iter().collect();
    Ok(serde_json::to_string_pretty(&sorted)?)
}

/// Results as plain text, one section per language
pub fn render_text(results: &ResultMap) -> String {
    if results.is_empty() {
        return "No languages were assessed.\n".to_string();
    }

    let sorted: BTreeMap<&String, &TranslationRecord> = results.iter().collect();
    let mut out = String::new();
    for (code, record) in sorted {
        render_record(&mut out, code, record);
        out.push('\n');
    }
    out
}

/// Render the live-hint warnings for a notice
pub fn render_warnings(warnings: &[String]) -> String {
    if warnings.is_empty() {
        return "No terminology or ambiguous terms found.\n".to_string();
    }
    warnings.iter().map(|warning| format!("- {}\n", warning)).collect()
}

fn render_record(out: &mut String, code: &str, record: &TranslationRecord) {
    let name = language_utils::display_name(code);

    // Writing into a String cannot fail
    if let Some(reason) = record.failure_reason() {
        let _ = writeln!(out, "== {} ({}) == FAILED", code, name);
        let _ = writeln!(out, "  Reason: {}", reason);
    } else {
        let score = &record.score;
        let _ = writeln!(
            out,
            "== {} ({}) == {}/100 [{}]",
            code,
            name,
            score.final_score,
            record.grade()
        );
        let _ = writeln!(
            out,
            "  reverse {:.1} | cultural {:.1} | ambiguous {:.1} | terminology {:.1}",
            score.reverse_translation_score,
            score.cultural_context_score,
            score.ambiguous_term_score,
            score.terminology_score
        );
        let _ = writeln!(out, "  Translated:      {}", record.translated);
        let _ = writeln!(out, "  Back-translated: {}", record.reverse_translated);
    }

    if !record.warnings.is_empty() {
        let _ = writeln!(out, "  Warnings:");
        for warning in &record.warnings {
            let _ = writeln!(out, "    - {}", warning);
        }
    }

    let _ = writeln!(out, "  Suggestions:");
    for suggestion in &record.suggestions {
        let _ = writeln!(out, "    - {}", suggestion);
    }
}
