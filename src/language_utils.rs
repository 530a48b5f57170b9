//! Language utilities for the codes used as result keys.
//!
//! Result maps are keyed by ISO 639-1 codes ("en", "zh", ...). Users may
//! also pass ISO 639-2/T or 639-2/B codes, which are normalized here.

use anyhow::{anyhow, Result};
use isolang::Language;

/// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Languages the built-in lexicon carries cultural renderings for
pub const ALERT_LANGUAGES: &[&str] = &["en", "zh", "ja", "vi", "th"];

fn lookup(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => {
            let part2t = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == normalized)
                .map(|(_, terminological)| *terminological)
                .unwrap_or(normalized.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Validate that a code is a known ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<()> {
    lookup(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible.
/// Falls back to ISO 639-3 if no 2-letter code exists.
pub fn normalize_language_code(code: &str) -> Result<String> {
    let language = lookup(code).ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;
    Ok(language
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| language.to_639_3().to_string()))
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup(code1), lookup(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// English name of the language behind a code
pub fn get_language_name(code: &str) -> Result<String> {
    let language = lookup(code).ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;
    Ok(language.to_name().to_string())
}

/// Name for reports and prompts; unknown codes are shown as given
pub fn display_name(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}
