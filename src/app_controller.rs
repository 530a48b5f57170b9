use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::engine::QualityEngine;
use crate::language_utils;
use crate::lexicon::{LexiconSource, LexiconStore};
use crate::pipeline::ResultMap;
use crate::quality;
use crate::report::{self, ReportFormat};

// @module: Application controller for notice assessment

/// Main application controller behind the CLI
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// The configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalize requested codes, falling back to the configured targets
    pub fn resolve_targets(&self, requested: &[String]) -> Result<Vec<String>> {
        let requested = if requested.is_empty() {
            &self.config.target_languages
        } else {
            requested
        };

        let mut targets = Vec::with_capacity(requested.len());
        for code in requested {
            let normalized = language_utils::normalize_language_code(code)?;
            if language_utils::language_codes_match(&normalized, &self.config.source_language) {
                return Err(anyhow!("Target language '{}' is the source language", code));
            }
            if !targets.contains(&normalized) {
                targets.push(normalized);
            }
        }
        Ok(targets)
    }

    /// Assess a notice and render the report.
    ///
    /// Ctrl-C stops the run; languages that already finished are still reported.
    pub async fn assess(&self, original: &str, requested: &[String], format: ReportFormat) -> Result<String> {
        let original = original.trim();
        if original.is_empty() {
            return Err(anyhow!("The notice text is empty"));
        }
        let targets = self.resolve_targets(requested)?;

        let progress_bar = ProgressBar::new(targets.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        progress_bar.set_message("assessing");

        let bar = progress_bar.clone();
        let engine = QualityEngine::from_config(&self.config)?.with_progress(move |record| {
            bar.set_message(format!("{} done ({})", record.target_language, record.final_score()));
            bar.inc(1);
        });

        let start_time = Instant::now();
        let cancel = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available; never cancel
                std::future::pending::<()>().await;
            }
        };
        let results = engine.assess_until(original, &targets, cancel).await;

        if results.len() < targets.len() {
            progress_bar.abandon_with_message("cancelled");
            warn!(
                "Cancelled: {} of {} language(s) finished",
                results.len(),
                targets.len()
            );
        } else {
            progress_bar.finish_with_message("done");
        }

        log_summary(&results, start_time);
        report::render(&results, format)
    }

    /// Term warnings for a notice, without translating it
    pub fn warnings(&self, original: &str) -> Result<String> {
        let store = self.load_lexicon(self.config.lexicon_path.clone())?;
        let warnings = quality::warnings(original, &store.snapshot());
        Ok(report::render_warnings(&warnings))
    }

    /// Validate a lexicon asset and describe it
    pub fn lexicon_summary(&self, path: Option<PathBuf>) -> Result<String> {
        let store = self.load_lexicon(path.or_else(|| self.config.lexicon_path.clone()))?;
        Ok(format!("{}: {}\n", store.source(), store.snapshot().summary()))
    }

    fn load_lexicon(&self, path: Option<PathBuf>) -> Result<LexiconStore> {
        let source = LexiconSource::from_optional_path(path);
        LexiconStore::load(source.clone()).with_context(|| format!("Failed to load lexicon from {}", source))
    }
}

/// Read the notice from an argument, a file or standard input
pub fn read_notice(text: Option<String>, file: Option<&Path>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read notice file: {}", path.display())),
        (None, None) => {
            let mut buffer = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
                .context("Failed to read notice from standard input")?;
            Ok(buffer)
        }
    }
}

fn log_summary(results: &ResultMap, start_time: Instant) {
    let degraded = results.values().filter(|record| record.is_degraded()).count();
    info!(
        "Assessed {} language(s) in {:.1}s ({} failed)",
        results.len(),
        start_time.elapsed().as_secs_f64(),
        degraded
    );
}
