/*!
 * The translator contract consumed by the assessment pipeline.
 */

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ProviderError;

/// Anything that can render a text into a target language.
///
/// Failures must be reported as a `ProviderError`, never as an empty string.
/// The pipeline calls this twice per language: once forward into the target
/// language and once in reverse, back into the source language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language`
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        (**self).translate(text, target_language).await
    }
}
