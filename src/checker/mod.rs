//! Grammar Checker Module
//!
//! Narrow interface over the external spelling/grammar service.
//! - LanguageTool: HTTP client for a LanguageTool server
//! - languagetool_manager: optional local server lifecycle

pub mod languagetool;
pub mod languagetool_manager;

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub use languagetool::LanguageToolClient;

/// A replacement proposed by the checker for a span of the checked text.
///
/// `offset` and `length` count chars (Unicode scalar values), not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionEdit {
    pub offset: usize,
    pub length: usize,
    pub replacement: String,
    /// Checker rule that produced the edit, for logging
    pub rule_id: String,
}

impl CorrectionEdit {
    pub fn new(offset: usize, length: usize, replacement: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            replacement: replacement.into(),
            rule_id: String::new(),
        }
    }

    /// First char index after the replaced span, `None` when it overflows
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }
}

/// Trait for grammar checking services.
///
/// Implementations are shared between concurrent requests and must not need
/// `&mut self` to check text.
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Return the edits the service proposes for `text`
    async fn check(&self, text: &str) -> Result<Vec<CorrectionEdit>>;

    /// Get the checker name
    fn name(&self) -> &str;
}

/// Factory to create the configured grammar checker
pub fn create_checker(config: &Config) -> Result<Arc<dyn GrammarChecker>> {
    let client = LanguageToolClient::new(config)?;
    info!(
        "✅ Grammar checker '{}' ready ({}, {})",
        client.name(),
        config.languagetool_url,
        config.checker_language
    );
    Ok(Arc::new(client))
}
