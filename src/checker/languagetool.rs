//! LanguageTool Integration
//!
//! Spelling and grammar checking through the LanguageTool HTTP API
//! (`POST /v2/check`). Works with a local server or a hosted instance.

use super::{CorrectionEdit, GrammarChecker};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// LanguageTool `/v2/check` response
#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<LtMatch>,
}

#[derive(Debug, Deserialize)]
struct LtMatch {
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<LtReplacement>,
    #[serde(default)]
    rule: Option<LtRule>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct LtReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct LtRule {
    id: String,
}

/// HTTP client for a LanguageTool server
#[derive(Clone)]
pub struct LanguageToolClient {
    client: reqwest::Client,
    url: String,
    language: String,
}

impl LanguageToolClient {
    /// Create new client from config
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.check_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: config.languagetool_url.trim_end_matches('/').to_string(),
            language: config.checker_language.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Health check - verify LanguageTool is reachable
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/v2/languages", self.url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolClient {
    async fn check(&self, text: &str) -> Result<Vec<CorrectionEdit>> {
        let response = self
            .client
            .post(format!("{}/v2/check", self.url))
            .form(&[("language", self.language.as_str()), ("text", text)])
            .send()
            .await
            .context("LanguageTool request failed")?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            warn!("❌ LanguageTool API Error ({}): {}", status, body_text);
            return Err(anyhow::anyhow!("LanguageTool returned {}", status));
        }

        debug!("🔎 LanguageTool raw body: {}", body_text);
        parse_check_response(text, &body_text)
    }

    fn name(&self) -> &str {
        "languagetool"
    }
}

/// Turn a `/v2/check` body into edits over `text`.
///
/// Matches without replacements are skipped and the first replacement wins.
/// LanguageTool counts offsets in UTF-16 code units; they are converted to
/// char offsets here.
pub fn parse_check_response(text: &str, body: &str) -> Result<Vec<CorrectionEdit>> {
    let response: CheckResponse =
        serde_json::from_str(body).context("Failed to deserialize LanguageTool response")?;

    let units = utf16_boundaries(text);
    let mut edits = Vec::with_capacity(response.matches.len());

    for m in response.matches {
        let Some(first) = m.replacements.into_iter().next() else {
            continue;
        };
        let rule_id = m.rule.map(|r| r.id).unwrap_or_default();

        let span_end = m.offset.checked_add(m.length);
        let (Some(start), Some(end)) = (
            char_index(&units, m.offset),
            span_end.and_then(|end| char_index(&units, end)),
        ) else {
            warn!(
                "⚠️ Skipping LanguageTool match {} with span {}+{} outside text",
                rule_id, m.offset, m.length
            );
            continue;
        };

        debug!("✏️ {} at {}: {}", rule_id, start, m.message);
        edits.push(CorrectionEdit {
            offset: start,
            length: end - start,
            replacement: first.value,
            rule_id,
        });
    }

    Ok(edits)
}

/// UTF-16 offset of every char boundary, including the end of the text
fn utf16_boundaries(text: &str) -> Vec<usize> {
    let mut units = Vec::with_capacity(text.len() + 1);
    let mut pos = 0;
    units.push(pos);
    for c in text.chars() {
        pos += c.len_utf16();
        units.push(pos);
    }
    units
}

fn char_index(boundaries: &[usize], utf16_offset: usize) -> Option<usize> {
    boundaries.binary_search(&utf16_offset).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_match() {
        let body = r#"{"matches":[{"message":"Possible typo","offset":0,"length":6,
            "replacements":[{"value":"Привет"},{"value":"Приветы"}],
            "rule":{"id":"MORFOLOGIK_RULE_RU_RU"}}]}"#;
        let edits = parse_check_response("пвирет мир", body).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].offset, 0);
        assert_eq!(edits[0].length, 6);
        assert_eq!(edits[0].replacement, "Привет");
        assert_eq!(edits[0].rule_id, "MORFOLOGIK_RULE_RU_RU");
    }

    #[test]
    fn test_parse_skips_matches_without_replacements() {
        let body = r#"{"matches":[{"offset":0,"length":1,"replacements":[]}]}"#;
        assert!(parse_check_response("a", body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_no_matches() {
        assert!(parse_check_response("ok", r#"{"matches":[]}"#).unwrap().is_empty());
        assert!(parse_check_response("ok", r#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_converts_utf16_offsets() {
        // The emoji takes two UTF-16 units but one char
        let text = "😀 helo";
        let body = r#"{"matches":[{"offset":3,"length":4,"replacements":[{"value":"hello"}]}]}"#;
        let edits = parse_check_response(text, body).unwrap();
        assert_eq!(edits[0].offset, 2);
        assert_eq!(edits[0].length, 4);
    }

    #[test]
    fn test_parse_skips_span_outside_text() {
        let body = r#"{"matches":[{"offset":5,"length":10,"replacements":[{"value":"x"}]}]}"#;
        assert!(parse_check_response("short", body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_skips_overflowing_span() {
        let body = r#"{"matches":[
            {"offset":18446744073709551615,"length":1,"replacements":[{"value":"x"}]},
            {"offset":1,"length":18446744073709551615,"replacements":[{"value":"y"}]},
            {"offset":0,"length":1,"replacements":[{"value":"A"}]}]}"#;
        let edits = parse_check_response("abc", body).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].replacement, "A");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_check_response("x", "not json").is_err());
    }
}
