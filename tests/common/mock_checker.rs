//! Mock Grammar Checker for Testing
//!
//! Returns canned edits (or failures) and records every checked text.

use anyhow::Result;
use async_trait::async_trait;
use proofbot::checker::{CorrectionEdit, GrammarChecker};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Behavior {
    Edits(Vec<CorrectionEdit>),
    Fail(String),
    Hang(Duration),
}

/// Mock checker with a fixed behavior
pub struct MockChecker {
    behavior: Behavior,
    /// All texts that were checked
    pub checked: Arc<Mutex<Vec<String>>>,
}

impl MockChecker {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            checked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Checker that never finds anything
    pub fn clean() -> Self {
        Self::new(Behavior::Edits(Vec::new()))
    }

    pub fn with_edits(edits: Vec<CorrectionEdit>) -> Self {
        Self::new(Behavior::Edits(edits))
    }

    pub fn failing(reason: &str) -> Self {
        Self::new(Behavior::Fail(reason.to_string()))
    }

    pub fn hanging(delay: Duration) -> Self {
        Self::new(Behavior::Hang(delay))
    }

    pub fn calls(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl GrammarChecker for MockChecker {
    async fn check(&self, text: &str) -> Result<Vec<CorrectionEdit>> {
        self.checked.lock().unwrap().push(text.to_string());
        match &self.behavior {
            Behavior::Edits(edits) => Ok(edits.clone()),
            Behavior::Fail(reason) => Err(anyhow::anyhow!("{}", reason)),
            Behavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_checker_records_calls() {
        let mock = MockChecker::clean();
        mock.check("один").await.unwrap();
        mock.check("два").await.unwrap();
        assert_eq!(mock.calls(), vec!["один", "два"]);
    }

    #[tokio::test]
    async fn test_mock_checker_failure() {
        let mock = MockChecker::failing("down");
        assert!(mock.check("x").await.is_err());
    }
}
