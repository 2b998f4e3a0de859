//! Mock OCR Engine for Testing
//!
//! Returns a preset recognition result and counts calls.

use anyhow::Result;
use async_trait::async_trait;
use proofbot::ocr::OcrEngine;
use std::sync::{Arc, Mutex};

/// Mock OCR engine with a fixed result
#[derive(Debug)]
pub struct MockOcr {
    text: Option<String>,
    /// Sizes of all images passed in
    pub images: Arc<Mutex<Vec<usize>>>,
}

impl MockOcr {
    /// Engine that "recognizes" `text`
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            images: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Engine that always fails
    pub fn broken() -> Self {
        Self {
            text: None,
            images: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.images.lock().unwrap().len()
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        self.images.lock().unwrap().push(image.len());
        self.text
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Mock OCR failure"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
