//! OCR (Optical Character Recognition) Module
//!
//! Turns photographed text into raw text for the correction pipeline.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub mod tesseract;

pub use tesseract::TesseractOcr;

/// Trait for OCR engines
#[async_trait]
pub trait OcrEngine: Send + Sync + std::fmt::Debug {
    /// Recognize text in an encoded image (PNG, JPEG, ...).
    /// An empty string means nothing was recognized.
    async fn recognize(&self, image: &[u8]) -> Result<String>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Factory to create the configured OCR engine
pub fn create_engine(config: &Config) -> Arc<dyn OcrEngine> {
    let engine = TesseractOcr::new(config);
    info!(
        "✅ OCR engine '{}' initialized (language: {})",
        engine.name(),
        config.ocr_language
    );
    Arc::new(engine)
}
