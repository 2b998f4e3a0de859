//! Message Processor
//!
//! Entry points used by the chat transport. Each one runs raw text through
//! the normalizer and the corrector and turns the outcome into a reply.

use crate::checker::GrammarChecker;
use crate::config::Config;
use crate::core::{correct, normalize, Correction, CorrectorOptions, TrailingFragment};
use crate::ocr::OcrEngine;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

const WELCOME_TEXT: &str = "🤖 Добро пожаловать в бот для исправления текста!

📸 Просто отправьте мне фотографию с текстом, и я:
• Распознаю текст с изображения
• Исправлю орфографические ошибки
• Расставлю знаки препинания
• Верну вам исправленный текст

📝 Вы также можете отправить текст напрямую для исправления.";

/// Where the text being corrected came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Typed,
    Photo,
}

/// Reply to send back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Greeting for /start and /help
    Welcome,
    /// Original (or recognized) text with its correction
    Corrected {
        source: TextSource,
        original: String,
        correction: Correction,
    },
    /// Typed text had nothing left after normalization
    NothingToCorrect,
    /// OCR found no text at all
    NothingRecognized,
    /// OCR found text but nothing usable survived normalization
    Unreadable,
    /// Photo download or OCR failed
    ProcessingError,
    /// Message type the bot does not handle
    Unsupported,
}

impl Reply {
    /// Text to send to the chat
    pub fn render(&self) -> String {
        match self {
            Reply::Welcome => WELCOME_TEXT.to_string(),
            Reply::Corrected {
                source,
                original,
                correction,
            } => {
                let header = match source {
                    TextSource::Typed => "📝 Исходный текст:",
                    TextSource::Photo => "📸 Распознанный текст:",
                };
                format!(
                    "{header}\n{original}\n\n✅ Исправленный текст:\n{}",
                    correction.text
                )
            }
            Reply::NothingToCorrect => {
                "❌ В сообщении нет текста, который можно исправить.".to_string()
            }
            Reply::NothingRecognized => {
                "❌ Не удалось распознать текст на изображении. Попробуйте с более четким фото."
                    .to_string()
            }
            Reply::Unreadable => "❌ Текст на изображении пуст или нечитаем.".to_string(),
            Reply::ProcessingError => {
                "❌ Произошла ошибка при обработке изображения. Попробуйте еще раз.".to_string()
            }
            Reply::Unsupported => {
                "📸 Отправьте мне фотографию с текстом или текст для исправления.".to_string()
            }
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Correction pipeline with its collaborators injected
#[derive(Clone)]
pub struct Processor {
    checker: Arc<dyn GrammarChecker>,
    ocr: Arc<dyn OcrEngine>,
    options: CorrectorOptions,
}

impl Processor {
    pub fn new(
        checker: Arc<dyn GrammarChecker>,
        ocr: Arc<dyn OcrEngine>,
        options: CorrectorOptions,
    ) -> Self {
        Self {
            checker,
            ocr,
            options,
        }
    }

    /// Build a processor with pipeline options taken from config
    pub fn from_config(
        config: &Config,
        checker: Arc<dyn GrammarChecker>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        let trailing = if config.keep_trailing_fragment {
            TrailingFragment::Keep
        } else {
            TrailingFragment::Drop
        };
        Self::new(
            checker,
            ocr,
            CorrectorOptions {
                timeout: config.check_timeout(),
                trailing,
            },
        )
    }

    /// Correct a message the user typed
    pub async fn correct_typed_text(&self, raw: &str) -> Reply {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            debug!("Typed message is empty after normalization");
            return Reply::NothingToCorrect;
        }

        let correction = correct(&normalized, self.checker.as_ref(), &self.options).await;
        Reply::Corrected {
            source: TextSource::Typed,
            original: raw.trim().to_string(),
            correction,
        }
    }

    /// Correct text that came out of OCR
    pub async fn correct_extracted_text(&self, raw: &str) -> Reply {
        if raw.trim().is_empty() {
            info!("📭 OCR returned no text");
            return Reply::NothingRecognized;
        }

        let normalized = normalize(raw);
        if normalized.is_empty() {
            info!("📭 OCR text is empty after normalization");
            return Reply::Unreadable;
        }

        let correction = correct(&normalized, self.checker.as_ref(), &self.options).await;
        Reply::Corrected {
            source: TextSource::Photo,
            original: normalized.into_string(),
            correction,
        }
    }

    /// Recognize text in an image and correct it
    pub async fn correct_image(&self, image: &[u8]) -> Reply {
        match self.ocr.recognize(image).await {
            Ok(text) => self.correct_extracted_text(&text).await,
            Err(e) => {
                warn!("❌ OCR engine '{}' failed: {:#}", self.ocr.name(), e);
                Reply::ProcessingError
            }
        }
    }
}
