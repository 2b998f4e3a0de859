//! Proofbot Library
//!
//! Text normalization and grammar correction pipeline for the Proofbot
//! Telegram assistant, plus the OCR, checker and transport glue around it.

pub mod bot;
pub mod checker;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod ocr;
pub mod preflight;
pub mod processor;

pub use error::{ProofError, ProofResult};
