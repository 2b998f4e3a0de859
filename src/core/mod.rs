//! Core processing modules
//!
//! Contains the text normalization and grammar correction pipeline.

pub mod corrector;
pub mod edits;
pub mod text_normalizer;

pub use corrector::{
    correct, Correction, CorrectionStatus, CorrectorOptions, TrailingFragment,
};
pub use text_normalizer::{normalize, NormalizedText};
