//! Correction Pipeline
//!
//! Runs normalized text through the grammar checker, applies the proposed
//! edits and tidies punctuation spacing and sentence capitalization.

use super::edits::apply_edits;
use super::text_normalizer::{collapse_whitespace, NormalizedText};
use crate::checker::GrammarChecker;
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info, warn};

lazy_static! {
    static ref SPACE_BEFORE_MARK: Regex =
        Regex::new(r"\s+([.,!?;:])").expect("valid punctuation regex");
}

/// Marks that must not be preceded by whitespace and must be followed by one space
const SPACED_MARKS: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Marks that end a sentence
const TERMINATORS: &[char] = &['.', '!', '?'];

/// Default bound on a single checker call
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(15);

/// What to do with text after the last sentence terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingFragment {
    /// Discard it ("a. b" becomes "A.")
    #[default]
    Drop,
    /// Append it as a final, capitalized sentence without terminator
    Keep,
}

/// Pipeline settings
#[derive(Debug, Clone)]
pub struct CorrectorOptions {
    pub timeout: Duration,
    pub trailing: TrailingFragment,
}

impl Default for CorrectorOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CHECK_TIMEOUT,
            trailing: TrailingFragment::default(),
        }
    }
}

/// How a correction attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionStatus {
    /// The checker proposed edits and they were applied
    Applied { edits: usize },
    /// The checker found nothing; only spacing and capitalization ran
    NoEdits,
    /// The checker failed or timed out; text returned unchanged
    Unavailable(String),
    /// Applying edits or post-processing failed; text returned unchanged
    Failed(String),
}

/// Result of [`correct`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub text: String,
    pub status: CorrectionStatus,
}

impl Correction {
    fn unchanged(input: &NormalizedText, status: CorrectionStatus) -> Self {
        Self {
            text: input.as_str().to_string(),
            status,
        }
    }

    /// True when the pipeline gave up and returned its input
    pub fn is_fallback(&self) -> bool {
        matches!(
            self.status,
            CorrectionStatus::Unavailable(_) | CorrectionStatus::Failed(_)
        )
    }
}

/// A sentence body and the mark that ended it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub body: &'a str,
    pub terminator: char,
}

/// Correct `text` with `checker`.
///
/// Never fails: when the checker is unavailable or the edits cannot be
/// applied, the input comes back unchanged and the status says why.
pub async fn correct(
    text: &NormalizedText,
    checker: &dyn GrammarChecker,
    options: &CorrectorOptions,
) -> Correction {
    debug!(
        "Correcting {} chars with {}",
        text.as_str().chars().count(),
        checker.name()
    );

    let edits = match tokio::time::timeout(options.timeout, checker.check(text.as_str())).await {
        Ok(Ok(edits)) => edits,
        Ok(Err(e)) => {
            warn!("⚠️ Grammar checker '{}' failed: {:#}", checker.name(), e);
            return Correction::unchanged(text, CorrectionStatus::Unavailable(e.to_string()));
        }
        Err(_) => {
            warn!(
                "⚠️ Grammar checker '{}' timed out after {:?}",
                checker.name(),
                options.timeout
            );
            return Correction::unchanged(
                text,
                CorrectionStatus::Unavailable(format!("timed out after {:?}", options.timeout)),
            );
        }
    };

    let applied = match apply_edits(text.as_str(), &edits) {
        Ok(applied) => applied,
        Err(e) => {
            warn!("⚠️ Could not apply corrections: {}", e);
            return Correction::unchanged(text, CorrectionStatus::Failed(e.to_string()));
        }
    };

    let status = if edits.is_empty() {
        CorrectionStatus::NoEdits
    } else {
        info!("✏️ Applied {} correction(s)", edits.len());
        CorrectionStatus::Applied { edits: edits.len() }
    };

    Correction {
        text: postprocess(&applied, options.trailing),
        status,
    }
}

/// Spacing, whitespace and capitalization passes run after edits
pub fn postprocess(text: &str, trailing: TrailingFragment) -> String {
    let spaced = fix_punctuation_spacing(text);
    let collapsed = collapse_whitespace(&spaced);
    capitalize_sentences(&collapsed, trailing)
        .trim_end()
        .to_string()
}

/// Remove whitespace before `. , ! ? ; :` and put one space after each mark
/// that is directly followed by another character.
pub fn fix_punctuation_spacing(text: &str) -> String {
    let tightened = SPACE_BEFORE_MARK.replace_all(text, "$1");

    let mut result = String::with_capacity(tightened.len() + 8);
    let mut chars = tightened.chars().peekable();
    while let Some(c) = chars.next() {
        result.push(c);
        if SPACED_MARKS.contains(&c) {
            if let Some(next) = chars.peek() {
                if !next.is_whitespace() {
                    result.push(' ');
                }
            }
        }
    }
    result
}

/// Split text into terminated sentences plus the unterminated remainder.
///
/// Whitespace after a terminator is skipped. Bodies are returned untrimmed
/// and may be empty ("!!" yields two sentences with empty bodies).
pub fn split_sentences(text: &str) -> (Vec<Sentence<'_>>, &str) {
    let mut sentences = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(TERMINATORS) {
        let end = start + pos;
        let terminator = text[end..].chars().next().unwrap_or('.');
        sentences.push(Sentence {
            body: &text[start..end],
            terminator,
        });

        let rest = &text[end + terminator.len_utf8()..];
        start = text.len() - rest.trim_start().len();
    }

    (sentences, &text[start..])
}

/// Upper-case the first letter of every sentence.
///
/// Sentences with an empty body are dropped; the rest are joined with single
/// spaces. `trailing` decides the fate of text after the last terminator.
pub fn capitalize_sentences(text: &str, trailing: TrailingFragment) -> String {
    let (sentences, rest) = split_sentences(text);

    let mut result = String::with_capacity(text.len());
    for sentence in sentences {
        let body = sentence.body.trim();
        if body.is_empty() {
            continue;
        }
        result.push_str(&capitalize_first(body));
        result.push(sentence.terminator);
        result.push(' ');
    }

    let rest = rest.trim();
    if !rest.is_empty() {
        match trailing {
            TrailingFragment::Keep => result.push_str(&capitalize_first(rest)),
            TrailingFragment::Drop => debug!("Dropping unterminated tail: '{}'", rest),
        }
    }

    result.trim().to_string()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}
