//! Text Normalization
//!
//! Cleans raw message or OCR text before it is sent to the grammar checker.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
    static ref DISALLOWED_CHARS: Regex =
        Regex::new(r#"[^\w\p{No}\s.,!?\-:()"']"#).expect("valid charset regex");
}

/// Punctuation kept by the normalizer in addition to word characters and spaces
pub const ALLOWED_PUNCTUATION: &[char] = &['.', ',', '!', '?', '-', ':', '(', ')', '"', '\''];

/// Text that went through [`normalize`].
///
/// Holds only word characters, other numbers such as `²` or `½`, single
/// spaces and [`ALLOWED_PUNCTUATION`], with no leading or trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace every run of whitespace with a single space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Normalize raw text: collapse whitespace, drop disallowed characters, trim.
///
/// Dropping a character can leave two spaces side by side ("a # b"), so the
/// collapse runs again after filtering.
pub fn normalize(text: &str) -> NormalizedText {
    let collapsed = collapse_whitespace(text);
    let filtered = DISALLOWED_CHARS.replace_all(&collapsed, "");
    let result = collapse_whitespace(&filtered);
    NormalizedText(result.trim().to_string())
}
