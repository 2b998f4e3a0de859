//! Applying checker edits to text

use crate::checker::CorrectionEdit;
use crate::error::{ProofError, ProofResult};
use tracing::debug;

/// Apply `edits` to `text` in ascending offset order.
///
/// An edit overlapping one that was already applied is skipped, so the first
/// applied edit wins. An edit reaching past the end of `text` is an error.
pub fn apply_edits(text: &str, edits: &[CorrectionEdit]) -> ProofResult<String> {
    let chars: Vec<char> = text.chars().collect();

    let mut ordered: Vec<&CorrectionEdit> = edits.iter().collect();
    ordered.sort_by_key(|e| e.offset);

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;

    for edit in ordered {
        let end = match edit.end() {
            Some(end) if end <= chars.len() => end,
            _ => {
                return Err(ProofError::InvalidEdit {
                    offset: edit.offset,
                    length: edit.length,
                    text_len: chars.len(),
                })
            }
        };
        if edit.offset < cursor {
            debug!(
                "Skipping overlapping edit {} at {}+{}",
                edit.rule_id, edit.offset, edit.length
            );
            continue;
        }

        result.extend(&chars[cursor..edit.offset]);
        result.push_str(&edit.replacement);
        cursor = end;
    }

    result.extend(&chars[cursor..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_edits() {
        assert_eq!(apply_edits("как дела", &[]).unwrap(), "как дела");
    }

    #[test]
    fn test_single_edit_cyrillic() {
        let edits = [CorrectionEdit::new(0, 6, "привет")];
        assert_eq!(apply_edits("пвирет мир", &edits).unwrap(), "привет мир");
    }

    #[test]
    fn test_length_changing_edits_shift_later_ones() {
        let edits = [
            CorrectionEdit::new(0, 2, "hello"),
            CorrectionEdit::new(3, 3, "wrld!"),
        ];
        assert_eq!(apply_edits("hi the", &edits).unwrap(), "hello wrld!");
    }

    #[test]
    fn test_unsorted_edits_are_ordered() {
        let edits = [
            CorrectionEdit::new(4, 1, "B"),
            CorrectionEdit::new(0, 1, "A"),
        ];
        assert_eq!(apply_edits("a b b", &edits).unwrap(), "A b B");
    }

    #[test]
    fn test_overlap_first_applied_wins() {
        let edits = [
            CorrectionEdit::new(0, 5, "first"),
            CorrectionEdit::new(3, 4, "second"),
        ];
        assert_eq!(apply_edits("abcdefg", &edits).unwrap(), "firstfg");
    }

    #[test]
    fn test_insertion_and_deletion() {
        let edits = [
            CorrectionEdit::new(3, 0, ","),
            CorrectionEdit::new(4, 5, ""),
        ];
        assert_eq!(apply_edits("раз лишь два", &edits).unwrap(), "раз, два");
    }

    #[test]
    fn test_out_of_range_edit_is_error() {
        let edits = [CorrectionEdit::new(2, 5, "x")];
        let err = apply_edits("abc", &edits).unwrap_err();
        assert!(matches!(err, ProofError::InvalidEdit { text_len: 3, .. }));
    }

    #[test]
    fn test_overflowing_span_is_error() {
        let edits = [CorrectionEdit::new(usize::MAX, 1, "x")];
        let err = apply_edits("abc", &edits).unwrap_err();
        assert!(matches!(err, ProofError::InvalidEdit { offset: usize::MAX, .. }));
    }
}
