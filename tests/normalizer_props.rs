use proofbot::core::corrector::{capitalize_sentences, postprocess};
use proofbot::core::{normalize, TrailingFragment};
use proptest::prelude::*;
use regex::Regex;

fn allowed_charset() -> Regex {
    Regex::new(r#"^[\w\p{No} .,!?\-:()"']*$"#).unwrap()
}

// Mix of Latin, Cyrillic, digits, whitespace kinds and symbols
fn messy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Zа-яА-ЯёЁ0-9_]{1,8}",
            "[ \t\n\r\u{a0}]{1,4}",
            "[.,!?;:()\"'#$%@«»—-]{1,3}",
            any::<char>().prop_map(|c| c.to_string()),
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in messy_text()) {
        let once = normalize(&text);
        let twice = normalize(once.as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_has_single_inner_spaces(text in messy_text()) {
        let out = normalize(&text);
        let s = out.as_str();
        prop_assert!(!s.contains("  "));
        prop_assert!(!s.starts_with(' '));
        prop_assert!(!s.ends_with(' '));
        prop_assert!(s.chars().all(|c| c == ' ' || !c.is_whitespace()));
    }

    #[test]
    fn normalize_keeps_only_allowed_chars(text in messy_text()) {
        let out = normalize(&text);
        prop_assert!(allowed_charset().is_match(out.as_str()), "unexpected char in {:?}", out);
    }

    #[test]
    fn terminated_sentences_start_upper(
        bodies in prop::collection::vec("[a-zа-яё][a-zа-яё ]{0,10}", 1..5),
        terminator in prop::sample::select(vec!['.', '!', '?']),
    ) {
        let text: String = bodies
            .iter()
            .map(|b| format!("{}{} ", b.trim(), terminator))
            .collect();
        let out = capitalize_sentences(text.trim(), TrailingFragment::Drop);

        for sentence in out.split_inclusive(['.', '!', '?']) {
            let first = sentence.trim_start().chars().next();
            prop_assert!(first.map_or(true, |c| !c.is_lowercase()), "lowercase start in {:?}", out);
        }
    }

    #[test]
    fn postprocess_never_leaves_space_before_terminators(text in messy_text()) {
        let normalized = normalize(&text);
        let out = postprocess(normalized.as_str(), TrailingFragment::Keep);
        for mark in [" .", " !", " ?"] {
            prop_assert!(!out.contains(mark), "{:?} in {:?}", mark, out);
        }
    }
}
