//! Property-based tests for scanning and rebuild equivalence.
//!
//! 1. **Reference agreement**: `find_all` equals a brute-force scan that, at
//!    every position, lists the dictionary words ending there, longest first
//! 2. **Validate/find_all agreement**: `validate` reports the first element of
//!    `find_all`
//! 3. **Replace masks everything**: after `replace`, no dictionary word remains
//! 4. **Full vs partial**: reaching a word set by `full_rebuild` or by
//!    `partial_rebuild` gives identical scan results
//! 5. **Membership**: the trie finds exactly the words added and not deleted

use std::collections::BTreeSet;

use proptest::prelude::*;
use wordsieve::{Automaton, Engine, EngineConfig, Scanner, Trie};

// Small alphabets so words overlap and failure links get exercised
fn arb_word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[abc敏]{1,4}").unwrap()
}

fn arb_words() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(arb_word(), 0..12)
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[abcd敏]{0,30}").unwrap()
}

fn reference_find_all(words: &BTreeSet<String>, text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut found = Vec::new();
    for end in 0..chars.len() {
        for len in (1..=end + 1).rev() {
            let candidate: String = chars[end + 1 - len..=end].iter().collect();
            if words.contains(&candidate) {
                found.push(candidate);
            }
        }
    }
    found
}

fn quick_engine() -> Engine {
    Engine::with_config(EngineConfig {
        case_insensitive: false,
        batch_size: 3,
        batch_pause_us: 0,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn find_all_matches_reference(words in arb_words(), text in arb_text()) {
        let mut trie = Trie::new(false);
        trie.add(&words);
        let automaton = Automaton::build(&trie);
        let scanner = Scanner::new(&trie, &automaton);

        prop_assert_eq!(scanner.find_all(&text), reference_find_all(&words, &text));
    }

    #[test]
    fn validate_reports_first_match(words in arb_words(), text in arb_text()) {
        let mut trie = Trie::new(false);
        trie.add(&words);
        let automaton = Automaton::build(&trie);
        let scanner = Scanner::new(&trie, &automaton);

        let all = scanner.find_all(&text);
        let (clean, first) = scanner.validate(&text);
        prop_assert_eq!(clean, all.is_empty());
        prop_assert_eq!(first, all.first().cloned().unwrap_or_default());
    }

    #[test]
    fn replace_masks_every_match(words in arb_words(), text in arb_text()) {
        let mut trie = Trie::new(false);
        trie.add(&words);
        let automaton = Automaton::build(&trie);
        let scanner = Scanner::new(&trie, &automaton);

        let replaced = scanner.replace(&text, '#');
        prop_assert_eq!(replaced.chars().count(), text.chars().count());
        prop_assert!(scanner.find_all(&replaced).is_empty());
    }

    #[test]
    fn match_offsets_slice_the_text(words in arb_words(), text in arb_text()) {
        let mut trie = Trie::new(false);
        trie.add(&words);
        let automaton = Automaton::build(&trie);
        let scanner = Scanner::new(&trie, &automaton);

        for m in scanner.find_matches(&text) {
            prop_assert_eq!(&text[m.start..m.end], m.word.as_str());
        }
    }

    #[test]
    fn full_and_partial_rebuild_agree(
        base in arb_words(),
        target in arb_words(),
        texts in prop::collection::vec(arb_text(), 1..5),
    ) {
        let full = quick_engine();
        full.init("base", &base).unwrap();
        full.full_rebuild("target", &target).unwrap();

        let partial = quick_engine();
        partial.init("base", &base).unwrap();
        let removed: Vec<&String> = base.difference(&target).collect();
        partial.partial_rebuild("target", &target, removed).unwrap();

        prop_assert_eq!(full.stats().words, target.len());
        prop_assert_eq!(partial.stats().words, target.len());
        for text in &texts {
            prop_assert_eq!(full.find_all(text), partial.find_all(text));
            prop_assert_eq!(full.validate(text), partial.validate(text));
            prop_assert_eq!(full.find_all(text), reference_find_all(&target, text));
        }
    }

    #[test]
    fn membership_after_edits(added in arb_words(), deleted in arb_words(), probe in arb_word()) {
        let mut trie = Trie::new(false);
        trie.add(&added);
        trie.delete(&deleted);

        let expected = added.contains(&probe) && !deleted.contains(&probe);
        prop_assert_eq!(trie.find(&probe), expected);
        prop_assert_eq!(trie.len(), added.difference(&deleted).count());
    }
}
