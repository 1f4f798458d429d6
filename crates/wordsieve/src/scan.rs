//! Matching over a trie and its failure links
//!
//! A [`Scanner`] borrows one trie together with the automaton built for it
//! and runs the Aho-Corasick state machine over input text, one code point at
//! a time. The scan state is always a trie node, starting at the root.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::automaton::Automaton;
use crate::trie::{NodeId, Trie, TrieNode};

/// A dictionary word found in scanned text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// The matched text as it appears in the input
    pub word: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

/// Read-only Aho-Corasick traversal
#[derive(Clone, Copy)]
pub struct Scanner<'a> {
    trie: &'a Trie,
    automaton: &'a Automaton,
}

impl<'a> Scanner<'a> {
    pub fn new(trie: &'a Trie, automaton: &'a Automaton) -> Self {
        Self { trie, automaton }
    }

    /// Returns `(true, "")` if no dictionary word occurs in `text`, otherwise
    /// `(false, word)` for the earliest-completing match. Stops at the first hit.
    pub fn validate(&self, text: &str) -> (bool, String) {
        match self.first_match(text) {
            Some(m) => (false, m.word),
            None => (true, String::new()),
        }
    }

    /// Negation of [`validate`](Self::validate)
    pub fn find_in(&self, text: &str) -> (bool, String) {
        let (clean, first) = self.validate(text);
        (!clean, first)
    }

    /// Every match in order of completion. A position ending several words
    /// reports the longest first. Duplicates are kept.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.find_matches(text).into_iter().map(|m| m.word).collect()
    }

    /// Like [`find_all`](Self::find_all), with byte ranges into `text`
    pub fn find_matches(&self, text: &str) -> Vec<Match> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut matches = Vec::new();
        self.scan(&chars, |position, node| {
            matches.push(span(text, &chars, position, node.depth()));
            ControlFlow::Continue(())
        });
        matches
    }

    /// Overwrite every character of every match with `replacement`
    pub fn replace(&self, text: &str, replacement: char) -> String {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut output: Vec<char> = chars.iter().map(|&(_, c)| c).collect();
        self.scan(&chars, |position, node| {
            let start = position + 1 - node.depth();
            output[start..=position].fill(replacement);
            ControlFlow::Continue(())
        });
        output.into_iter().collect()
    }

    fn first_match(&self, text: &str) -> Option<Match> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut first = None;
        self.scan(&chars, |position, node| {
            first = Some(span(text, &chars, position, node.depth()));
            ControlFlow::Break(())
        });
        first
    }

    /// Drive the automaton over `chars`, calling `visit` for every word that
    /// ends at each position until it breaks
    fn scan<F>(&self, chars: &[(usize, char)], mut visit: F)
    where
        F: FnMut(usize, &TrieNode) -> ControlFlow<()>,
    {
        let mut state = NodeId::ROOT;
        for (position, &(_, c)) in chars.iter().enumerate() {
            state = self.step(state, self.trie.normalize(c));
            for node in self.outputs(state) {
                if visit(position, node).is_break() {
                    return;
                }
            }
        }
    }

    /// Direct transition if one exists, failure transition otherwise
    #[inline]
    fn step(&self, state: NodeId, c: char) -> NodeId {
        self.next(state, c)
            .unwrap_or_else(|| self.fail_step(state, c))
    }

    #[inline]
    fn next(&self, state: NodeId, c: char) -> Option<NodeId> {
        self.trie
            .child(state, c)
            .filter(|&id| self.automaton.covers(id))
    }

    fn fail_step(&self, mut state: NodeId, c: char) -> NodeId {
        loop {
            let fallback = self.automaton.fail(state);
            if let Some(next) = self.next(fallback, c) {
                return next;
            }
            if state.is_root() {
                return state;
            }
            state = fallback;
        }
    }

    /// Path-end nodes on the failure chain of `state`, deepest first
    fn outputs(&self, state: NodeId) -> Outputs<'a> {
        Outputs {
            trie: self.trie,
            automaton: self.automaton,
            current: state,
        }
    }
}

fn span(text: &str, chars: &[(usize, char)], position: usize, depth: usize) -> Match {
    let start = chars[position + 1 - depth].0;
    let (last, c) = chars[position];
    let end = last + c.len_utf8();
    Match {
        word: text[start..end].to_string(),
        start,
        end,
    }
}

struct Outputs<'a> {
    trie: &'a Trie,
    automaton: &'a Automaton,
    current: NodeId,
}

impl<'a> Iterator for Outputs<'a> {
    type Item = &'a TrieNode;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.current.is_root() {
            let node = self.trie.node(self.current);
            self.current = self.automaton.fail(self.current);
            if node.is_path_end() {
                return Some(node);
            }
        }
        None
    }
}
