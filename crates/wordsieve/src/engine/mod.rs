//! Engine lifecycle
//!
//! [`Engine`] owns the live generation (trie, automaton and version label)
//! behind a reader/writer lock, plus an atomic [`Status`] that admits at most
//! one rebuild at a time.
//!
//! - Scans take the lock shared for the duration of the call, so they always
//!   see one trie together with the automaton built for it.
//! - A full rebuild constructs the new trie and automaton without any lock and
//!   only takes the lock exclusively to swap them in.
//! - A partial rebuild edits the live trie in small batches, each under a brief
//!   exclusive window, then rebuilds the automaton and swaps it in. Nodes
//!   created by the edits stay invisible to scans until that swap.
//!
//! # Example
//!
//! ```rust
//! use wordsieve::Engine;
//!
//! let engine = Engine::new(true);
//! engine.init("v1", ["gcd", "naive"]).unwrap();
//!
//! assert_eq!(engine.find_all("so NAIVE"), vec!["NAIVE"]);
//!
//! engine.partial_rebuild("v2", ["敏感词"], ["gcd"]).unwrap();
//! assert_eq!(engine.validate("gcd 敏感词"), (false, "敏感词".to_string()));
//! assert_eq!(engine.version(), "v2");
//! ```

mod config;
mod status;

use std::thread;
use std::time::Instant;

use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::automaton::Automaton;
use crate::error::{EngineError, EngineResult};
use crate::scan::{Match, Scanner};
use crate::trie::Trie;

pub use config::EngineConfig;
pub use status::Status;

use status::{AtomicStatus, ReadyOnDrop};

/// Size of the live dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryStats {
    /// Words currently matched
    pub words: usize,
    /// Trie nodes, including lazily deleted branches
    pub nodes: usize,
    /// Explicit (non-root) failure links
    pub failure_links: usize,
}

/// Outcome of a successful init or rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildStats {
    pub version: String,
    /// Words that were not present before
    pub added: usize,
    /// Words that were present and got removed
    pub removed: usize,
    pub words: usize,
    pub nodes: usize,
    pub failure_links: usize,
    pub elapsed_ms: u64,
}

/// One trie, the automaton built for it, and the version label they carry
#[derive(Debug)]
struct Generation {
    trie: Trie,
    automaton: Automaton,
    version: String,
}

impl Generation {
    fn empty(case_insensitive: bool) -> Self {
        Self {
            trie: Trie::new(case_insensitive),
            automaton: Automaton::default(),
            version: String::new(),
        }
    }

    fn from_words<I, S>(case_insensitive: bool, version: String, words: I) -> (Self, usize)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Trie::new(case_insensitive);
        let added = trie.add(words);
        let automaton = Automaton::build(&trie);
        let generation = Self {
            trie,
            automaton,
            version,
        };
        (generation, added)
    }

    fn scanner(&self) -> Scanner<'_> {
        Scanner::new(&self.trie, &self.automaton)
    }

    fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            words: self.trie.len(),
            nodes: self.automaton.frontier(),
            failure_links: self.automaton.link_count(),
        }
    }

    fn rebuild_stats(&self, added: usize, removed: usize, start: Instant) -> RebuildStats {
        let stats = self.stats();
        RebuildStats {
            version: self.version.clone(),
            added,
            removed,
            words: stats.words,
            nodes: stats.nodes,
            failure_links: stats.failure_links,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// A consistent, read-locked view of the live generation.
///
/// Rebuilds wait for every snapshot to be dropped before swapping, so keep
/// snapshots short-lived.
pub struct Snapshot<'a> {
    generation: RwLockReadGuard<'a, Generation>,
}

impl Snapshot<'_> {
    pub fn scanner(&self) -> Scanner<'_> {
        self.generation.scanner()
    }

    pub fn version(&self) -> &str {
        &self.generation.version
    }

    pub fn trie(&self) -> &Trie {
        &self.generation.trie
    }

    pub fn automaton(&self) -> &Automaton {
        &self.generation.automaton
    }
}

/// Thread-safe, live-updatable multi-pattern matching engine
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    status: AtomicStatus,
    state: RwLock<Generation>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine with default batching
    pub fn new(case_insensitive: bool) -> Self {
        Self::with_config(EngineConfig::case_insensitive(case_insensitive))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            state: RwLock::new(Generation::empty(config.case_insensitive)),
            status: AtomicStatus::new(Status::Init),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load the first dictionary.
    ///
    /// Runs under exclusive access and moves the engine from `Init` to
    /// `Ready`. Fails with [`EngineError::StatusMismatch`] once the engine has
    /// been initialized; use [`full_rebuild`](Self::full_rebuild) afterwards.
    pub fn init<I, S>(&self, version: impl Into<String>, words: I) -> EngineResult<RebuildStats>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = Instant::now();
        let mut state = self.state.write();

        let actual = self.status.load();
        if actual != Status::Init {
            debug!(%actual, "init rejected");
            return Err(EngineError::StatusMismatch {
                expected: Status::Init,
                actual,
            });
        }

        let (generation, added) =
            Generation::from_words(self.config.case_insensitive, version.into(), words);
        *state = generation;
        self.status.store(Status::Ready);

        let stats = state.rebuild_stats(added, 0, start);
        info!(
            version = %stats.version,
            words = stats.words,
            nodes = stats.nodes,
            elapsed_ms = stats.elapsed_ms,
            "engine initialized"
        );
        Ok(stats)
    }

    /// Replace the whole dictionary.
    ///
    /// The new trie and automaton are built without holding the lock; only
    /// the swap is exclusive. Fails with [`EngineError::StatusMismatch`],
    /// doing nothing, unless the engine is `Ready`.
    pub fn full_rebuild<I, S>(
        &self,
        version: impl Into<String>,
        words: I,
    ) -> EngineResult<RebuildStats>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.begin(Status::FullRebuild)?;
        let _ready = ReadyOnDrop(&self.status);
        let start = Instant::now();
        let version = version.into();
        info!(%version, "full rebuild started");

        let (generation, _) = Generation::from_words(self.config.case_insensitive, version, words);

        let (added, removed) = {
            let state = self.state.read();
            let retained = generation
                .trie
                .words()
                .iter()
                .filter(|word| state.trie.find(word))
                .count();
            (
                generation.trie.len() - retained,
                state.trie.len() - retained,
            )
        };

        let (stats, previous) = {
            let mut state = self.state.write();
            let previous = std::mem::replace(&mut *state, generation);
            (state.rebuild_stats(added, removed, start), previous)
        };
        drop(previous);

        info!(
            version = %stats.version,
            words = stats.words,
            nodes = stats.nodes,
            elapsed_ms = stats.elapsed_ms,
            "full rebuild complete"
        );
        Ok(stats)
    }

    /// Apply a delta to the live dictionary.
    ///
    /// Deletions are applied first, then additions, each in batches of
    /// [`EngineConfig::batch_size`] words under a brief exclusive window with
    /// a pause between batches. The automaton is then rebuilt over the edited
    /// trie and swapped in together with `version`. Fails with
    /// [`EngineError::StatusMismatch`], doing nothing, unless the engine is
    /// `Ready`.
    pub fn partial_rebuild<A, SA, D, SD>(
        &self,
        version: impl Into<String>,
        add_words: A,
        del_words: D,
    ) -> EngineResult<RebuildStats>
    where
        A: IntoIterator<Item = SA>,
        SA: AsRef<str>,
        D: IntoIterator<Item = SD>,
        SD: AsRef<str>,
    {
        self.begin(Status::PartialRebuild)?;
        let _ready = ReadyOnDrop(&self.status);
        let start = Instant::now();
        let version = version.into();
        info!(%version, "partial rebuild started");

        let removed = self.edit_in_batches(del_words, |trie, batch| trie.delete(batch));
        let added = self.edit_in_batches(add_words, |trie, batch| trie.add(batch));

        // No other writer can touch the trie while the status is held, so the
        // shape read here is the shape that gets swapped in.
        let automaton = Automaton::build(&self.state.read().trie);

        let stats = {
            let mut state = self.state.write();
            state.automaton = automaton;
            state.version = version;
            state.rebuild_stats(added, removed, start)
        };

        info!(
            version = %stats.version,
            added = stats.added,
            removed = stats.removed,
            words = stats.words,
            nodes = stats.nodes,
            elapsed_ms = stats.elapsed_ms,
            "partial rebuild complete"
        );
        Ok(stats)
    }

    /// Returns `(true, "")` if `text` contains no dictionary word, otherwise
    /// `(false, word)` for the earliest-completing match
    pub fn validate(&self, text: &str) -> (bool, String) {
        self.state.read().scanner().validate(text)
    }

    /// Returns `(true, word)` for the earliest-completing match, or
    /// `(false, "")` if there is none
    pub fn find_in(&self, text: &str) -> (bool, String) {
        self.state.read().scanner().find_in(text)
    }

    /// Every dictionary word occurring in `text`, in order of completion
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.state.read().scanner().find_all(text)
    }

    /// Every occurrence with its byte range in `text`
    pub fn find_matches(&self, text: &str) -> Vec<Match> {
        self.state.read().scanner().find_matches(text)
    }

    /// Overwrite every character of every occurrence with `replacement`
    pub fn replace(&self, text: &str, replacement: char) -> String {
        self.state.read().scanner().replace(text, replacement)
    }

    /// True if `word` is in the live dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.state.read().trie.find(word)
    }

    /// Version label of the live generation
    pub fn version(&self) -> String {
        self.state.read().version.clone()
    }

    pub fn status(&self) -> Status {
        self.status.load()
    }

    pub fn stats(&self) -> DictionaryStats {
        self.state.read().stats()
    }

    /// Hold the live generation for several reads in a row
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            generation: self.state.read(),
        }
    }

    fn begin(&self, to: Status) -> EngineResult<()> {
        self.status.transition(Status::Ready, to).inspect_err(|err| {
            debug!(requested = %to, %err, "rebuild rejected");
        })
    }

    fn edit_in_batches<I, S, F>(&self, words: I, mut edit: F) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&mut Trie, &[S]) -> usize,
    {
        let batch_size = self.config.effective_batch_size();
        let pause = self.config.batch_pause();
        let mut words = words.into_iter().peekable();
        let mut changed = 0;

        while words.peek().is_some() {
            let batch: Vec<S> = words.by_ref().take(batch_size).collect();
            let edited = edit(&mut self.state.write().trie, &batch);
            debug!(batch = batch.len(), edited, "trie batch applied");
            changed += edited;

            if words.peek().is_some() && !pause.is_zero() {
                thread::sleep(pause);
            }
        }
        changed
    }
}
