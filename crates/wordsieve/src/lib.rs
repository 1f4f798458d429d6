//! wordsieve
//!
//! Live, updatable multi-pattern word matching. A dictionary of words is
//! indexed in a character trie, compiled into an Aho-Corasick automaton, and
//! scanned against arbitrary text in a single pass to validate, collect or
//! mask every occurrence. The dictionary can be replaced wholesale or edited
//! incrementally while other threads keep scanning.
//!
//! # Modules
//!
//! - [`trie`] - dictionary index with lazy deletion
//! - [`automaton`] - failure-link construction
//! - [`scan`] - traversal and the validate/find/replace operations
//! - [`engine`] - lifecycle manager serving concurrent readers during rebuilds
//!
//! # Example
//!
//! ```rust
//! use wordsieve::{Engine, Status};
//!
//! let engine = Engine::new(true);
//! engine.init("1", ["gcd", "naive", "敏感词"]).unwrap();
//!
//! let text = "hello, gcd, GDB,nanaive哈哈哈，敏感词, caicai我是谁";
//! assert_eq!(engine.find_all(text), vec!["gcd", "naive", "敏感词"]);
//! assert_eq!(engine.validate("all clear"), (true, String::new()));
//! assert_eq!(engine.replace("a naive b", '*'), "a ***** b");
//!
//! engine.full_rebuild("2", ["caicai"]).unwrap();
//! assert_eq!(engine.find_all(text), vec!["caicai"]);
//! assert_eq!(engine.status(), Status::Ready);
//! ```

pub mod automaton;
pub mod engine;
pub mod error;
pub mod scan;
pub mod trie;

// Re-export main types at crate root
pub use automaton::Automaton;
pub use engine::{DictionaryStats, Engine, EngineConfig, RebuildStats, Snapshot, Status};
pub use error::{EngineError, EngineResult};
pub use scan::{Match, Scanner};
pub use trie::{NodeId, Trie, TrieNode};
