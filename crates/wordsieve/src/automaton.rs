//! Aho-Corasick failure links
//!
//! An [`Automaton`] pairs with exactly one trie shape. It stores the failure
//! link of every node that does not fail to the root, plus the number of
//! nodes the trie had when the links were computed (the *frontier*). Nodes
//! created after that point are invisible to scans that use this automaton.

use ahash::AHashMap;

use crate::trie::{NodeId, Trie};

/// Failure-link table built for one trie shape
#[derive(Debug, Clone)]
pub struct Automaton {
    links: AHashMap<NodeId, NodeId>,
    frontier: usize,
}

impl Default for Automaton {
    /// Automaton for a trie holding only the root
    fn default() -> Self {
        Self {
            links: AHashMap::new(),
            frontier: 1,
        }
    }
}

impl Automaton {
    /// Compute failure links over the current shape of `trie`.
    ///
    /// Nodes are visited breadth first, so the failure link of a node's parent
    /// and of everything on the parent's failure chain is already known when
    /// the node itself is reached.
    pub fn build(trie: &Trie) -> Self {
        let mut automaton = Self {
            links: AHashMap::new(),
            frontier: trie.node_count(),
        };

        for node in trie.breadth_first() {
            let (Some(parent), Some(c)) = (node.parent(), node.character()) else {
                continue;
            };

            let mut link = NodeId::ROOT;
            let mut pointer = parent;
            while !pointer.is_root() {
                pointer = automaton.fail(pointer);
                if let Some(child) = trie.child(pointer, c) {
                    link = child;
                    break;
                }
            }

            if !link.is_root() && link != node.id() {
                automaton.links.insert(node.id(), link);
            }
        }

        automaton
    }

    /// Failure target of `id`; nodes without an entry fail to the root
    #[inline]
    pub fn fail(&self, id: NodeId) -> NodeId {
        self.links.get(&id).copied().unwrap_or(NodeId::ROOT)
    }

    /// True if `id` existed in the trie when this automaton was built
    #[inline]
    pub fn covers(&self, id: NodeId) -> bool {
        id.index() < self.frontier
    }

    /// Number of explicit (non-root) failure links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of trie nodes this automaton was built over
    pub fn frontier(&self) -> usize {
        self.frontier
    }
}
