//! Dictionary index
//!
//! A character trie stored in an arena. Nodes are addressed by [`NodeId`],
//! which doubles as the arena index: ids are handed out in creation order and
//! never reused, so a node's id is stable for the lifetime of the trie.
//!
//! Deletion is lazy. Removing a word only clears the path-end flag on its last
//! node; nodes and edges are never taken out of the graph. Unused branches stay
//! until the whole trie is replaced by a full rebuild.

use std::collections::VecDeque;

use ahash::AHashMap;

/// Identifier of a trie node, also its index in the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node, always the first node in the arena
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// A single trie node
#[derive(Debug, Clone)]
pub struct TrieNode {
    id: NodeId,
    character: Option<char>,
    children: AHashMap<char, NodeId>,
    parent: Option<NodeId>,
    depth: usize,
    path_end: bool,
}

impl TrieNode {
    fn root() -> Self {
        Self {
            id: NodeId::ROOT,
            character: None,
            children: AHashMap::new(),
            parent: None,
            depth: 0,
            path_end: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Edge label from the parent; `None` only for the root
    pub fn character(&self) -> Option<char> {
        self.character
    }

    /// Parent node; `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of characters on the path from the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True if a dictionary word ends exactly at this node
    pub fn is_path_end(&self) -> bool {
        self.path_end
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    /// Child on `c`, if one exists
    #[inline]
    pub fn child(&self, c: char) -> Option<NodeId> {
        self.children.get(&c).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.children.iter().map(|(&c, &id)| (c, id))
    }
}

/// Fold a single code point to lowercase.
///
/// Code points whose lowercase form expands to several code points are kept
/// unchanged, so a folded word always has the same length as the original.
#[inline]
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Prefix tree over Unicode code points
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    case_insensitive: bool,
    words: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Trie {
    /// Create an empty trie. With `case_insensitive`, every character is
    /// folded to lowercase before insertion, lookup and deletion.
    pub fn new(case_insensitive: bool) -> Self {
        Self {
            nodes: vec![TrieNode::root()],
            case_insensitive,
            words: 0,
        }
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Normalize a character the way this trie stores it
    #[inline]
    pub fn normalize(&self, c: char) -> char {
        if self.case_insensitive {
            fold_char(c)
        } else {
            c
        }
    }

    pub fn root(&self) -> &TrieNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Look up a node by id.
    ///
    /// Panics if the id was not produced by this trie.
    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.index()]
    }

    /// Direct child of `id` on the already-normalized character `c`
    #[inline]
    pub fn child(&self, id: NodeId, c: char) -> Option<NodeId> {
        self.nodes[id.index()].child(c)
    }

    /// Number of words currently in the dictionary
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Number of nodes including the root and any lazily deleted branches
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert words. Returns how many of them were not already present.
    pub fn add<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            let mut current = NodeId::ROOT;
            for c in word.chars() {
                current = self.child_or_insert(current, self.normalize(c));
            }
            let node = &mut self.nodes[current.index()];
            if !node.path_end {
                node.path_end = true;
                self.words += 1;
                added += 1;
            }
        }
        added
    }

    /// Remove words. Words that are absent, or only exist as a prefix of
    /// longer words, are ignored. Returns how many words were removed.
    pub fn delete<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = 0;
        for word in words {
            if let Some(id) = self.locate(word.as_ref()) {
                let node = &mut self.nodes[id.index()];
                if node.path_end {
                    node.path_end = false;
                    self.words -= 1;
                    removed += 1;
                }
            }
        }
        removed
    }

    /// True if `word` was added and not deleted since
    pub fn find(&self, word: &str) -> bool {
        self.locate(word)
            .map(|id| self.node(id).path_end)
            .unwrap_or(false)
    }

    /// All words in the dictionary, as stored (folded when case-insensitive),
    /// in sorted order
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::with_capacity(self.words);
        let mut stack = vec![(NodeId::ROOT, String::new())];
        while let Some((id, prefix)) = stack.pop() {
            let node = self.node(id);
            if node.path_end {
                words.push(prefix.clone());
            }
            for (c, child) in node.children() {
                let mut word = prefix.clone();
                word.push(c);
                stack.push((child, word));
            }
        }
        words.sort_unstable();
        words
    }

    /// Every non-root node, shallowest first
    pub fn breadth_first(&self) -> BreadthFirst<'_> {
        let mut queue = VecDeque::new();
        queue.extend(self.root().children.values().copied());
        BreadthFirst { trie: self, queue }
    }

    /// Walk the full path of `word`, if it exists and is non-empty
    fn locate(&self, word: &str) -> Option<NodeId> {
        if word.is_empty() {
            return None;
        }
        word.chars()
            .try_fold(NodeId::ROOT, |id, c| self.child(id, self.normalize(c)))
    }

    fn child_or_insert(&mut self, parent: NodeId, c: char) -> NodeId {
        if let Some(id) = self.child(parent, c) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        let depth = self.nodes[parent.index()].depth + 1;
        self.nodes.push(TrieNode {
            id,
            character: Some(c),
            children: AHashMap::new(),
            parent: Some(parent),
            depth,
            path_end: false,
        });
        self.nodes[parent.index()].children.insert(c, id);
        id
    }
}

/// One-shot breadth-first iterator over the non-root nodes of a [`Trie`]
pub struct BreadthFirst<'a> {
    trie: &'a Trie,
    queue: VecDeque<NodeId>,
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = &'a TrieNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let node = self.trie.node(id);
        self.queue.extend(node.children.values().copied());
        Some(node)
    }
}
