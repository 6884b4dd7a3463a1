//! Prefix Trie Module
//!
//! Byte-keyed prefix trie backing the command registry. A single structure
//! serves exact lookup (dispatch, highlighting), first-match lookup (hints)
//! and ordered prefix enumeration (completion, `help`).
//!
//! Keys are compared byte by byte. Children are kept in a `BTreeMap`, so a
//! pre-order walk yields keys in lexicographic byte order, which for UTF-8
//! is the same as code point order.

use std::collections::BTreeMap;

#[derive(Debug)]
struct Node<V> {
    children: BTreeMap<u8, Node<V>>,
    entry: Option<(String, V)>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            entry: None,
        }
    }

    /// A node with no value and no descendants can be pruned
    fn is_vacant(&self) -> bool {
        self.entry.is_none() && self.children.is_empty()
    }

    fn collect<'a>(&'a self, out: &mut Vec<(&'a str, &'a V)>) {
        if let Some((key, value)) = &self.entry {
            out.push((key.as_str(), value));
        }
        for child in self.children.values() {
            child.collect(out);
        }
    }

    fn first(&self) -> Option<(&str, &V)> {
        if let Some((key, value)) = &self.entry {
            return Some((key.as_str(), value));
        }
        self.children.values().find_map(Node::first)
    }

    fn remove(&mut self, bytes: &[u8]) -> Option<V> {
        match bytes.split_first() {
            None => self.entry.take().map(|(_, value)| value),
            Some((byte, rest)) => {
                let child = self.children.get_mut(byte)?;
                let removed = child.remove(rest);
                if removed.is_some() && child.is_vacant() {
                    self.children.remove(byte);
                }
                removed
            }
        }
    }
}

/// Prefix trie mapping text keys to values
#[derive(Debug)]
pub struct Trie<V> {
    root: Node<V>,
    len: usize,
}

impl<V> Trie<V> {
    /// Create an empty trie
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            len: 0,
        }
    }

    /// Insert `value` under `key`, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let mut node = &mut self.root;
        for byte in key.as_bytes() {
            node = node.children.entry(*byte).or_insert_with(Node::new);
        }

        match node.entry.replace((key, value)) {
            Some((_, previous)) => Some(previous),
            None => {
                self.len += 1;
                None
            }
        }
    }

    /// Remove the value stored under `key`; absent keys are ignored
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.root.remove(key.as_bytes());
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// The stored key that is the longest prefix of `text`
    pub fn longest_prefix(&self, text: &str) -> Option<(&str, &V)> {
        let mut node = &self.root;
        let mut best = node.entry.as_ref();

        for byte in text.as_bytes() {
            match node.children.get(byte) {
                Some(child) => {
                    node = child;
                    if child.entry.is_some() {
                        best = child.entry.as_ref();
                    }
                }
                None => break,
            }
        }

        best.map(|(key, value)| (key.as_str(), value))
    }

    /// Exact lookup: the longest stored prefix of `key` must be `key` itself
    pub fn find_exact(&self, key: &str) -> Option<&V> {
        self.longest_prefix(key)
            .filter(|(found, _)| found.len() == key.len())
            .map(|(_, value)| value)
    }

    /// Every entry whose key begins with `prefix`, in lexicographic byte order
    pub fn prefix_range(&self, prefix: &str) -> Vec<(&str, &V)> {
        let mut out = Vec::new();
        if let Some(node) = self.descend(prefix) {
            node.collect(&mut out);
        }
        out
    }

    /// The first entry of `prefix_range(prefix)` without collecting the rest
    pub fn first_with_prefix(&self, prefix: &str) -> Option<(&str, &V)> {
        self.descend(prefix).and_then(Node::first)
    }

    /// All entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.prefix_range("").into_iter()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the trie holds no keys
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn descend(&self, prefix: &str) -> Option<&Node<V>> {
        prefix
            .as_bytes()
            .iter()
            .try_fold(&self.root, |node, byte| node.children.get(byte))
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}
