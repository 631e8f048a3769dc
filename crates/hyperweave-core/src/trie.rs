//! # Subset Trie
//!
//! Prefix tree over sorted node-code tuples, used to answer simplex questions
//! in time proportional to the tuple, not to the structure:
//!
//! - is this exact node set stored? (`get`, `contains`)
//! - is it contained in some stored set? (`has_superset`, `supersets`)
//! - how many of its subsets are stored? (`count_subsets`)
//!
//! Node identifiers mix integers and strings, so keys are not built from `Id`
//! directly. [`NodeCodes`] assigns each node a stable `u32` on first sight and
//! keys are the ascending code tuples.

use crate::Id;
use std::collections::BTreeMap;

// =============================================================================
// NODE CODES
// =============================================================================

/// Interner from node identifiers to stable integer codes.
///
/// Codes are never reused or reassigned, even when the node is removed.
#[derive(Debug, Clone, Default)]
pub struct NodeCodes {
    labels: Vec<Id>,
    index: BTreeMap<Id, u32>,
}

impl NodeCodes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Code of `node`, assigning the next one if it is new.
    pub fn intern(&mut self, node: &Id) -> u32 {
        if let Some(&code) = self.index.get(node) {
            return code;
        }
        let code = self.labels.len() as u32;
        self.labels.push(node.clone());
        self.index.insert(node.clone(), code);
        code
    }

    /// Code of `node`, if it was ever interned.
    #[must_use]
    pub fn code(&self, node: &Id) -> Option<u32> {
        self.index.get(node).copied()
    }

    /// Node behind `code`.
    #[must_use]
    pub fn label(&self, code: u32) -> Option<&Id> {
        self.labels.get(code as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sorted key of a node set, interning unseen nodes.
    pub fn key_of<'n, I>(&mut self, nodes: I) -> Vec<u32>
    where
        I: IntoIterator<Item = &'n Id>,
    {
        let mut key: Vec<u32> = nodes.into_iter().map(|n| self.intern(n)).collect();
        key.sort_unstable();
        key.dedup();
        key
    }

    /// Sorted key of a node set, or `None` if any node was never interned.
    pub fn lookup_key<'n, I>(&self, nodes: I) -> Option<Vec<u32>>
    where
        I: IntoIterator<Item = &'n Id>,
    {
        let mut key = nodes
            .into_iter()
            .map(|n| self.code(n))
            .collect::<Option<Vec<u32>>>()?;
        key.sort_unstable();
        key.dedup();
        Some(key)
    }
}

// =============================================================================
// TRIE
// =============================================================================

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<u32, TrieNode>,
    terminal: Option<Id>,
}

impl TrieNode {
    fn is_empty(&self) -> bool {
        self.terminal.is_none() && self.children.is_empty()
    }

    fn collect_terminals(&self, out: &mut Vec<Id>) {
        if let Some(id) = &self.terminal {
            out.push(id.clone());
        }
        for child in self.children.values() {
            child.collect_terminals(out);
        }
    }

    fn collect_supersets(&self, rest: &[u32], out: &mut Vec<Id>) {
        let Some((&first, tail)) = rest.split_first() else {
            self.collect_terminals(out);
            return;
        };
        // Children are ascending, so only codes up to `first` can still lead
        // to a tuple containing it.
        for (&code, child) in self.children.range(..=first) {
            if code == first {
                child.collect_supersets(tail, out);
            } else {
                child.collect_supersets(rest, out);
            }
        }
    }

    fn count_subsets(&self, rest: &[u32], depth: usize, min: usize, max: usize) -> usize {
        let mut count = usize::from(self.terminal.is_some() && depth >= min && depth <= max);
        if depth >= max {
            return count;
        }
        for (i, code) in rest.iter().enumerate() {
            if let Some(child) = self.children.get(code) {
                count += child.count_subsets(&rest[i + 1..], depth + 1, min, max);
            }
        }
        count
    }

    fn remove(&mut self, key: &[u32]) -> Option<Id> {
        let Some((first, tail)) = key.split_first() else {
            return self.terminal.take();
        };
        let child = self.children.get_mut(first)?;
        let removed = child.remove(tail);
        if child.is_empty() {
            self.children.remove(first);
        }
        removed
    }
}

/// Map from sorted code tuples to edge identifiers.
#[derive(Debug, Clone, Default)]
pub struct SubsetTrie {
    root: TrieNode,
    len: usize,
}

impl SubsetTrie {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tuples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `key -> edge`. Returns the identifier previously stored there.
    pub fn insert(&mut self, key: &[u32], edge: Id) -> Option<Id> {
        let mut node = &mut self.root;
        for code in key {
            node = node.children.entry(*code).or_default();
        }
        let previous = node.terminal.replace(edge);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Remove `key`, pruning branches left empty.
    pub fn remove(&mut self, key: &[u32]) -> Option<Id> {
        let removed = self.root.remove(key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Identifier stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &[u32]) -> Option<&Id> {
        let mut node = &self.root;
        for code in key {
            node = node.children.get(code)?;
        }
        node.terminal.as_ref()
    }

    #[must_use]
    pub fn contains(&self, key: &[u32]) -> bool {
        self.get(key).is_some()
    }

    /// Identifiers of every stored tuple containing `key`, `key` included.
    #[must_use]
    pub fn supersets(&self, key: &[u32]) -> Vec<Id> {
        let mut out = Vec::new();
        self.root.collect_supersets(key, &mut out);
        out
    }

    /// Whether some stored tuple contains `key` (or equals it).
    #[must_use]
    pub fn has_superset(&self, key: &[u32]) -> bool {
        !self.supersets(key).is_empty()
    }

    /// Number of stored subsets of `key` whose size lies in `[min_size, max_size]`.
    #[must_use]
    pub fn count_subsets(&self, key: &[u32], min_size: usize, max_size: usize) -> usize {
        if min_size > max_size {
            return 0;
        }
        self.root.count_subsets(key, 0, min_size, max_size)
    }
}

/// All `k`-element combinations of `items`, in lexicographic position order.
pub(crate) fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    fn walk<T: Clone>(items: &[T], k: usize, start: usize, acc: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if acc.len() == k {
            out.push(acc.clone());
            return;
        }
        let needed = k - acc.len();
        for i in start..=(items.len() - needed) {
            acc.push(items[i].clone());
            walk(items, k, i + 1, acc, out);
            acc.pop();
        }
    }

    let mut out = Vec::new();
    if k > items.len() {
        return out;
    }
    walk(items, k, 0, &mut Vec::with_capacity(k), &mut out);
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn trie_of(keys: &[&[u32]]) -> SubsetTrie {
        let mut trie = SubsetTrie::new();
        for (i, key) in keys.iter().enumerate() {
            trie.insert(key, Id::from(i));
        }
        trie
    }

    #[test]
    fn codes_are_stable_and_keys_sorted() {
        let mut codes = NodeCodes::new();
        let b = Id::from("b");
        let one = Id::from(1);

        assert_eq!(codes.intern(&b), 0);
        assert_eq!(codes.intern(&one), 1);
        assert_eq!(codes.intern(&b), 0);
        assert_eq!(codes.key_of([&one, &b, &one]), vec![0, 1]);
        assert_eq!(codes.lookup_key([&Id::from(9)]), None);
        assert_eq!(codes.label(1), Some(&one));
    }

    #[test]
    fn insert_get_remove() {
        let mut trie = trie_of(&[&[0, 1, 2], &[0, 1]]);
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.get(&[0, 1]), Some(&Id::from(1)));
        assert!(!trie.contains(&[0]));

        assert_eq!(trie.remove(&[0, 1, 2]), Some(Id::from(0)));
        assert!(trie.contains(&[0, 1]));
        assert_eq!(trie.remove(&[0, 1, 2]), None);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn removal_prunes_empty_branches() {
        let mut trie = trie_of(&[&[3, 4, 5]]);
        trie.remove(&[3, 4, 5]);
        assert!(trie.root.is_empty());
        assert!(trie.is_empty());
    }

    #[test]
    fn supersets_skip_unrelated_branches() {
        let trie = trie_of(&[&[0, 1, 2], &[1, 2], &[0, 2], &[1, 3]]);

        let mut found = trie.supersets(&[1, 2]);
        found.sort();
        assert_eq!(found, vec![Id::from(0), Id::from(1)]);
        assert!(trie.has_superset(&[3]));
        assert!(!trie.has_superset(&[2, 3]));
    }

    #[test]
    fn subsets_are_counted_within_size_bounds() {
        let trie = trie_of(&[&[0, 1, 2], &[0, 1], &[1, 2], &[2], &[0, 3]]);

        assert_eq!(trie.count_subsets(&[0, 1, 2], 2, 2), 2);
        assert_eq!(trie.count_subsets(&[0, 1, 2], 1, 3), 4);
        assert_eq!(trie.count_subsets(&[0, 1, 2], 3, 2), 0);
    }

    #[test]
    fn combinations_in_order() {
        assert_eq!(
            combinations(&[1, 2, 3], 2),
            vec![vec![1, 2], vec![1, 3], vec![2, 3]]
        );
        assert_eq!(combinations(&[1, 2], 3), Vec::<Vec<i32>>::new());
        assert_eq!(combinations(&[1, 2], 0), vec![Vec::<i32>::new()]);
    }
}
