//! # Ordered Index
//!
//! AVL tree of `Record`s keyed by case-insensitive name.
//!
//! Every subtree is an owned `Option<Box<Node>>` slot. Insert and delete
//! consume a slot and hand back the (possibly new) subtree root, so rotations
//! never need parent pointers.
//!
//! ## Duplicates
//!
//! The tree is a multiset: equal names route right on insert. `delete`
//! removes exactly one node, and the insertion-ordered `listing` is derived
//! from the nodes themselves (each node carries its insertion stamp), so the
//! tree and the listing always hold the same records.

use crate::{Record, StockpileError, caseless_cmp};
use std::cmp::Ordering;

// =============================================================================
// NODE
// =============================================================================

type Link = Option<Box<Node>>;

#[derive(Debug, Clone)]
struct Node {
    record: Record,
    /// Insertion stamp, drives `listing()` order.
    seq: u64,
    /// Leaf = 1, empty = 0.
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(record: Record, seq: u64) -> Box<Self> {
        Box::new(Self {
            record,
            seq,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn key(&self) -> &str {
        self.record.name().as_str()
    }
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance(node: &Node) -> i64 {
    i64::from(height(&node.left)) - i64::from(height(&node.right))
}

fn update_height(node: &mut Node) {
    node.height = 1 + height(&node.left).max(height(&node.right));
}

// =============================================================================
// ROTATIONS
// =============================================================================

/// Lift the left child above `node`. Returns the new subtree root.
fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    update_height(&mut node);
    pivot.right = Some(node);
    update_height(&mut pivot);
    pivot
}

/// Lift the right child above `node`. Returns the new subtree root.
fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    update_height(&mut node);
    pivot.left = Some(node);
    update_height(&mut pivot);
    pivot
}

/// Restore balance from the node's and its heavy child's balance factors.
///
/// Used on every path that shrinks a subtree.
fn rebalance(mut node: Box<Node>) -> Box<Node> {
    update_height(&mut node);
    let factor = balance(&node);

    if factor > 1 {
        if node.left.as_deref().is_some_and(|left| balance(left) < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if factor < -1 {
        if node.right.as_deref().is_some_and(|right| balance(right) > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

// =============================================================================
// INSERT / DELETE
// =============================================================================

fn insert_at(link: Link, record: Record, seq: u64) -> Box<Node> {
    let Some(mut node) = link else {
        return Node::leaf(record, seq);
    };

    if caseless_cmp(record.name().as_str(), node.key()) == Ordering::Less {
        // Which side of the child the key lands on picks the rotation case.
        let outer = node
            .left
            .as_deref()
            .is_some_and(|child| caseless_cmp(record.name().as_str(), child.key()).is_lt());
        node.left = Some(insert_at(node.left.take(), record, seq));
        update_height(&mut node);

        if balance(&node) > 1 {
            if !outer {
                node.left = node.left.take().map(rotate_left);
            }
            return rotate_right(node);
        }
    } else {
        // Ties route right, at the child as well.
        let outer = node
            .right
            .as_deref()
            .is_some_and(|child| caseless_cmp(record.name().as_str(), child.key()).is_ge());
        node.right = Some(insert_at(node.right.take(), record, seq));
        update_height(&mut node);

        if balance(&node) < -1 {
            if !outer {
                node.right = node.right.take().map(rotate_right);
            }
            return rotate_left(node);
        }
    }

    node
}

/// Remove the first node on the descent for `key` whose record `accept`s.
///
/// Equal names can sit on both sides of an equal node after rotations, so a
/// rejected match searches left, then right.
fn remove_at<F>(link: Link, key: &str, accept: &mut F, removed: &mut Option<Record>) -> Link
where
    F: FnMut(&Record) -> bool,
{
    let mut node = link?;

    match caseless_cmp(key, node.key()) {
        Ordering::Less => node.left = remove_at(node.left.take(), key, accept, removed),
        Ordering::Greater => node.right = remove_at(node.right.take(), key, accept, removed),
        Ordering::Equal => {
            if accept(&node.record) {
                return unlink(node, removed);
            }
            node.left = remove_at(node.left.take(), key, accept, removed);
            if removed.is_none() {
                node.right = remove_at(node.right.take(), key, accept, removed);
            }
        }
    }

    if removed.is_none() {
        return Some(node);
    }
    Some(rebalance(node))
}

/// Detach `node`, splicing its children back together.
fn unlink(node: Box<Node>, removed: &mut Option<Record>) -> Link {
    let Node {
        record,
        left,
        right,
        ..
    } = *node;
    *removed = Some(record);

    match (left, right) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            // In-order successor takes the vacated position.
            let (rest, mut heir) = take_min(right);
            heir.left = Some(left);
            heir.right = rest;
            Some(rebalance(heir))
        }
    }
}

/// Split off the leftmost node of a subtree, rebalancing the path to it.
fn take_min(mut node: Box<Node>) -> (Link, Box<Node>) {
    match node.left.take() {
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
        None => {
            let rest = node.right.take();
            (rest, node)
        }
    }
}

// =============================================================================
// ORDERED INDEX
// =============================================================================

/// Height-balanced index of records.
///
/// - `insert` always succeeds
/// - `search` / `delete` compare names ignoring case
/// - `listing` returns records in insertion order, `iter` in name order
#[derive(Debug, Clone, Default)]
pub struct OrderedIndex {
    root: Link,
    len: usize,
    next_seq: u64,
}

impl OrderedIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. Duplicate names are kept.
    pub fn insert(&mut self, record: Record) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.root = Some(insert_at(self.root.take(), record, seq));
        self.len += 1;
    }

    /// Find a record by name, ignoring case.
    #[must_use]
    pub fn search(&self, name: &str) -> Option<&Record> {
        let mut link = self.root.as_deref();
        while let Some(node) = link {
            link = match caseless_cmp(name, node.key()) {
                Ordering::Equal => return Some(&node.record),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Check whether a record with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.search(name).is_some()
    }

    /// Remove one record with this name. Returns whether anything was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.remove(name).is_some()
    }

    /// Remove one record with this name and hand it back.
    pub fn remove(&mut self, name: &str) -> Option<Record> {
        self.remove_where(name, |_| true)
    }

    /// Remove one record equal to `target` (same name and power).
    pub fn remove_record(&mut self, target: &Record) -> bool {
        self.remove_where(target.name().as_str(), |record| record == target)
            .is_some()
    }

    fn remove_where<F>(&mut self, name: &str, mut accept: F) -> Option<Record>
    where
        F: FnMut(&Record) -> bool,
    {
        let mut removed = None;
        self.root = remove_at(self.root.take(), name, &mut accept, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Records in insertion order.
    #[must_use]
    pub fn listing(&self) -> Vec<&Record> {
        let mut stamped: Vec<(u64, &Record)> =
            self.nodes().map(|node| (node.seq, &node.record)).collect();
        stamped.sort_unstable_by_key(|(seq, _)| *seq);
        stamped.into_iter().map(|(_, record)| record).collect()
    }

    /// Records in name order (in-order traversal).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: self.nodes(),
        }
    }

    fn nodes(&self) -> Nodes<'_> {
        let mut nodes = Nodes {
            stack: Vec::new(),
            remaining: self.len,
        };
        nodes.descend_left(self.root.as_deref());
        nodes
    }

    /// Move every record out, in insertion order. The index is left empty.
    pub fn drain(&mut self) -> Vec<Record> {
        let mut stamped = Vec::with_capacity(self.len);
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();

        while let Some(node) = stack.pop() {
            let Node {
                record,
                seq,
                left,
                right,
                ..
            } = *node;
            stamped.push((seq, record));
            stack.extend(left);
            stack.extend(right);
        }

        self.len = 0;
        stamped.sort_unstable_by_key(|(seq, _)| *seq);
        stamped.into_iter().map(|(_, record)| record).collect()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree (empty = 0).
    #[must_use]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Check AVL balance, stored heights, name order and the record count.
    pub fn verify(&self) -> Result<(), StockpileError> {
        let (_, count) = verify_subtree(&self.root, None, None)?;
        if count != self.len {
            return Err(StockpileError::InvariantViolation(format!(
                "index counts {} records but holds {}",
                self.len, count
            )));
        }
        Ok(())
    }
}

/// Returns `(height, node count)` of a valid subtree.
fn verify_subtree(
    link: &Link,
    lower: Option<&str>,
    upper: Option<&str>,
) -> Result<(u32, usize), StockpileError> {
    let Some(node) = link else {
        return Ok((0, 0));
    };
    let key = node.key();

    if lower.is_some_and(|bound| caseless_cmp(key, bound).is_lt())
        || upper.is_some_and(|bound| caseless_cmp(key, bound).is_gt())
    {
        return Err(StockpileError::InvariantViolation(format!(
            "{key:?} is out of order"
        )));
    }

    let (left_height, left_count) = verify_subtree(&node.left, lower, Some(key))?;
    let (right_height, right_count) = verify_subtree(&node.right, Some(key), upper)?;

    let expected = 1 + left_height.max(right_height);
    if node.height != expected {
        return Err(StockpileError::InvariantViolation(format!(
            "{key:?} stores height {} but has {}",
            node.height, expected
        )));
    }
    if left_height.abs_diff(right_height) > 1 {
        return Err(StockpileError::InvariantViolation(format!(
            "{key:?} is unbalanced ({left_height} vs {right_height})"
        )));
    }

    Ok((expected, left_count + right_count + 1))
}

// =============================================================================
// ITERATORS
// =============================================================================

/// In-order node walk with an explicit stack.
struct Nodes<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Nodes<'a> {
    fn descend_left(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Records of an [`OrderedIndex`] in name order.
pub struct Iter<'a> {
    nodes: Nodes<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<&'a Record> {
        self.nodes.next().map(|node| &node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a OrderedIndex {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl FromIterator<Record> for OrderedIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

// =============================================================================
// TESTS
// =============================================================================
