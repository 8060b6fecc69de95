//! An owning, unbalanced BST. Every node exclusively owns its children through a `Box` and there
//! are no parent pointers, so the whole tree is plain safe Rust. Insertion order decides the
//! shape; use [`Tree::drain_sorted`] and [`Tree::rebuild_from_sorted`] to flatten a lopsided tree
//! and rebuild it with minimal height.
//!
//! # Examples
//!
//! ```
//! use bintree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.retrieve(&1), None);
//!
//! assert!(tree.insert(1));
//! assert_eq!(tree.retrieve(&1), Some(&1));
//!
//! // Duplicates are rejected rather than replaced.
//! assert!(!tree.insert(1));
//! assert_eq!(tree.count(), 1);
//!
//! // Erasing an element hands it back.
//! assert_eq!(tree.erase(&1), Some(1));
//! assert_eq!(tree.retrieve(&1), None);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::mem;

use arrayvec::ArrayVec;
use tracing::{trace, warn};

use crate::error::{Result, TreeError};

/// Spaces per level used by [`Sideways`] unless changed with [`Sideways::indent`].
const DEFAULT_INDENT: usize = 4;

/// An ordered Binary Search Tree of unique elements. Elements are compared with [`Ord`]; an
/// element is both the search key and the stored payload.
pub struct Tree<T> {
    root: Link<T>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }

    /// Discards the current nodes and deep copies `source` into `self`.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.root = source.root.clone();
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root()).finish()
    }
}

/// Two trees are equal when they have the same shape and hold equal elements at every position.
/// Trees holding the same elements in different shapes are *not* equal.
impl<T> PartialEq for Tree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl<T> Eq for Tree<T> where T: Eq {}

/// Writes the elements in ascending order, each followed by a space, then a newline.
impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_inorder(f)
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: Link(None) }
    }

    /// Generate a `Tree` holding exactly one node.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let tree = Tree::with_root("m");
    /// assert_eq!(tree.count(), 1);
    /// assert_eq!(tree.height(), 1);
    /// ```
    pub fn with_root(value: T) -> Self {
        Self {
            root: Link::leaf(value),
        }
    }

    /// Returns `true` if the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.root.0.is_none()
    }

    /// Drops every node in the tree. Children are always detached before their parent is freed
    /// and the teardown uses a heap allocated stack, so even a tree shaped like a linked list can
    /// be cleared without overflowing the call stack.
    pub fn clear(&mut self) {
        let mut stack: Vec<Box<Node<T>>> = self.root.take().0.into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take().0);
            stack.extend(node.right.take().0);
        }
    }

    /// The number of nodes on the longest path from the root to a leaf. An empty tree has height
    /// 0 and a tree with a single node has height 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.height(), 0);
    ///
    /// tree.extend(vec![2, 1, 3]);
    /// assert_eq!(tree.height(), 2);
    ///
    /// // Without rebalancing, ascending inserts grow a single long path.
    /// tree.extend(vec![4, 5, 6]);
    /// assert_eq!(tree.height(), 5);
    /// ```
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// The number of elements in the tree.
    pub fn count(&self) -> usize {
        self.root.count()
    }

    /// Removes every node that is a leaf when the call starts and returns how many were removed.
    /// A parent whose children are all removed by this call becomes a leaf but stays in the tree
    /// until the next call.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let mut tree: Tree<_> = vec![4, 2, 6, 1, 3, 5, 7].into_iter().collect();
    ///
    /// assert_eq!(tree.remove_leaves(), 4);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![2, 4, 6]);
    ///
    /// assert_eq!(tree.remove_leaves(), 2);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![4]);
    /// ```
    pub fn remove_leaves(&mut self) -> usize {
        self.root.remove_leaves()
    }

    /// Iterates over the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root())
    }

    /// Moves every element, in ascending order, to the end of `buf`, leaving the tree empty.
    /// Returns the number of elements moved.
    ///
    /// If `buf` doesn't have room for every element, nothing is moved and
    /// [`TreeError::CapacityExceeded`] is returned. Both the tree and `buf` are left as they were.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayvec::ArrayVec;
    /// use bintree::{Tree, TreeError};
    ///
    /// let mut tree: Tree<_> = vec![3, 1, 2].into_iter().collect();
    ///
    /// let mut small = ArrayVec::<i32, 2>::new();
    /// assert!(matches!(
    ///     tree.drain_sorted(&mut small),
    ///     Err(TreeError::CapacityExceeded { needed: 3, available: 2 })
    /// ));
    /// assert_eq!(tree.count(), 3);
    ///
    /// let mut buf = ArrayVec::<i32, 8>::new();
    /// assert_eq!(tree.drain_sorted(&mut buf).unwrap(), 3);
    /// assert_eq!(buf.as_slice(), &[1, 2, 3]);
    /// assert!(tree.is_empty());
    /// ```
    pub fn drain_sorted<const N: usize>(&mut self, buf: &mut ArrayVec<T, N>) -> Result<usize> {
        let needed = self.count();
        let available = buf.remaining_capacity();
        if needed > available {
            warn!(needed, available, "buffer too small to drain tree");
            return Err(TreeError::CapacityExceeded { needed, available });
        }

        self.root.take().drain_inorder(buf);
        trace!(drained = needed, "drained tree into sorted buffer");
        Ok(needed)
    }

    /// Consumes the tree, returning its elements in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.count());
        self.root.take().drain_inorder(&mut sorted);
        sorted
    }

    /// Writes the elements in ascending order to `sink`, each followed by a space, and finishes
    /// with a newline.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let tree: Tree<_> = vec!["m", "and", "z"].into_iter().collect();
    ///
    /// let mut out = String::new();
    /// tree.write_inorder(&mut out).unwrap();
    /// assert_eq!(out, "and m z \n");
    /// ```
    pub fn write_inorder<W>(&self, sink: &mut W) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
        T: fmt::Display,
    {
        for value in self {
            write!(sink, "{} ", value)?;
        }
        writeln!(sink)
    }

    /// Returns a value that displays the tree rotated 90° counter-clockwise: the root is at the
    /// left margin, right subtrees above and left subtrees below, with each level indented one
    /// step further.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let tree: Tree<_> = vec![2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.sideways().indent(2).to_string(), "  3\n2\n  1\n");
    /// ```
    pub fn sideways(&self) -> Sideways<'_, T> {
        Sideways {
            tree: self,
            indent: DEFAULT_INDENT,
        }
    }

    fn root(&self) -> Option<&Node<T>> {
        self.root.root()
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    /// Builds a tree of minimal height from elements given in ascending order. See
    /// [`Tree::rebuild_from_sorted`] for how the elements are placed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let tree = Tree::from_sorted(1..=7);
    /// assert_eq!(tree.height(), 3);
    /// assert_eq!(tree.node_height(&4), 3);
    /// ```
    pub fn from_sorted<I>(sorted: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut slots: Vec<Option<T>> = sorted.into_iter().map(Some).collect();
        let mut tree = Self::new();
        tree.insert_midpoints(&mut slots);
        tree
    }

    /// Inserts `value` into the tree. Returns `false`, leaving the tree as it was, when an equal
    /// element is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.count(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        match self.root.0 {
            Some(ref mut root) => root.insert(value),
            None => {
                self.root = Link::leaf(value);
                true
            }
        }
    }

    /// Potentially finds the element equal to `target` in this tree. If there is none, `None` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let tree = Tree::with_root(String::from("and"));
    ///
    /// assert_eq!(tree.retrieve(&"and".to_string()).map(String::as_str), Some("and"));
    /// assert_eq!(tree.retrieve(&"not".to_string()), None);
    /// ```
    pub fn retrieve(&self, target: &T) -> Option<&T> {
        self.root()
            .and_then(|n| n.find(target))
            .map(|n| &n.value)
    }

    /// Returns `true` if an element equal to `target` is in the tree.
    pub fn contains(&self, target: &T) -> bool {
        self.retrieve(target).is_some()
    }

    /// Removes the element equal to `target` from the tree and returns it. If the tree does not
    /// hold such an element, nothing happens and `None` is returned.
    ///
    /// A node with two children keeps its place in the tree: it takes the element of its in-order
    /// successor, and the successor's node is the one that gets freed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let mut tree: Tree<_> = vec![2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.erase(&2), Some(2));
    /// assert_eq!(tree.erase(&2), None);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    pub fn erase(&mut self, target: &T) -> Option<T> {
        self.root.erase(target)
    }

    /// The height of the subtree rooted at the node holding `target`, where a leaf has height 1.
    /// Returns 0 when `target` isn't in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::Tree;
    ///
    /// let tree: Tree<_> = vec![4, 2, 6, 1, 3, 5, 7].into_iter().collect();
    ///
    /// assert_eq!(tree.node_height(&4), 3);
    /// assert_eq!(tree.node_height(&2), 2);
    /// assert_eq!(tree.node_height(&1), 1);
    /// assert_eq!(tree.node_height(&42), 0);
    /// ```
    pub fn node_height(&self, target: &T) -> usize {
        self.root()
            .and_then(|n| n.find(target))
            .map_or(0, Node::height)
    }

    /// Replaces the contents of the tree with the elements of `buf`, which are expected in
    /// ascending order, leaving `buf` empty. Returns the number of elements inserted.
    ///
    /// The middle element of the buffer becomes the root, then the middles of the lower and upper
    /// halves become its children, and so on, so sorted input produces a tree of minimal height.
    /// Elements still go through [`Tree::insert`], so out of order input yields a valid (if less
    /// balanced) tree and duplicates are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayvec::ArrayVec;
    /// use bintree::Tree;
    ///
    /// // Ascending inserts give a tree as tall as it is long.
    /// let mut tree: Tree<_> = (1..=7).collect();
    /// assert_eq!(tree.height(), 7);
    ///
    /// let mut buf = ArrayVec::<i32, 16>::new();
    /// tree.drain_sorted(&mut buf).unwrap();
    /// assert_eq!(tree.rebuild_from_sorted(&mut buf), 7);
    ///
    /// assert!(buf.is_empty());
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn rebuild_from_sorted<const N: usize>(&mut self, buf: &mut ArrayVec<T, N>) -> usize {
        self.clear();
        let mut slots: Vec<Option<T>> = buf.drain(..).map(Some).collect();
        let inserted = self.insert_midpoints(&mut slots);
        trace!(inserted, "rebuilt tree from sorted buffer");
        inserted
    }

    /// Inserts the middle slot of `slots`, then recurses into the lower and upper halves.
    fn insert_midpoints(&mut self, slots: &mut [Option<T>]) -> usize {
        if slots.is_empty() {
            return 0;
        }

        // `(low + high) / 2` over the inclusive range `0..=len - 1`.
        let mid = (slots.len() - 1) / 2;
        let inserted = match slots[mid].take() {
            Some(value) => usize::from(self.insert(value)),
            None => 0,
        };
        let (lower, upper) = slots.split_at_mut(mid);

        inserted + self.insert_midpoints(lower) + self.insert_midpoints(&mut upper[1..])
    }
}

/// Inserts each element in turn. Duplicates are dropped.
impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the elements of a [`Tree`] in ascending order.
pub struct Iter<'a, T> {
    /// Nodes whose element and right subtree are yet to be visited. The top of the stack is the
    /// next element.
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: Option<&'a Node<T>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(&node.value)
    }
}

/// Displays a [`Tree`] sideways. Created by [`Tree::sideways`].
pub struct Sideways<'a, T> {
    tree: &'a Tree<T>,
    indent: usize,
}

impl<'a, T> Sideways<'a, T> {
    /// Sets how many spaces each level of the tree is indented by.
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }
}

impl<T> fmt::Display for Sideways<'_, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sideways(f, self.tree.root(), 0, self.indent)
    }
}

/// Right subtree, then this node, then the left subtree, so larger elements print higher up.
fn write_sideways<T>(
    f: &mut fmt::Formatter<'_>,
    node: Option<&Node<T>>,
    depth: usize,
    indent: usize,
) -> fmt::Result
where
    T: fmt::Display,
{
    let Some(node) = node else {
        return Ok(());
    };

    write_sideways(f, node.right(), depth + 1, indent)?;
    writeln!(
        f,
        "{:width$}{}",
        "",
        node.value,
        width = indent * depth
    )?;
    write_sideways(f, node.left(), depth + 1, indent)
}

/// An optional, exclusively owned child node.
struct Link<T>(Option<Box<Node<T>>>);

impl<T> Clone for Link<T>
where
    T: Clone,
{
    /// Deep copies the subtree in preorder: a node's element is cloned before its children are.
    fn clone(&self) -> Self {
        Link(self.root().map(|node| {
            Box::new(Node {
                value: node.value.clone(),
                left: node.left.clone(),
                right: node.right.clone(),
            })
        }))
    }
}

impl<T> PartialEq for Link<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self.root(), other.root()) {
            (None, None) => true,
            (Some(a), Some(b)) => a.value == b.value && a.left == b.left && a.right == b.right,
            _ => false,
        }
    }
}

impl<T> Link<T> {
    fn leaf(value: T) -> Self {
        Link(Some(Node::new_boxed(value)))
    }

    fn root(&self) -> Option<&Node<T>> {
        self.0.as_deref()
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    fn height(&self) -> usize {
        self.root().map_or(0, Node::height)
    }

    fn count(&self) -> usize {
        self.root()
            .map_or(0, |n| n.left.count() + n.right.count() + 1)
    }

    fn remove_leaves(&mut self) -> usize {
        let Some(node) = self.0.as_mut() else {
            return 0;
        };
        if node.is_leaf() {
            self.0 = None;
            return 1;
        }

        node.left.remove_leaves() + node.right.remove_leaves()
    }

    /// Moves the subtree's elements into `out` in ascending order.
    fn drain_inorder<E>(self, out: &mut E)
    where
        E: Extend<T>,
    {
        if let Some(node) = self.0 {
            let Node { value, left, right } = *node;
            left.drain_inorder(out);
            out.extend(Some(value));
            right.drain_inorder(out);
        }
    }

    fn erase(&mut self, target: &T) -> Option<T>
    where
        T: Ord,
    {
        let node = self.0.as_mut()?;
        match target.cmp(&node.value) {
            Ordering::Less => return node.left.erase(target),
            Ordering::Greater => return node.right.erase(target),
            Ordering::Equal => {}
        }

        let mut found = self.0.take().expect("Matched node is still linked");
        match (found.left.take(), found.right.take()) {
            (Link(None), Link(None)) => Some(found.value),
            (child, Link(None)) | (Link(None), child) => {
                *self = child;
                Some(found.value)
            }
            (left, mut right) => {
                // The successor is the leftmost node of the right subtree. Its element replaces
                // ours so `found` can stay where it is, and only the successor's node is freed.
                let successor = right
                    .take_min()
                    .expect("Non-empty right subtree has a minimum");
                let removed = mem::replace(&mut found.value, successor);
                found.left = left;
                found.right = right;
                self.0 = Some(found);
                Some(removed)
            }
        }
    }

    /// Unlinks the leftmost node of this subtree, splicing its right child into its place, and
    /// returns its element.
    fn take_min(&mut self) -> Option<T> {
        let node = self.0.as_mut()?;
        if node.left.0.is_some() {
            return node.left.take_min();
        }

        let min = self.0.take()?;
        let Node { value, right, .. } = *min;
        *self = right;
        Some(value)
    }
}

struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            left: Link(None),
            right: Link(None),
        })
    }

    fn left(&self) -> Option<&Self> {
        self.left.root()
    }

    fn right(&self) -> Option<&Self> {
        self.right.root()
    }

    fn is_leaf(&self) -> bool {
        self.left.0.is_none() && self.right.0.is_none()
    }

    /// Height of the subtree rooted here, counting this node as 1. This is unrelated to how deep
    /// the node sits in the tree.
    fn height(&self) -> usize {
        self.left.height().max(self.right.height()) + 1
    }

    fn find(&self, target: &T) -> Option<&Self>
    where
        T: Ord,
    {
        match target.cmp(&self.value) {
            Ordering::Less => self.left().and_then(|n| n.find(target)),
            Ordering::Equal => Some(self),
            Ordering::Greater => self.right().and_then(|n| n.find(target)),
        }
    }

    fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        let inserted = match value.cmp(&self.value) {
            Ordering::Less => match self.left.0 {
                Some(ref mut left) => left.insert(value),
                None => {
                    self.left = Link::leaf(value);
                    true
                }
            },
            Ordering::Equal => false,
            Ordering::Greater => match self.right.0 {
                Some(ref mut right) => right.insert(value),
                None => {
                    self.right = Link::leaf(value);
                    true
                }
            },
        };

        if cfg!(debug_assertions) {
            if let Some(left) = self.left() {
                assert!(self.value > left.value);
            }
            if let Some(right) = self.right() {
                assert!(self.value < right.value);
            }
        }
        inserted
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a `BTreeSet`, checking they agree on every step.
    fn do_ops(ops: &[Op<i8>], tree: &mut Tree<i8>, set: &mut BTreeSet<i8>) {
        for op in ops {
            match op {
                Op::Insert(x) => assert_eq!(tree.insert(*x), set.insert(*x)),
                Op::Erase(x) => assert_eq!(tree.erase(x), set.take(x)),
                Op::Iter => assert!(tree.iter().eq(set.iter())),
                Op::Rebuild => {
                    // 256 slots fit every distinct `i8`.
                    let mut buf = ArrayVec::<i8, 256>::new();
                    assert_eq!(tree.drain_sorted(&mut buf).unwrap(), set.len());
                    assert_eq!(tree.rebuild_from_sorted(&mut buf), set.len());
                }
            }
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = Tree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set);
            tree.count() == set.len()
                && tree.iter().eq(set.iter())
                && set.iter().all(|x| tree.retrieve(x) == Some(x))
        }
    }

    quickcheck::quickcheck! {
        fn erase_removes_exactly_one(xs: Vec<i8>, target: i8) -> bool {
            let mut tree: Tree<_> = xs.into_iter().collect();
            let before = tree.count();
            let present = tree.contains(&target);

            let erased = tree.erase(&target);
            let ordered = tree.iter().zip(tree.iter().skip(1)).all(|(a, b)| a < b);
            ordered
                && erased.is_some() == present
                && tree.count() == before - present as usize
                && !tree.contains(&target)
        }
    }
}
