//! This crate exposes an ordered, owning Binary Search Tree (BST) container along with the
//! routines to flatten it into a sorted buffer, rebuild it balanced, and build it in bulk from
//! text.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for values in the tree takes `O(height)`, where `height` is the number of nodes on
//! the longest path from the root `Node` to a leaf `Node`. [`Tree`] does not rebalance itself, so
//! inserting already sorted values gives a tree as tall as it has elements. A lopsided tree can be
//! flattened with [`Tree::drain_sorted`] and rebuilt with [`Tree::rebuild_from_sorted`], which
//! limits the height to `⌈lg(N + 1)⌉`.
//!
//! # Examples
//!
//! ```
//! use arrayvec::ArrayVec;
//! use bintree::Tree;
//!
//! let mut tree: Tree<_> = (1..=7).collect();
//! assert_eq!(tree.height(), 7);
//!
//! let mut buf = ArrayVec::<_, 7>::new();
//! tree.drain_sorted(&mut buf).unwrap();
//! tree.rebuild_from_sorted(&mut buf);
//!
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.to_string(), "1 2 3 4 5 6 7 \n");
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod build;
mod error;
pub mod tree;

#[cfg(test)]
mod test;

pub use error::{Result, TreeError};
pub use tree::Tree;
