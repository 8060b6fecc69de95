//! Bulk building a [`Tree`] from whitespace separated text.
//!
//! Each token is parsed into an element and inserted. A build stops at a sentinel token (`$$`
//! unless configured otherwise) or at the end of the input. Tokens after the sentinel are left
//! unread, so a single reader can feed several builds in a row.
//!
//! # Examples
//!
//! ```
//! use bintree::build::{build_tree, BuildConfig, Tokens};
//! use bintree::Tree;
//!
//! let input = "iii not tttt eee r not $$\nm a $$\n";
//! let mut tokens = Tokens::new(input.as_bytes());
//! let config = BuildConfig::default();
//!
//! let mut first: Tree<String> = Tree::new();
//! let summary = build_tree(&mut first, &mut tokens, &config).unwrap();
//! assert_eq!(summary.inserted, 5);
//! assert_eq!(summary.duplicates, 1);
//! assert!(summary.hit_sentinel);
//! assert_eq!(first.to_string(), "eee iii not r tttt \n");
//!
//! let mut second: Tree<String> = Tree::new();
//! build_tree(&mut second, &mut tokens, &config).unwrap();
//! assert_eq!(second.to_string(), "a m \n");
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, TreeError};
use crate::tree::Tree;

/// The token that ends a build unless [`BuildConfig::sentinel`] says otherwise.
pub const DEFAULT_SENTINEL: &str = "$$";

/// Options for [`build_tree`].
#[derive(Clone, Debug)]
pub struct BuildConfig {
    sentinel: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            sentinel: Some(DEFAULT_SENTINEL.to_string()),
        }
    }
}

impl BuildConfig {
    /// Stop building when `token` is read. The sentinel itself is never inserted.
    pub fn sentinel(mut self, token: impl Into<String>) -> Self {
        self.sentinel = Some(token.into());
        self
    }

    /// Don't look for a sentinel; build from every remaining token.
    pub fn until_end(mut self) -> Self {
        self.sentinel = None;
        self
    }

    fn is_sentinel(&self, token: &str) -> bool {
        self.sentinel.as_deref() == Some(token)
    }
}

/// What a call to [`build_tree`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Tokens inserted into the tree.
    pub inserted: usize,
    /// Tokens dropped because an equal element was already in the tree.
    pub duplicates: usize,
    /// Whether the build stopped at the sentinel rather than at the end of the input.
    pub hit_sentinel: bool,
}

/// Splits a reader into whitespace separated tokens, one line at a time.
pub struct Tokens<R> {
    reader: R,
    line: String,
    pending: VecDeque<String>,
}

impl<R> Tokens<R>
where
    R: BufRead,
{
    /// Reads tokens from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<R> Iterator for Tokens<R>
where
    R: BufRead,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }

            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => self
                    .pending
                    .extend(self.line.split_whitespace().map(String::from)),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Parses and inserts tokens into `tree` until the configured sentinel or the end of `tokens`.
///
/// Duplicates are dropped and counted without ending the build. A token that doesn't parse as
/// `T`, or a failed read, ends the build with an error; elements inserted before it stay in the
/// tree.
pub fn build_tree<T, I>(
    tree: &mut Tree<T>,
    tokens: &mut I,
    config: &BuildConfig,
) -> Result<BuildSummary>
where
    T: Ord + FromStr,
    T::Err: fmt::Display,
    I: Iterator<Item = io::Result<String>>,
{
    let mut summary = BuildSummary::default();
    for token in tokens {
        let token = token?;
        if config.is_sentinel(&token) {
            summary.hit_sentinel = true;
            break;
        }

        let value = token.parse::<T>().map_err(|e| TreeError::Parse {
            token: token.clone(),
            reason: e.to_string(),
        })?;
        if tree.insert(value) {
            summary.inserted += 1;
        } else {
            debug!(%token, "dropping duplicate token");
            summary.duplicates += 1;
        }
    }

    debug!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        hit_sentinel = summary.hit_sentinel,
        "finished building tree"
    );
    Ok(summary)
}
