//! Property tests run against the public API of the crate.

mod tree;
