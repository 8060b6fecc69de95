use arrayvec::ArrayVec;
use bintree::Tree;
use quickcheck_macros::quickcheck;

use std::collections::{BTreeSet, HashSet};

/// Enough slots for every distinct `i8`.
type Buffer = ArrayVec<i8, 256>;

fn build(xs: &[i8]) -> Tree<i8> {
    xs.iter().copied().collect()
}

/// `⌈lg(n + 1)⌉`, the height of a tree of `n` nodes with every level but the last full.
fn minimal_height(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

#[quickcheck]
fn inorder_is_strictly_ascending(xs: Vec<i8>) -> bool {
    let tree = build(&xs);
    let values: Vec<_> = tree.iter().collect();

    values.windows(2).all(|pair| pair[0] < pair[1])
}

#[quickcheck]
fn matches_sorted_set(xs: Vec<i8>) -> bool {
    let tree = build(&xs);
    let set: BTreeSet<_> = xs.into_iter().collect();

    tree.count() == set.len() && tree.into_sorted_vec() == set.into_iter().collect::<Vec<_>>()
}

#[quickcheck]
fn duplicates_are_rejected(xs: Vec<i8>) -> bool {
    let mut tree = build(&xs);
    let count = tree.count();
    let before = tree.clone();

    xs.iter().all(|x| !tree.insert(*x)) && tree.count() == count && tree == before
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    xs.iter().all(|x| tree.retrieve(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree = build(&xs);
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.retrieve(x).is_none() && tree.node_height(x) == 0)
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = build(&xs);
    let mut count = tree.count();
    for delete in &deletes {
        if tree.erase(delete).is_some() {
            count -= 1;
        }
        if tree.count() != count {
            return false;
        }
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| tree.retrieve(x).is_none())
        && still_present.iter().all(|x| tree.retrieve(x).is_some())
        && tree.iter().zip(tree.iter().skip(1)).all(|(a, b)| a < b)
}

#[quickcheck]
fn round_trip_keeps_elements_and_balances(xs: Vec<i8>) -> bool {
    let mut tree = build(&xs);
    let before: Vec<i8> = tree.iter().copied().collect();

    let mut buf = Buffer::new();
    let drained = tree.drain_sorted(&mut buf).unwrap();
    let flattened = tree.is_empty() && buf.as_slice() == &before[..];

    let rebuilt = tree.rebuild_from_sorted(&mut buf);
    flattened
        && drained == before.len()
        && rebuilt == before.len()
        && buf.is_empty()
        && tree.iter().copied().eq(before.into_iter())
        && tree.height() == minimal_height(rebuilt)
}

#[quickcheck]
fn undersized_buffer_is_rejected(xs: Vec<i8>) -> bool {
    let mut tree = build(&xs);
    if tree.is_empty() {
        return true;
    }
    let before = tree.clone();

    let mut buf = ArrayVec::<i8, 256>::new();
    for _ in 0..(buf.capacity() - tree.count() + 1) {
        buf.push(0);
    }
    let filled = buf.len();

    tree.drain_sorted(&mut buf).is_err() && tree == before && buf.len() == filled
}

#[quickcheck]
fn equality_is_reflexive(xs: Vec<i8>) -> bool {
    let tree = build(&xs);
    let copy = tree.clone();

    tree.eq(&tree) && tree == copy && copy == tree
}

#[quickcheck]
fn remove_leaves_keeps_internal_nodes(xs: Vec<i8>) -> bool {
    let mut tree = build(&xs);
    let internal: Vec<i8> = tree
        .iter()
        .copied()
        .filter(|x| tree.node_height(x) > 1)
        .collect();

    let removed = tree.remove_leaves();
    removed == xs.iter().collect::<HashSet<_>>().len() - internal.len()
        && tree.iter().copied().eq(internal.into_iter())
}

#[quickcheck]
fn sideways_prints_one_line_per_node(xs: Vec<i8>) -> bool {
    let tree = build(&xs);
    let rendered = tree.sideways().to_string();

    let descending: Vec<&i8> = tree.iter().collect::<Vec<_>>().into_iter().rev().collect();

    rendered.lines().count() == tree.count()
        && rendered
            .lines()
            .zip(descending)
            .all(|(line, x)| line.trim() == x.to_string())
}
