//! Round-trip traversal checks for reconstructed trees

use std::fmt;

use tracing::debug;

use super::builder::TreeError;
use super::node::{BinaryTree, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    InOrder,
    PostOrder,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalOrder::InOrder => write!(f, "in-order"),
            TraversalOrder::PostOrder => write!(f, "post-order"),
        }
    }
}

/// Why two traversals cannot describe the same tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// A recomputed traversal differs from the input at `position`.
    /// `None` on either side means that sequence ended early.
    Sequence {
        order: TraversalOrder,
        position: usize,
        expected: Option<i32>,
        found: Option<i32>,
    },
    /// A subtree root lies outside the in-order range its subtree occupies
    Partition { value: i32, start: usize, end: usize },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Sequence {
                order,
                position,
                expected,
                found,
            } => write!(
                f,
                "{} traversal differs at position {}: expected {}, found {}",
                order,
                position,
                describe(*expected),
                describe(*found)
            ),
            Mismatch::Partition { value, start, end } => write!(
                f,
                "value {} is not within in-order positions {}..={}",
                value, start, end
            ),
        }
    }
}

fn describe(value: Option<i32>) -> String {
    value.map_or_else(|| "end of sequence".to_string(), |v| v.to_string())
}

/// Append the in-order traversal of `tree` to `out`, returning the number of values written
pub fn fill_inorder(tree: &BinaryTree, out: &mut Vec<i32>) -> usize {
    let before = out.len();
    let nodes = tree.nodes();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut current = tree.root_id();

    loop {
        while let Some(id) = current {
            stack.push(id);
            current = nodes[id.index()].left;
        }
        let Some(id) = stack.pop() else {
            break;
        };
        out.push(nodes[id.index()].value);
        current = nodes[id.index()].right;
    }

    out.len() - before
}

/// Append the post-order traversal of `tree` to `out`, returning the number of values written
pub fn fill_postorder(tree: &BinaryTree, out: &mut Vec<i32>) -> usize {
    let before = out.len();
    let nodes = tree.nodes();
    let mut stack: Vec<NodeId> = tree.root_id().into_iter().collect();

    // Node, right, left is post-order backwards
    while let Some(id) = stack.pop() {
        let node = &nodes[id.index()];
        out.push(node.value);
        stack.extend(node.left);
        stack.extend(node.right);
    }
    out[before..].reverse();

    out.len() - before
}

/// Compare a recomputed traversal against the input it should reproduce
pub fn compare(order: TraversalOrder, expected: &[i32], produced: &[i32]) -> Result<(), Mismatch> {
    let len = expected.len().max(produced.len());

    for position in 0..len {
        let want = expected.get(position).copied();
        let got = produced.get(position).copied();
        if want != got {
            return Err(Mismatch::Sequence {
                order,
                position,
                expected: want,
                found: got,
            });
        }
    }

    Ok(())
}

/// Both recomputed traversals of a tree and the first way they differ from
/// the inputs, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    pub inorder: Vec<i32>,
    pub postorder: Vec<i32>,
    pub mismatch: Option<Mismatch>,
}

/// Re-walk `tree` and compare both traversals against the inputs.
/// The in-order comparison is reported first.
pub fn round_trip(tree: &BinaryTree, inorder: &[i32], postorder: &[i32]) -> RoundTrip {
    let mut recomputed_in = Vec::with_capacity(inorder.len());
    let mut recomputed_post = Vec::with_capacity(postorder.len());

    let written = fill_inorder(tree, &mut recomputed_in);
    debug!(written, "recomputed in-order traversal");
    let written = fill_postorder(tree, &mut recomputed_post);
    debug!(written, "recomputed post-order traversal");

    let mismatch = compare(TraversalOrder::InOrder, inorder, &recomputed_in)
        .and_then(|()| compare(TraversalOrder::PostOrder, postorder, &recomputed_post))
        .err();

    RoundTrip {
        inorder: recomputed_in,
        postorder: recomputed_post,
        mismatch,
    }
}

/// Check that `tree` traverses back to exactly the given sequences
pub fn validate(tree: &BinaryTree, inorder: &[i32], postorder: &[i32]) -> Result<(), TreeError> {
    match round_trip(tree, inorder, postorder).mismatch {
        None => Ok(()),
        Some(mismatch) => Err(TreeError::TraversalMismatch(mismatch)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Side;

    fn sample() -> BinaryTree {
        //     1
        //    / \
        //   2   3
        //  /
        // 4
        let mut tree = BinaryTree::new();
        let root = tree.insert(1, None);
        let two = tree.insert(2, Some((root, Side::Left)));
        tree.insert(3, Some((root, Side::Right)));
        tree.insert(4, Some((two, Side::Left)));
        tree
    }

    #[test]
    fn test_fill_appends_and_counts() {
        let tree = sample();
        let mut out = vec![100];

        assert_eq!(fill_inorder(&tree, &mut out), 4);
        assert_eq!(out, vec![100, 4, 2, 1, 3]);

        assert_eq!(fill_postorder(&tree, &mut out), 4);
        assert_eq!(out, vec![100, 4, 2, 1, 3, 4, 2, 3, 1]);
    }

    #[test]
    fn test_postorder_visits_right_subtree_before_root() {
        let mut tree = BinaryTree::new();
        let root = tree.insert(5, None);
        let seven = tree.insert(7, Some((root, Side::Right)));
        tree.insert(6, Some((seven, Side::Left)));
        tree.insert(8, Some((seven, Side::Right)));

        assert_eq!(tree.postorder(), vec![6, 8, 7, 5]);
        assert_eq!(tree.inorder(), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_round_trip_returns_recomputed_sequences() {
        let result = round_trip(&sample(), &[4, 2, 1, 3], &[4, 2, 3, 1]);
        assert_eq!(result.inorder, vec![4, 2, 1, 3]);
        assert_eq!(result.postorder, vec![4, 2, 3, 1]);
        assert_eq!(result.mismatch, None);

        let result = round_trip(&sample(), &[4, 2, 3, 1], &[4, 2, 3, 1]);
        assert!(matches!(
            result.mismatch,
            Some(Mismatch::Sequence {
                order: TraversalOrder::InOrder,
                position: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_traversals_of_deep_chain() {
        let mut tree = BinaryTree::new();
        let mut parent = tree.insert(0, None);
        for value in 1..100_000 {
            parent = tree.insert(value, Some((parent, Side::Right)));
        }

        let expected: Vec<i32> = (0..100_000).collect();
        let reversed: Vec<i32> = expected.iter().rev().copied().collect();
        assert_eq!(tree.inorder(), expected);
        assert_eq!(tree.postorder(), reversed);
        assert_eq!(validate(&tree, &expected, &reversed), Ok(()));
    }

    #[test]
    fn test_validate_accepts_matching_traversals() {
        assert_eq!(validate(&sample(), &[4, 2, 1, 3], &[4, 2, 3, 1]), Ok(()));
    }

    #[test]
    fn test_validate_reports_first_difference() {
        let err = validate(&sample(), &[4, 2, 1, 3], &[4, 3, 2, 1]).unwrap_err();
        assert_eq!(
            err,
            TreeError::TraversalMismatch(Mismatch::Sequence {
                order: TraversalOrder::PostOrder,
                position: 1,
                expected: Some(3),
                found: Some(2),
            })
        );
    }

    #[test]
    fn test_compare_length_difference() {
        let err = compare(TraversalOrder::InOrder, &[1, 2, 3], &[1, 2]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "in-order traversal differs at position 2: expected 3, found end of sequence"
        );
    }

    #[test]
    fn test_partition_message() {
        let mismatch = Mismatch::Partition {
            value: 2,
            start: 0,
            end: 0,
        };
        assert_eq!(
            mismatch.to_string(),
            "value 2 is not within in-order positions 0..=0"
        );
    }
}
