//! Binary tree reconstruction from in-order and post-order traversals

use std::ops::Range;

use thiserror::Error;
use tracing::{debug, trace};

use super::index::{self, PositionIndex};
use super::node::{BinaryTree, NodeId, Side};
use super::validator::Mismatch;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error(
        "traversal lengths differ: in-order has {inorder} values, post-order has {postorder}"
    )]
    LengthMismatch { inorder: usize, postorder: usize },

    #[error(
        "value {value} (post-order position {position}) does not appear in the in-order traversal"
    )]
    ValueNotFound { value: i32, position: usize },

    #[error("no common tree exists for these traversals: {0}")]
    TraversalMismatch(Mismatch),
}

/// A subtree still to be built: matching slices of both traversals and the
/// slot its root goes into
struct Pending {
    in_range: Range<usize>,
    post_range: Range<usize>,
    parent: Option<(NodeId, Side)>,
}

/// Rebuilds a binary tree by repeatedly splitting both traversals around
/// the root taken from the end of the post-order range.
pub struct TreeBuilder<'a> {
    postorder: &'a [i32],
    positions: PositionIndex,
}

impl<'a> TreeBuilder<'a> {
    /// Build the tree whose in-order and post-order traversals are the given sequences
    pub fn build(inorder: &'a [i32], postorder: &'a [i32]) -> Result<BinaryTree, TreeError> {
        if inorder.len() != postorder.len() {
            return Err(TreeError::LengthMismatch {
                inorder: inorder.len(),
                postorder: postorder.len(),
            });
        }

        let Some(&root_value) = postorder.last() else {
            debug!("empty traversals, building empty tree");
            return Ok(BinaryTree::new());
        };

        // The claimed root has to exist somewhere before we start splitting
        if index::search(inorder, 0, inorder.len() - 1, root_value).is_none() {
            return Err(TreeError::ValueNotFound {
                value: root_value,
                position: postorder.len() - 1,
            });
        }

        debug!(nodes = inorder.len(), root = root_value, "building tree");

        let builder = Self {
            postorder,
            positions: PositionIndex::new(inorder),
        };
        builder.build_all(inorder.len())
    }

    fn build_all(&self, len: usize) -> Result<BinaryTree, TreeError> {
        let mut tree = BinaryTree::new();
        let mut pending = vec![Pending {
            in_range: 0..len,
            post_range: 0..len,
            parent: None,
        }];

        while let Some(Pending {
            in_range,
            post_range,
            parent,
        }) = pending.pop()
        {
            debug_assert_eq!(in_range.len(), post_range.len());

            if in_range.is_empty() {
                continue;
            }

            let root_pos = post_range.end - 1;
            let value = self.postorder[root_pos];
            let split = self.locate(value, root_pos, &in_range)?;
            let left_len = split - in_range.start;

            trace!(
                value,
                split,
                left = left_len,
                right = in_range.end - split - 1,
                "split subtree"
            );

            let id = tree.insert(value, parent);

            // Left is pushed last so it is built first
            pending.push(Pending {
                in_range: split + 1..in_range.end,
                post_range: post_range.start + left_len..root_pos,
                parent: Some((id, Side::Right)),
            });
            pending.push(Pending {
                in_range: in_range.start..split,
                post_range: post_range.start..post_range.start + left_len,
                parent: Some((id, Side::Left)),
            });
        }

        Ok(tree)
    }

    /// Position of `value` inside the current in-order range
    fn locate(
        &self,
        value: i32,
        root_pos: usize,
        in_range: &Range<usize>,
    ) -> Result<usize, TreeError> {
        let (start, end) = (in_range.start, in_range.end - 1);

        if let Some(split) = self.positions.first_in(value, start, end) {
            return Ok(split);
        }

        // Present elsewhere means the two traversals disagree on structure
        if self.positions.contains(value) {
            Err(TreeError::TraversalMismatch(Mismatch::Partition {
                value,
                start,
                end,
            }))
        } else {
            Err(TreeError::ValueNotFound {
                value,
                position: root_pos,
            })
        }
    }
}
