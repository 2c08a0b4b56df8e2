//! Tree reconstruction module

mod builder;
mod index;
mod node;
mod validator;

pub use builder::{TreeBuilder, TreeError};
pub use index::{search, PositionIndex};
pub use node::{BinaryNode, BinaryTree, NodeId, NodeRef, Side};
pub use validator::{
    compare, fill_inorder, fill_postorder, round_trip, validate, Mismatch, RoundTrip,
    TraversalOrder,
};

use tracing::warn;

/// Outcome of rebuilding a tree and re-walking it against its inputs
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub tree: BinaryTree,
    pub inorder: Vec<i32>,
    pub postorder: Vec<i32>,
    pub mismatch: Option<Mismatch>,
}

impl Reconstruction {
    /// True when both recomputed traversals equal the inputs
    pub fn is_consistent(&self) -> bool {
        self.mismatch.is_none()
    }

    /// The tree, or the round-trip failure that makes it untrustworthy
    pub fn into_verified(self) -> Result<BinaryTree, TreeError> {
        match self.mismatch {
            None => Ok(self.tree),
            Some(mismatch) => Err(TreeError::TraversalMismatch(mismatch)),
        }
    }
}

/// Build a tree from the two traversals and validate it by round trip.
///
/// Length mismatches and values missing from the in-order range abort
/// construction. A tree that builds but does not reproduce its inputs is
/// returned flagged with the mismatch.
pub fn reconstruct(inorder: &[i32], postorder: &[i32]) -> Result<Reconstruction, TreeError> {
    let tree = TreeBuilder::build(inorder, postorder)?;
    let RoundTrip {
        inorder,
        postorder,
        mismatch,
    } = round_trip(&tree, inorder, postorder);

    if let Some(mismatch) = &mismatch {
        warn!(%mismatch, "reconstructed tree does not reproduce its traversals");
    }

    Ok(Reconstruction {
        tree,
        inorder,
        postorder,
        mismatch,
    })
}
