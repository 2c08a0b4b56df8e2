//! Arena-backed binary tree
//!
//! Nodes live in one `Vec` and point at their children by index. A parent is
//! always inserted before its children, so every child id is greater than
//! its parent's. Dropping the tree is a flat `Vec` drop however deep it is.

use std::fmt;

use super::validator;

/// Index of a node within its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which child slot of a parent a node occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Node storage: a value plus child links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryNode {
    pub value: i32,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// A binary tree built once and read thereafter
#[derive(Debug, Clone, Default)]
pub struct BinaryTree {
    nodes: Vec<BinaryNode>,
    root: Option<NodeId>,
}

impl BinaryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. With no parent it becomes the root; otherwise it is
    /// linked into the given child slot of `parent`, replacing any previous
    /// link in that slot.
    pub fn insert(&mut self, value: i32, parent: Option<(NodeId, Side)>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(BinaryNode {
            value,
            left: None,
            right: None,
        });

        match parent {
            None => self.root = Some(id),
            Some((parent_id, side)) => {
                let parent = &mut self.nodes[parent_id.0];
                match side {
                    Side::Left => parent.left = Some(id),
                    Side::Right => parent.right = Some(id),
                }
            }
        }

        id
    }

    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| self.node(id))
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// All nodes, indexed by `NodeId::index`
    pub fn nodes(&self) -> &[BinaryNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes reachable from the root
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();

        while let Some(id) = stack.pop() {
            count += 1;
            let node = &self.nodes[id.0];
            stack.extend(node.left);
            stack.extend(node.right);
        }

        count
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();

        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let node = &self.nodes[id.0];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }

        max_depth
    }

    pub fn inorder(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.nodes.len());
        validator::fill_inorder(self, &mut out);
        out
    }

    pub fn postorder(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.nodes.len());
        validator::fill_postorder(self, &mut out);
        out
    }
}

/// Trees are equal when they have the same shape and values, whatever
/// order their nodes were inserted in.
impl PartialEq for BinaryTree {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root(), other.root())];

        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    if a.value() != b.value() {
                        return false;
                    }
                    stack.push((a.left(), b.left()));
                    stack.push((a.right(), b.right()));
                }
                _ => return false,
            }
        }

        true
    }
}

impl Eq for BinaryTree {}

/// Borrowed view of one node
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a BinaryTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> i32 {
        self.tree.nodes[self.id.0].value
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.tree.nodes[self.id.0].left.map(|id| self.tree.node(id))
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.tree.nodes[self.id.0].right.map(|id| self.tree.node(id))
    }

    pub fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_len_and_depth() {
        let tree = sample();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 3);
        assert!(!tree.root().unwrap().is_leaf());
        assert_eq!(tree.root().unwrap().left().unwrap().value(), 2);
    }

    #[test]
    fn test_empty_tree() {
        let tree = BinaryTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert!(tree.inorder().is_empty());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let mut other = BinaryTree::new();
        let root = other.insert(1, None);
        other.insert(3, Some((root, Side::Right)));
        let two = other.insert(2, Some((root, Side::Left)));
        other.insert(4, Some((two, Side::Left)));

        assert_eq!(sample(), other);

        let mut mirrored = BinaryTree::new();
        let root = mirrored.insert(1, None);
        let two = mirrored.insert(2, Some((root, Side::Left)));
        mirrored.insert(3, Some((root, Side::Right)));
        mirrored.insert(4, Some((two, Side::Right)));

        assert_ne!(sample(), mirrored);
    }

    #[test]
    fn test_deep_chain_len_depth_and_drop() {
        let mut tree = BinaryTree::new();
        let mut parent = tree.insert(0, None);
        for value in 1..200_000 {
            parent = tree.insert(value, Some((parent, Side::Left)));
        }

        assert_eq!(tree.len(), 200_000);
        assert_eq!(tree.depth(), 200_000);
        drop(tree);
    }
}
