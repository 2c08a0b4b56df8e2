//! Common test utilities

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use proptest::prelude::*;
use treeweave::tree::{BinaryTree, Side};

/// Get the path to the testdata directory
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Run the treeweave binary with the given arguments
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treeweave"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run treeweave")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Tree shape without values
#[derive(Debug, Clone)]
pub struct Shape {
    left: Option<Box<Shape>>,
    right: Option<Box<Shape>>,
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = Just(Shape {
        left: None,
        right: None,
    });
    leaf.prop_recursive(8, 128, 2, |inner| {
        (
            proptest::option::of(inner.clone()),
            proptest::option::of(inner),
        )
            .prop_map(|(left, right)| Shape {
                left: left.map(Box::new),
                right: right.map(Box::new),
            })
    })
}

/// Fill a shape with values in pre-order, each `stride` apart
fn relabel(shape: &Shape, offset: i32, stride: i32) -> BinaryTree {
    let mut tree = BinaryTree::new();
    let mut next = offset;
    let mut stack = vec![(shape, None)];

    while let Some((shape, parent)) = stack.pop() {
        let id = tree.insert(next, parent);
        next += stride;
        if let Some(right) = shape.right.as_deref() {
            stack.push((right, Some((id, Side::Right))));
        }
        if let Some(left) = shape.left.as_deref() {
            stack.push((left, Some((id, Side::Left))));
        }
    }

    tree
}

/// Random tree shapes with distinct values
pub fn arb_unique_tree() -> impl Strategy<Value = BinaryTree> {
    (arb_shape(), -500i32..500, 1i32..7)
        .prop_map(|(shape, offset, stride)| relabel(&shape, offset, stride))
}

/// A chain of `len` nodes where every node is its parent's left child.
/// Returns the tree with its in-order and post-order traversals.
pub fn left_chain(len: i32) -> (BinaryTree, Vec<i32>, Vec<i32>) {
    let values: Vec<i32> = (1..=len).collect();
    let mut tree = BinaryTree::new();
    let mut parent = None;
    for &value in values.iter().rev() {
        parent = Some((tree.insert(value, parent), Side::Left));
    }
    (tree, values.clone(), values)
}
