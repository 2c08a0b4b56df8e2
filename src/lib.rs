//! Rebuild binary trees from in-order and post-order traversals, check that
//! the two traversals agree, and draw the result as ASCII art.

pub mod cases;
pub mod cli;
pub mod output;
pub mod tree;
