//! ASCII diagram rendering
//!
//! Layout runs in two passes over a flat copy of the tree that shares its
//! node ids. The first pass walks ids from last to first, so children are
//! finished before their parents, and gives every node an edge length (rows
//! of `/` and `\` under it) just long enough that the right profile of its
//! left subtree and the left profile of its right subtree stay `gap` columns
//! apart. The second pass walks the tree once, top-down, appending labels and
//! edges to per-row writers that track the next free column.
//!
//! Nothing below `max_height` rows is swept or printed, so profile storage
//! and output size follow the ceiling, not the depth of the tree.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tree::BinaryTree;

pub const DEFAULT_GAP: i32 = 3;
pub const DEFAULT_MAX_HEIGHT: usize = 1000;

/// Largest accepted sibling gap. Wider values are clamped.
pub const MAX_GAP: i32 = 100;

/// Sentinel for profile rows no label has reached yet
const INFINITY: i64 = i64::MAX / 4;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Tunables for the diagram layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Minimum horizontal distance between sibling subtrees, `0..=MAX_GAP`
    pub gap: i32,
    /// Rows drawn before the diagram is cut off
    pub max_height: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

/// Render a tree and write the diagram to a file
pub fn render_tree(
    tree: &BinaryTree,
    options: &RenderOptions,
    output_path: &Path,
) -> Result<(), OutputError> {
    let content = render_to_string(tree, options);

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(output_path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Render a tree to a multi-line ASCII diagram, one `\n`-terminated line per row
pub fn render_to_string(tree: &BinaryTree, options: &RenderOptions) -> String {
    let Some(root) = tree.root_id() else {
        return String::new();
    };
    let root = root.index();

    let mut layout = build_layout(tree);
    let mut ctx = RenderContext::new(options);
    ctx.compute_edge_lengths(&mut layout);

    let height = layout[root].height;
    let rows = height.min(ctx.max_height);

    ctx.reset_left_profile(rows);
    ctx.compute_left_profile(&layout, root, rows);
    let xmin = ctx.left_profile[..rows].iter().copied().fold(0, i64::min);

    debug!(height, rows, xmin, "rendering tree");

    let mut output = String::new();
    for writer in print_rows(&layout, root, -xmin, rows) {
        output.push_str(&writer.line);
        output.push('\n');
    }

    if height > ctx.max_height {
        warn!(
            height,
            max_height = ctx.max_height,
            "tree is taller than the rendering ceiling"
        );
        output.push_str(&format!(
            "(This tree is taller than {}, and may be drawn incorrectly.)\n",
            ctx.max_height
        ));
    }

    output
}

/// Which side of its parent a node hangs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Root,
    Right,
}

#[derive(Debug)]
struct LayoutNode {
    label: String,
    edge_length: usize,
    height: usize,
    direction: Direction,
    left: Option<usize>,
    right: Option<usize>,
}

impl LayoutNode {
    fn label_len(&self) -> i64 {
        self.label.len() as i64
    }

    /// Label columns to the left of the node's x coordinate.
    /// Left children round toward their parent.
    fn left_extent(&self) -> i64 {
        let is_left = i64::from(self.direction == Direction::Left);
        (self.label_len() - is_left) / 2
    }

    fn right_extent(&self) -> i64 {
        let not_left = i64::from(self.direction != Direction::Left);
        (self.label_len() - not_left) / 2
    }

    fn child_offset(&self) -> i64 {
        self.edge_length as i64 + 1
    }
}

/// Copy the tree into layout nodes indexed like `tree.nodes()`
fn build_layout(tree: &BinaryTree) -> Vec<LayoutNode> {
    let mut layout: Vec<LayoutNode> = tree
        .nodes()
        .iter()
        .map(|node| LayoutNode {
            label: node.value.to_string(),
            edge_length: 0,
            height: 0,
            direction: Direction::Root,
            left: node.left.map(|id| id.index()),
            right: node.right.map(|id| id.index()),
        })
        .collect();

    for index in 0..layout.len() {
        if let Some(left) = layout[index].left {
            layout[left].direction = Direction::Left;
        }
        if let Some(right) = layout[index].right {
            layout[right].direction = Direction::Right;
        }
    }

    layout
}

/// Profile scratch space, owned by a single render call and grown only as
/// far as the rows actually compared
struct RenderContext {
    left_profile: Vec<i64>,
    right_profile: Vec<i64>,
    gap: i64,
    max_height: usize,
}

impl RenderContext {
    fn new(options: &RenderOptions) -> Self {
        let gap = options.gap.clamp(0, MAX_GAP);
        if gap != options.gap {
            debug!(requested = options.gap, gap, "clamped sibling gap");
        }

        Self {
            left_profile: Vec::new(),
            right_profile: Vec::new(),
            gap: i64::from(gap),
            max_height: options.max_height,
        }
    }

    fn reset_left_profile(&mut self, rows: usize) {
        if self.left_profile.len() < rows {
            self.left_profile.resize(rows, INFINITY);
        }
        self.left_profile[..rows].fill(INFINITY);
    }

    fn reset_right_profile(&mut self, rows: usize) {
        if self.right_profile.len() < rows {
            self.right_profile.resize(rows, -INFINITY);
        }
        self.right_profile[..rows].fill(-INFINITY);
    }

    /// Record the leftmost column used on rows `0..limit` by the subtree at
    /// `root`, with its label centred on column 0. Edge lengths must already
    /// be set.
    fn compute_left_profile(&mut self, layout: &[LayoutNode], root: usize, limit: usize) {
        let mut stack = vec![(root, 0i64, 0usize)];

        while let Some((index, x, y)) = stack.pop() {
            if y >= limit {
                continue;
            }
            let node = &layout[index];

            self.left_profile[y] = self.left_profile[y].min(x - node.left_extent());

            if node.left.is_some() {
                for i in 1..=node.edge_length.min(limit - 1 - y) {
                    self.left_profile[y + i] = self.left_profile[y + i].min(x - i as i64);
                }
            }

            let below = y + node.edge_length + 1;
            stack.extend(node.left.map(|left| (left, x - node.child_offset(), below)));
            stack.extend(node.right.map(|right| (right, x + node.child_offset(), below)));
        }
    }

    fn compute_right_profile(&mut self, layout: &[LayoutNode], root: usize, limit: usize) {
        let mut stack = vec![(root, 0i64, 0usize)];

        while let Some((index, x, y)) = stack.pop() {
            if y >= limit {
                continue;
            }
            let node = &layout[index];

            self.right_profile[y] = self.right_profile[y].max(x + node.right_extent());

            if node.right.is_some() {
                for i in 1..=node.edge_length.min(limit - 1 - y) {
                    self.right_profile[y + i] = self.right_profile[y + i].max(x + i as i64);
                }
            }

            let below = y + node.edge_length + 1;
            stack.extend(node.left.map(|left| (left, x - node.child_offset(), below)));
            stack.extend(node.right.map(|right| (right, x + node.child_offset(), below)));
        }
    }

    /// Fill in `edge_length` and `height` for every node. Children are
    /// stored after their parents, so walking backwards finishes them first.
    fn compute_edge_lengths(&mut self, layout: &mut [LayoutNode]) {
        for index in (0..layout.len()).rev() {
            let (left, right) = (layout[index].left, layout[index].right);
            let left_height = left.map(|l| layout[l].height);
            let right_height = right.map(|r| layout[r].height);

            let edge_length = match (left, right) {
                (None, None) => 0,
                _ => {
                    let mut delta: i64 = 4;

                    if let (Some(l), Some(r)) = (left, right) {
                        let hmin = layout[l].height.min(layout[r].height);
                        let limit = hmin.min(self.max_height);

                        self.reset_right_profile(limit);
                        self.compute_right_profile(layout, l, limit);
                        self.reset_left_profile(limit);
                        self.compute_left_profile(layout, r, limit);

                        for row in 0..limit {
                            let spread = self.right_profile[row] - self.left_profile[row];
                            delta = delta.max(self.gap + 1 + spread);
                        }
                    }

                    // Let two leaves sit one column closer than wider subtrees
                    let has_leaf_child = left_height == Some(1) || right_height == Some(1);
                    if has_leaf_child && delta > 4 {
                        delta -= 1;
                    }

                    ((delta + 1) / 2 - 1) as usize
                }
            };

            let below = edge_length + 1;
            let node = &mut layout[index];
            node.edge_length = edge_length;
            node.height = [left_height, right_height]
                .into_iter()
                .flatten()
                .map(|child_height| child_height + below)
                .fold(1, usize::max);
        }
    }
}

/// One output row plus the column the next character lands in
#[derive(Default)]
struct RowWriter {
    line: String,
    print_next: i64,
}

impl RowWriter {
    /// Write `text` starting at `column`, or right after the previous
    /// write if that column has already been passed
    fn put_at(&mut self, column: i64, text: &str) {
        let padding = (column - self.print_next).max(0);
        self.line.extend(std::iter::repeat(' ').take(padding as usize));
        self.line.push_str(text);
        self.print_next += padding + text.len() as i64;
    }
}

/// Print the first `rows` rows of the subtree at `root`, whose label is
/// centred on column `x`.
///
/// Nodes are visited left subtree first, so each row receives its writes
/// in left-to-right order.
fn print_rows(layout: &[LayoutNode], root: usize, x: i64, rows: usize) -> Vec<RowWriter> {
    let mut writers: Vec<RowWriter> = (0..rows).map(|_| RowWriter::default()).collect();
    let mut stack = vec![(root, x, 0usize)];

    while let Some((index, x, y)) = stack.pop() {
        if y >= rows {
            continue;
        }
        let node = &layout[index];

        writers[y].put_at(x - node.left_extent(), &node.label);

        for i in 1..=node.edge_length.min(rows - 1 - y) {
            let writer = &mut writers[y + i];
            if node.left.is_some() {
                writer.put_at(x - i as i64, "/");
            }
            if node.right.is_some() {
                writer.put_at(x + i as i64, "\\");
            }
        }

        let below = y + node.edge_length + 1;
        stack.extend(node.right.map(|right| (right, x + node.child_offset(), below)));
        stack.extend(node.left.map(|left| (left, x - node.child_offset(), below)));
    }

    writers
}
