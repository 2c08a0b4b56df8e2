//! Value lookup within a bounded slice of a traversal

use std::collections::HashMap;

/// Find the first position of `value` in `seq[start..=end]`, scanning left to right.
///
/// An `end` past the sequence is clamped to its last element. Returns `None`
/// when the value is absent or the range is empty.
pub fn search(seq: &[i32], start: usize, end: usize, value: i32) -> Option<usize> {
    if start > end || start >= seq.len() {
        return None;
    }

    let end = end.min(seq.len() - 1);
    seq[start..=end]
        .iter()
        .position(|&v| v == value)
        .map(|offset| start + offset)
}

/// Precomputed positions of every value in a sequence.
///
/// `first_in` answers the same question as [`search`] without rescanning,
/// which keeps reconstruction of long chains linear.
pub struct PositionIndex {
    positions: HashMap<i32, Vec<usize>>,
    len: usize,
}

impl PositionIndex {
    pub fn new(seq: &[i32]) -> Self {
        let mut positions: HashMap<i32, Vec<usize>> = HashMap::new();
        for (position, &value) in seq.iter().enumerate() {
            positions.entry(value).or_default().push(position);
        }

        Self {
            positions,
            len: seq.len(),
        }
    }

    /// First position of `value` within `start..=end`
    pub fn first_in(&self, value: i32, start: usize, end: usize) -> Option<usize> {
        if start > end || start >= self.len {
            return None;
        }

        let found = self.positions.get(&value)?;
        let candidate = found[found.partition_point(|&p| p < start)..].first()?;
        (*candidate <= end).then_some(*candidate)
    }

    pub fn contains(&self, value: i32) -> bool {
        self.positions.contains_key(&value)
    }
}
