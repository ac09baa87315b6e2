//! Layer-over-layer tree merging
//!
//! `merge(base, overlay)` applies one higher-priority layer on top of a
//! lower one:
//!
//! - mapping over mapping merges recursively, leaving base-only keys alone
//! - sequence over sequence concatenates and drops repeated values, keeping
//!   the first occurrence
//! - anything else (scalars, shape mismatches) is replaced by the overlay
//!
//! The merge is not associative once sequences are involved, so a stack of
//! layers is always folded left to right with [`merge_all`].

use crate::tree::{Mapping, Node, Scalar};

/// Merge `overlay` on top of `base`.
pub fn merge(base: Mapping, overlay: Mapping) -> Mapping {
    let mut result = base;
    for (key, overlay_value) in overlay {
        match result.get_mut(&key) {
            Some(slot) => {
                let base_value = std::mem::replace(slot, Node::Scalar(Scalar::Null));
                *slot = merge_node(base_value, overlay_value);
            }
            None => {
                result.insert(key, overlay_value);
            }
        }
    }
    result
}

/// Merge two arbitrary nodes with the same rules as [`merge`].
pub fn merge_node(base: Node, overlay: Node) -> Node {
    match (base, overlay) {
        (Node::Mapping(base), Node::Mapping(overlay)) => Node::Mapping(merge(base, overlay)),
        (Node::Sequence(mut base), Node::Sequence(overlay)) => {
            base.extend(overlay);
            Node::Sequence(dedupe_preserving_order(base))
        }
        (_, overlay) => overlay,
    }
}

/// Fold [`merge`] over `trees` in order, lowest priority first.
pub fn merge_all<I>(trees: I) -> Mapping
where
    I: IntoIterator<Item = Mapping>,
{
    trees.into_iter().fold(Mapping::new(), merge)
}

/// Drop values equal to an earlier value, keeping first occurrences in
/// their original order.
pub fn dedupe_preserving_order<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    kept
}
