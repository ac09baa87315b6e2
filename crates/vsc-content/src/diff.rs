//! Semantic diff types and computation

use serde_json::Value;
use similar::{ChangeTag, TextDiff};

use crate::tree::Node;

/// Maximum recursion depth for diff operations
const MAX_DIFF_DEPTH: usize = 128;

/// Result of comparing two trees or two texts
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticDiff {
    /// Are the inputs semantically equivalent?
    pub is_equivalent: bool,
    /// List of changes, old -> new
    pub changes: Vec<SemanticChange>,
    /// Similarity ratio (0.0 to 1.0)
    pub similarity: f64,
}

impl SemanticDiff {
    pub fn equivalent() -> Self {
        Self {
            is_equivalent: true,
            changes: Vec::new(),
            similarity: 1.0,
        }
    }

    /// Compute a semantic diff between two trees.
    ///
    /// Mapping keys are matched by name, so key order never produces a
    /// change. Sequences are compared index by index.
    pub fn compute(old: &Node, new: &Node) -> Self {
        if old == new {
            return Self::equivalent();
        }

        let mut changes = Vec::new();
        diff_nodes(old, new, String::new(), &mut changes, 0);

        Self {
            is_equivalent: changes.is_empty(),
            changes,
            similarity: compute_similarity(old, new),
        }
    }

    /// Line-by-line diff of two texts using `similar`.
    pub fn compute_text(old: &str, new: &str) -> Self {
        if old == new {
            return Self::equivalent();
        }

        let text_diff = TextDiff::from_lines(old, new);
        let changes = text_diff
            .iter_all_changes()
            .filter_map(|change| match change.tag() {
                ChangeTag::Delete => Some(SemanticChange::LineRemoved {
                    content: change.value().to_string(),
                }),
                ChangeTag::Insert => Some(SemanticChange::LineAdded {
                    content: change.value().to_string(),
                }),
                ChangeTag::Equal => None,
            })
            .collect::<Vec<_>>();

        Self {
            is_equivalent: changes.is_empty(),
            changes,
            similarity: f64::from(text_diff.ratio()),
        }
    }

    /// Key paths added, removed and modified, in that order, each sorted.
    pub fn paths_by_kind(&self) -> (Vec<&str>, Vec<&str>, Vec<&str>) {
        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut modified = Vec::new();
        for change in &self.changes {
            match change {
                SemanticChange::Added { path, .. } => added.push(path.as_str()),
                SemanticChange::Removed { path, .. } => removed.push(path.as_str()),
                SemanticChange::Modified { path, .. } => modified.push(path.as_str()),
                SemanticChange::LineAdded { .. } | SemanticChange::LineRemoved { .. } => {}
            }
        }
        added.sort_unstable();
        removed.sort_unstable();
        modified.sort_unstable();
        (added, removed, modified)
    }
}

impl Default for SemanticDiff {
    fn default() -> Self {
        Self::equivalent()
    }
}

/// A single difference between two documents
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticChange {
    /// Key/path present only in the new tree
    Added { path: String, value: Node },
    /// Key/path present only in the old tree
    Removed { path: String, value: Node },
    /// Value changed at path
    Modified { path: String, old: Node, new: Node },
    /// Text line present only in the new text
    LineAdded { content: String },
    /// Text line present only in the old text
    LineRemoved { content: String },
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn diff_nodes(
    old: &Node,
    new: &Node,
    path: String,
    changes: &mut Vec<SemanticChange>,
    depth: usize,
) {
    // Past the depth limit a differing subtree becomes one modification.
    if depth > MAX_DIFF_DEPTH {
        if old != new {
            changes.push(SemanticChange::Modified {
                path,
                old: old.clone(),
                new: new.clone(),
            });
        }
        return;
    }

    match (old, new) {
        (Node::Mapping(old_map), Node::Mapping(new_map)) => {
            for (key, old_value) in old_map.iter() {
                let child = child_path(&path, key);
                match new_map.get(key) {
                    Some(new_value) => diff_nodes(old_value, new_value, child, changes, depth + 1),
                    None => changes.push(SemanticChange::Removed {
                        path: child,
                        value: old_value.clone(),
                    }),
                }
            }
            for (key, new_value) in new_map.iter() {
                if !old_map.contains_key(key) {
                    changes.push(SemanticChange::Added {
                        path: child_path(&path, key),
                        value: new_value.clone(),
                    });
                }
            }
        }

        (Node::Sequence(old_items), Node::Sequence(new_items)) => {
            let max_len = old_items.len().max(new_items.len());
            for i in 0..max_len {
                let child = format!("{}[{}]", path, i);
                match (old_items.get(i), new_items.get(i)) {
                    (Some(o), Some(n)) => diff_nodes(o, n, child, changes, depth + 1),
                    (Some(o), None) => changes.push(SemanticChange::Removed {
                        path: child,
                        value: o.clone(),
                    }),
                    (None, Some(n)) => changes.push(SemanticChange::Added {
                        path: child,
                        value: n.clone(),
                    }),
                    (None, None) => unreachable!(),
                }
            }
        }

        _ => {
            if old != new {
                changes.push(SemanticChange::Modified {
                    path,
                    old: old.clone(),
                    new: new.clone(),
                });
            }
        }
    }
}

/// Character-level similarity of the sorted compact JSON forms.
fn compute_similarity(old: &Node, new: &Node) -> f64 {
    let old_str = serde_json::to_string(&Value::from(&old.sorted())).unwrap_or_default();
    let new_str = serde_json::to_string(&Value::from(&new.sorted())).unwrap_or_default();
    f64::from(TextDiff::from_chars(&old_str, &new_str).ratio())
}
