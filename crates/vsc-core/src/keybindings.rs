//! Keybinding list normalization
//!
//! A keybindings file is an array of objects, each with a `key` chord and an
//! optional `when` context. Two entries with the same `(key, when)` bind the
//! same thing, and the later one is what the editor honours. Normalizing
//! keeps only that later entry and then sorts the survivors so that removal
//! entries (keys starting with `-`) come first, followed by everything else
//! by key, case-insensitively. The sort is stable.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use vsc_content::{Mapping, Node, jsonc};

/// One keybinding entry with all of its fields.
///
/// Fields other than `key` and `when` are kept exactly as they were read,
/// in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeybindingEntry {
    key: String,
    when: Option<String>,
    fields: Mapping,
}

impl KeybindingEntry {
    /// Build an entry from a parsed object.
    ///
    /// `key` must be a string. `when` may be a string, `null` or absent;
    /// `null` and absent are the same identity.
    pub fn from_node(node: Node) -> vsc_content::Result<Self> {
        let found = node.kind_name();
        let fields = node
            .into_mapping()
            .ok_or_else(|| vsc_content::Error::shape("keybinding object", found))?;

        let key = match fields.get("key") {
            Some(Node::Scalar(vsc_content::Scalar::String(key))) => key.clone(),
            Some(other) => return Err(vsc_content::Error::shape("string `key`", other.kind_name())),
            None => return Err(vsc_content::Error::shape("string `key`", "no `key` field")),
        };

        let when = match fields.get("when") {
            None | Some(Node::Scalar(vsc_content::Scalar::Null)) => None,
            Some(Node::Scalar(vsc_content::Scalar::String(when))) => Some(when.clone()),
            Some(other) => {
                return Err(vsc_content::Error::shape("string `when`", other.kind_name()));
            }
        };

        Ok(Self { key, when, fields })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn when(&self) -> Option<&str> {
        self.when.as_deref()
    }

    /// Removal entries unbind a default binding.
    pub fn is_removal(&self) -> bool {
        self.key.starts_with('-')
    }

    pub fn fields(&self) -> &Mapping {
        &self.fields
    }

    fn identity(&self) -> (&str, Option<&str>) {
        (self.key(), self.when())
    }
}

impl Serialize for KeybindingEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// An entry dropped because a later entry has the same identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscardedEntry {
    /// Position of the dropped entry in the input
    pub index: usize,
    /// Position of the entry that replaced it
    pub superseded_by: usize,
    pub entry: KeybindingEntry,
}

/// Output of [`normalize_keybindings`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedKeybindings {
    pub entries: Vec<KeybindingEntry>,
    /// Dropped entries, in input order
    pub discarded: Vec<DiscardedEntry>,
}

/// Drop superseded entries and sort the rest.
///
/// `entries.len() + discarded.len()` always equals the input length.
pub fn normalize_keybindings(input: Vec<KeybindingEntry>) -> NormalizedKeybindings {
    let mut last_index: HashMap<(String, Option<String>), usize> = HashMap::new();
    for (index, entry) in input.iter().enumerate() {
        last_index.insert((entry.key.clone(), entry.when.clone()), index);
    }

    let mut entries = Vec::with_capacity(last_index.len());
    let mut discarded = Vec::new();
    for (index, entry) in input.into_iter().enumerate() {
        let (key, when) = entry.identity();
        let winner = last_index
            .get(&(key.to_string(), when.map(str::to_string)))
            .copied()
            .unwrap_or(index);
        if winner == index {
            entries.push(entry);
        } else {
            discarded.push(DiscardedEntry {
                index,
                superseded_by: winner,
                entry,
            });
        }
    }

    entries.sort_by_key(|entry| (!entry.is_removal(), entry.key.to_lowercase()));

    NormalizedKeybindings { entries, discarded }
}

/// Parse a keybindings document into entries.
pub fn parse_keybindings(source: &str) -> vsc_content::Result<Vec<KeybindingEntry>> {
    jsonc::parse_sequence(source)?
        .into_iter()
        .map(KeybindingEntry::from_node)
        .collect()
}

/// Render entries as a pretty-printed JSON array.
pub fn render_keybindings(entries: &[KeybindingEntry]) -> vsc_content::Result<String> {
    jsonc::to_pretty_string(entries)
}
