//! In-place sorting of settings and keybindings files
//!
//! Both operations parse the file, normalize it and write it back as plain
//! pretty-printed JSON. Comments in the original are not preserved.

use vsc_content::{Mapping, jsonc};
use vsc_fs::{NormalizedPath, io};

use crate::Result;
use crate::keybindings::{DiscardedEntry, normalize_keybindings, parse_keybindings, render_keybindings};

/// Result of sorting one file.
#[derive(Debug, Clone, PartialEq)]
pub struct SortOutcome {
    pub path: NormalizedPath,
    /// The sorted text differs from what was on disk
    pub changed: bool,
    /// Entries (or top-level keys) in the sorted output
    pub entries: usize,
    /// Keybinding entries dropped as superseded
    pub discarded: Vec<DiscardedEntry>,
}

/// Copy of `settings` with keys sorted alphabetically at every level.
pub fn sort_settings(settings: &Mapping) -> Mapping {
    settings.sorted()
}

/// Sort a settings file. With `write` false the file is only inspected.
///
/// Duplicate keys in the source resolve to their last occurrence.
pub fn sort_settings_file(path: &NormalizedPath, write: bool) -> Result<SortOutcome> {
    let original = io::read_text(path)?;
    let sorted = sort_settings(&jsonc::parse_mapping(&original)?);
    let rendered = jsonc::to_pretty_string(&sorted)?;
    finish(path, &original, rendered, sorted.len(), Vec::new(), write)
}

/// Deduplicate and sort a keybindings file. With `write` false the file is
/// only inspected.
pub fn sort_keybindings_file(path: &NormalizedPath, write: bool) -> Result<SortOutcome> {
    let original = io::read_text(path)?;
    let normalized = normalize_keybindings(parse_keybindings(&original)?);
    let rendered = render_keybindings(&normalized.entries)?;
    for dropped in &normalized.discarded {
        tracing::info!(
            key = dropped.entry.key(),
            when = ?dropped.entry.when(),
            index = dropped.index,
            superseded_by = dropped.superseded_by,
            "dropping superseded keybinding"
        );
    }
    finish(
        path,
        &original,
        rendered,
        normalized.entries.len(),
        normalized.discarded,
        write,
    )
}

fn finish(
    path: &NormalizedPath,
    original: &str,
    rendered: String,
    entries: usize,
    discarded: Vec<DiscardedEntry>,
    write: bool,
) -> Result<SortOutcome> {
    let changed = rendered != original;
    if changed && write {
        io::write_text(path, &rendered)?;
    }
    Ok(SortOutcome {
        path: path.clone(),
        changed,
        entries,
        discarded,
    })
}
