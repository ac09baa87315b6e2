//! Comparing a resolved configuration with an editor's live files
//!
//! [`LocalState::read`] loads what is currently in an editor profile
//! directory and [`diff`] classifies every requested component as in sync,
//! changed by an apply, or present only locally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vsc_content::{Mapping, Node, SemanticDiff, dedupe_preserving_order, jsonc};
use vsc_fs::{NormalizedPath, io};

use crate::component::ComponentKind;
use crate::layer::LayerId;
use crate::reader::{recommendations, walk_files};
use crate::resolver::ResolvedConfiguration;
use crate::Result;

/// Classification of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncState {
    /// Local content already equals the resolved content
    InSync,
    /// Applying would change local content
    WouldChange,
    /// Local content exists that no layer provides
    LocalOnly,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InSync => "in sync",
            Self::WouldChange => "would change",
            Self::LocalOnly => "local only",
        }
    }
}

/// Status of one component with human-readable details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentStatus {
    pub component: ComponentKind,
    pub state: SyncState,
    /// Layer the resolved file came from, for winner-takes-all components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LayerId>,
    pub details: Vec<String>,
}

impl ComponentStatus {
    fn new(component: ComponentKind, state: SyncState) -> Self {
        Self {
            component,
            state,
            source: None,
            details: Vec::new(),
        }
    }

    fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// A local JSON file that may not parse.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalDocument<T> {
    Parsed(T),
    Invalid { reason: String },
}

/// Current contents of an editor profile directory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalState {
    pub settings: Option<LocalDocument<Mapping>>,
    pub extensions: Option<LocalDocument<Vec<String>>>,
    pub keybindings: Option<Vec<u8>>,
    pub tasks: Option<Vec<u8>>,
    pub snippets: BTreeMap<String, Vec<u8>>,
}

impl LocalState {
    /// Read the profile directory at `dir`.
    ///
    /// Missing files are recorded as absent. Settings and extensions that do
    /// not parse are kept as [`LocalDocument::Invalid`] rather than failing,
    /// since applying would overwrite them anyway.
    pub fn read(dir: &NormalizedPath) -> Result<Self> {
        let read = |kind: ComponentKind| io::read_bytes_if_exists(&dir.join(kind.file_name()));

        let settings = read(ComponentKind::Settings)?.map(|bytes| {
            parse_local(&bytes, |text| jsonc::parse_mapping(text).map_err(|e| e.to_string()))
        });
        let extensions = read(ComponentKind::Extensions)?.map(|bytes| {
            parse_local(&bytes, |text| {
                let document = jsonc::parse_mapping(text).map_err(|e| e.to_string())?;
                recommendations(&document)
            })
        });

        let mut snippets = BTreeMap::new();
        let snippets_dir = dir.join(ComponentKind::Snippets.file_name());
        if snippets_dir.is_dir() {
            for (relative, path) in walk_files(&snippets_dir)? {
                snippets.insert(relative, io::read_bytes(&path)?);
            }
        }

        Ok(Self {
            settings,
            extensions,
            keybindings: read(ComponentKind::Keybindings)?,
            tasks: read(ComponentKind::Tasks)?,
            snippets,
        })
    }
}

fn parse_local<T, F>(bytes: &[u8], parse: F) -> LocalDocument<T>
where
    F: FnOnce(&str) -> std::result::Result<T, String>,
{
    let parsed = std::str::from_utf8(bytes)
        .map_err(|_| "not valid UTF-8".to_string())
        .and_then(parse);
    match parsed {
        Ok(value) => LocalDocument::Parsed(value),
        Err(reason) => {
            tracing::warn!(%reason, "local file could not be parsed");
            LocalDocument::Invalid { reason }
        }
    }
}

/// Classify every requested component of `resolved` against `local`.
pub fn diff(local: &LocalState, resolved: &ResolvedConfiguration) -> Vec<ComponentStatus> {
    resolved
        .requested
        .iter()
        .map(|kind| {
            let mut status = match kind {
                ComponentKind::Settings => settings_status(local, resolved),
                ComponentKind::Extensions => extensions_status(local, resolved),
                ComponentKind::Keybindings => file_status(
                    kind,
                    local.keybindings.as_deref(),
                    resolved.keybindings.as_ref().map(|f| f.content.as_slice()),
                ),
                ComponentKind::Tasks => file_status(
                    kind,
                    local.tasks.as_deref(),
                    resolved.tasks.as_ref().map(|f| f.content.as_slice()),
                ),
                ComponentKind::Snippets => snippets_status(local, resolved),
            };
            status.source = resolved.source_of(kind).cloned();
            tracing::debug!(component = %kind, state = status.state.as_str(), "classified");
            status
        })
        .collect()
}

fn settings_status(local: &LocalState, resolved: &ResolvedConfiguration) -> ComponentStatus {
    let kind = ComponentKind::Settings;
    match (&local.settings, &resolved.settings) {
        (None, None) => ComponentStatus::new(kind, SyncState::InSync),
        (None, Some(_)) => ComponentStatus::new(kind, SyncState::WouldChange)
            .with_details(vec![format!("{} does not exist", kind.file_name())]),
        (Some(LocalDocument::Invalid { reason }), Some(_)) => {
            ComponentStatus::new(kind, SyncState::WouldChange)
                .with_details(vec![format!("local file could not be parsed: {}", reason)])
        }
        (Some(LocalDocument::Parsed(current)), Some(wanted)) => {
            if current == wanted {
                return ComponentStatus::new(kind, SyncState::InSync);
            }
            let diff = SemanticDiff::compute(
                &Node::Mapping(current.clone()),
                &Node::Mapping(wanted.clone()),
            );
            let (added, removed, modified) = diff.paths_by_kind();
            let mut details = Vec::new();
            details.extend(added.iter().map(|p| format!("+ {}", p)));
            details.extend(removed.iter().map(|p| format!("- {}", p)));
            details.extend(modified.iter().map(|p| format!("~ {}", p)));
            ComponentStatus::new(kind, SyncState::WouldChange).with_details(details)
        }
        (Some(LocalDocument::Parsed(current)), None) if current.is_empty() => {
            ComponentStatus::new(kind, SyncState::InSync)
        }
        (Some(_), None) => ComponentStatus::new(kind, SyncState::LocalOnly)
            .with_details(vec![format!("{} is not managed by any layer", kind.file_name())]),
    }
}

fn extensions_status(local: &LocalState, resolved: &ResolvedConfiguration) -> ComponentStatus {
    let kind = ComponentKind::Extensions;
    match (&local.extensions, &resolved.extensions) {
        (None, None) => ComponentStatus::new(kind, SyncState::InSync),
        (None, Some(_)) => ComponentStatus::new(kind, SyncState::WouldChange)
            .with_details(vec![format!("{} does not exist", kind.file_name())]),
        (Some(LocalDocument::Invalid { reason }), Some(_)) => {
            ComponentStatus::new(kind, SyncState::WouldChange)
                .with_details(vec![format!("local file could not be parsed: {}", reason)])
        }
        (Some(LocalDocument::Parsed(current)), Some(wanted)) => {
            let current = dedupe_preserving_order(current.clone());
            if &current == wanted {
                return ComponentStatus::new(kind, SyncState::InSync);
            }
            let mut details: Vec<String> = wanted
                .iter()
                .filter(|id| !current.contains(id))
                .map(|id| format!("missing {}", id))
                .collect();
            details.extend(
                current
                    .iter()
                    .filter(|id| !wanted.contains(id))
                    .map(|id| format!("extra {}", id)),
            );
            if details.is_empty() {
                details.push("recommendation order differs".to_string());
            }
            ComponentStatus::new(kind, SyncState::WouldChange).with_details(details)
        }
        (Some(LocalDocument::Parsed(current)), None) if current.is_empty() => {
            ComponentStatus::new(kind, SyncState::InSync)
        }
        (Some(_), None) => ComponentStatus::new(kind, SyncState::LocalOnly)
            .with_details(vec![format!("{} is not managed by any layer", kind.file_name())]),
    }
}

fn file_status(kind: ComponentKind, local: Option<&[u8]>, resolved: Option<&[u8]>) -> ComponentStatus {
    match (local, resolved) {
        (None, None) => ComponentStatus::new(kind, SyncState::InSync),
        (Some(_), None) => ComponentStatus::new(kind, SyncState::LocalOnly)
            .with_details(vec![format!("{} is not managed by any layer", kind.file_name())]),
        (None, Some(_)) => ComponentStatus::new(kind, SyncState::WouldChange)
            .with_details(vec![format!("{} does not exist", kind.file_name())]),
        (Some(current), Some(wanted)) if current == wanted => {
            ComponentStatus::new(kind, SyncState::InSync)
        }
        (Some(current), Some(wanted)) => {
            let diff = SemanticDiff::compute_text(
                &String::from_utf8_lossy(current),
                &String::from_utf8_lossy(wanted),
            );
            ComponentStatus::new(kind, SyncState::WouldChange).with_details(vec![format!(
                "{} differs ({:.0}% similar)",
                kind.file_name(),
                diff.similarity * 100.0
            )])
        }
    }
}

fn snippets_status(local: &LocalState, resolved: &ResolvedConfiguration) -> ComponentStatus {
    let kind = ComponentKind::Snippets;
    let empty = BTreeMap::new();
    let wanted = resolved.snippets.as_ref().unwrap_or(&empty);

    let mut details = Vec::new();
    let mut would_change = false;
    for (relative, file) in wanted {
        match local.snippets.get(relative) {
            None => {
                would_change = true;
                details.push(format!("missing {}", relative));
            }
            Some(current) if *current != file.content => {
                would_change = true;
                details.push(format!("modified {} (from {})", relative, file.origin));
            }
            Some(_) => {}
        }
    }
    let extra: Vec<String> = local
        .snippets
        .keys()
        .filter(|relative| !wanted.contains_key(*relative))
        .map(|relative| format!("extra {}", relative))
        .collect();

    let state = if would_change {
        SyncState::WouldChange
    } else if !extra.is_empty() {
        SyncState::LocalOnly
    } else {
        SyncState::InSync
    };
    details.extend(extra);
    ComponentStatus::new(kind, state).with_details(details)
}
