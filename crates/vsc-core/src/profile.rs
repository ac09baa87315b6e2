//! Writing a resolved configuration into an editor profile directory

use serde::Serialize;
use vsc_content::{Mapping, Node, jsonc};
use vsc_fs::{NormalizedPath, io};

use crate::backup::{BackupPolicy, ProfileBackup, backup_profile};
use crate::component::ComponentKind;
use crate::layer::LayerId;
use crate::resolver::ResolvedConfiguration;
use crate::Result;

/// What applying did, or would do, to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileChange {
    Create,
    Update,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAction {
    pub component: ComponentKind,
    pub path: NormalizedPath,
    pub change: FileChange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LayerId>,
}

/// Options for [`write_profile`].
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Plan the writes without touching the filesystem
    pub dry_run: bool,
    /// Copy the target directory aside before the first write
    pub backup: BackupPolicy,
}

/// Outcome of [`write_profile`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyReport {
    pub actions: Vec<FileAction>,
    /// Backup taken before writing, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<ProfileBackup>,
}

impl ApplyReport {
    /// Number of files created or updated.
    pub fn changed(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.change != FileChange::Unchanged)
            .count()
    }
}

/// Write every present component of `resolved` into `target`.
///
/// Settings and extensions are written as pretty-printed JSON; keybindings,
/// tasks and snippets are copied byte for byte from their winning layer.
/// Absent components are left alone, and so are local files no layer
/// provides. Files whose content would not change are not rewritten, and a
/// backup is only taken when at least one file will be written.
pub fn write_profile(
    target: &NormalizedPath,
    resolved: &ResolvedConfiguration,
    options: &ApplyOptions,
) -> Result<ApplyReport> {
    let mut planned: Vec<PlannedWrite> = Vec::new();

    if let Some(settings) = &resolved.settings {
        planned.push(PlannedWrite {
            component: ComponentKind::Settings,
            path: file_in(target, ComponentKind::Settings),
            content: jsonc::to_pretty_string(settings)?.into_bytes(),
            source: None,
        });
    }
    if let Some(extensions) = &resolved.extensions {
        planned.push(PlannedWrite {
            component: ComponentKind::Extensions,
            path: file_in(target, ComponentKind::Extensions),
            content: jsonc::to_pretty_string(&extensions_document(extensions))?.into_bytes(),
            source: None,
        });
    }

    let winners = [
        (ComponentKind::Keybindings, &resolved.keybindings),
        (ComponentKind::Tasks, &resolved.tasks),
    ];
    for (component, file) in winners {
        if let Some(file) = file {
            planned.push(PlannedWrite {
                component,
                path: file_in(target, component),
                content: file.content.clone(),
                source: Some(file.origin.clone()),
            });
        }
    }

    if let Some(snippets) = &resolved.snippets {
        let dir = file_in(target, ComponentKind::Snippets);
        for (relative, file) in snippets {
            planned.push(PlannedWrite {
                component: ComponentKind::Snippets,
                path: dir.join(relative),
                content: file.content.clone(),
                source: Some(file.origin.clone()),
            });
        }
    }

    let mut writes = Vec::with_capacity(planned.len());
    for write in planned {
        let change = match io::read_bytes_if_exists(&write.path)? {
            None => FileChange::Create,
            Some(existing) if existing == write.content => FileChange::Unchanged,
            Some(_) => FileChange::Update,
        };
        writes.push((write, change));
    }

    let pending = writes.iter().any(|(_, change)| *change != FileChange::Unchanged);
    let backup = if pending && !options.dry_run {
        backup_profile(target, &options.backup)?
    } else {
        None
    };

    let mut actions = Vec::with_capacity(writes.len());
    for (write, change) in writes {
        let PlannedWrite {
            component,
            path,
            content,
            source,
        } = write;
        if change != FileChange::Unchanged && !options.dry_run {
            io::write_atomic(&path, &content)?;
        }
        tracing::debug!(%path, ?change, dry_run = options.dry_run, "profile file");
        actions.push(FileAction {
            component,
            path,
            change,
            source,
        });
    }

    Ok(ApplyReport { actions, backup })
}

struct PlannedWrite {
    component: ComponentKind,
    path: NormalizedPath,
    content: Vec<u8>,
    source: Option<LayerId>,
}

fn file_in(target: &NormalizedPath, kind: ComponentKind) -> NormalizedPath {
    target.join(kind.file_name())
}

fn extensions_document(recommendations: &[String]) -> Mapping {
    let mut document = Mapping::new();
    document.insert(
        "recommendations",
        Node::Sequence(recommendations.iter().map(|id| Node::string(id.as_str())).collect()),
    );
    document
}
