//! Profile backups taken before an apply overwrites files
//!
//! A backup is a full copy of the profile directory placed next to it as
//! `<dir>.<suffix>`. The default suffix is `bak.<unix seconds>`; when that
//! name is taken a counter is appended.

use std::fs;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vsc_fs::NormalizedPath;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Whether and how [`crate::write_profile`] backs up the target first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackupPolicy {
    /// Overwrite in place
    #[default]
    Skip,
    /// Copy to `<dir>.bak.<unix seconds>`
    Timestamped,
    /// Copy to `<dir>.<suffix>`; fails if that already exists
    Suffix(String),
}

/// A completed backup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileBackup {
    pub source: NormalizedPath,
    pub path: NormalizedPath,
    pub created: DateTime<Utc>,
    /// Copied files relative to the profile directory
    pub files: Vec<String>,
}

/// Copy `dir` to a sibling directory according to `policy`.
///
/// Returns `None` for [`BackupPolicy::Skip`] or when `dir` does not exist
/// yet.
pub fn backup_profile(dir: &NormalizedPath, policy: &BackupPolicy) -> Result<Option<ProfileBackup>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let created = Utc::now();
    let path = match policy {
        BackupPolicy::Skip => return Ok(None),
        BackupPolicy::Timestamped => free_sibling(dir, &format!("bak.{}", created.timestamp())),
        BackupPolicy::Suffix(suffix) => {
            validate_suffix(suffix)?;
            let path = sibling(dir, suffix);
            if path.exists() {
                return Err(Error::BackupExists { path });
            }
            path
        }
    };

    let files = copy_tree(dir, &path)?;
    tracing::info!(source = %dir, backup = %path, files = files.len(), "backed up profile");

    Ok(Some(ProfileBackup {
        source: dir.clone(),
        path,
        created,
        files,
    }))
}

fn validate_suffix(suffix: &str) -> Result<()> {
    if suffix.is_empty() || suffix.contains(['/', '\\']) || suffix.chars().all(|c| c == '.') {
        return Err(Error::InvalidBackupSuffix {
            suffix: suffix.to_string(),
        });
    }
    Ok(())
}

fn sibling(dir: &NormalizedPath, suffix: &str) -> NormalizedPath {
    NormalizedPath::new(format!("{}.{}", dir.as_str().trim_end_matches('/'), suffix))
}

fn free_sibling(dir: &NormalizedPath, suffix: &str) -> NormalizedPath {
    let first = sibling(dir, suffix);
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| sibling(dir, &format!("{}.{}", suffix, n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn copy_tree(from: &NormalizedPath, to: &NormalizedPath) -> Result<Vec<String>> {
    let root = from.to_native();
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(|p| p.to_path_buf()).unwrap_or_else(|| root.clone());
            vsc_fs::Error::io(path, e.into())
        })?;
        let source = NormalizedPath::new(entry.path());
        let Some(relative) = source.relative_to(from) else {
            continue;
        };
        let dest = if relative.is_empty() {
            to.clone()
        } else {
            to.join(&relative)
        };

        if entry.file_type().is_dir() {
            let native = dest.to_native();
            fs::create_dir_all(&native).map_err(|e| vsc_fs::Error::io(&native, e))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), dest.to_native()).map_err(|e| vsc_fs::Error::io(entry.path(), e))?;
            files.push(relative);
        }
    }
    Ok(files)
}
