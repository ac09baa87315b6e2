//! Reading component files out of layer directories
//!
//! Only requested components are read. A component file that is absent from
//! a layer is simply not provided by that layer; a component file that is
//! present but unparsable fails the whole read with
//! [`Error::MalformedComponentFile`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use vsc_content::{Mapping, jsonc};
use vsc_fs::{NormalizedPath, compute_bytes_checksum, io};
use walkdir::WalkDir;

use crate::component::{ComponentKind, ComponentSet};
use crate::keybindings::KeybindingEntry;
use crate::layer::{Layer, LayerId, LayerKind};
use crate::{Error, Result};

/// The exact bytes of a file taken from one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFile {
    /// Layer the file was read from
    pub origin: LayerId,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl ComponentFile {
    pub fn new(origin: LayerId, content: impl Into<Vec<u8>>) -> Self {
        Self {
            origin,
            content: content.into(),
        }
    }

    pub fn checksum(&self) -> String {
        compute_bytes_checksum(&self.content)
    }

    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Snippet files keyed by their path relative to `snippets/`, with `/`
/// separators.
pub type SnippetFiles = BTreeMap<String, ComponentFile>;

/// Everything one layer provides for the requested components.
///
/// `None` means the layer has no file for that component.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerContents {
    pub id: LayerId,
    pub settings: Option<Mapping>,
    pub keybindings: Option<ComponentFile>,
    pub extensions: Option<Vec<String>>,
    pub tasks: Option<ComponentFile>,
    pub snippets: SnippetFiles,
}

impl LayerContents {
    /// A layer that provides nothing.
    pub fn empty(id: LayerId) -> Self {
        Self {
            id,
            settings: None,
            keybindings: None,
            extensions: None,
            tasks: None,
            snippets: BTreeMap::new(),
        }
    }

    pub fn with_settings(mut self, settings: Mapping) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_keybindings(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.keybindings = Some(ComponentFile::new(self.id.clone(), content));
        self
    }

    pub fn with_extensions<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(recommendations.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_tasks(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.tasks = Some(ComponentFile::new(self.id.clone(), content));
        self
    }

    pub fn with_snippet(mut self, relative: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let file = ComponentFile::new(self.id.clone(), content);
        self.snippets.insert(relative.into(), file);
        self
    }

    /// True when the layer provides the component.
    pub fn provides(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Settings => self.settings.is_some(),
            ComponentKind::Keybindings => self.keybindings.is_some(),
            ComponentKind::Extensions => self.extensions.is_some(),
            ComponentKind::Tasks => self.tasks.is_some(),
            ComponentKind::Snippets => !self.snippets.is_empty(),
        }
    }
}

/// Read the requested components of one layer.
///
/// Fails with [`Error::LayerNotFound`] when the layer directory is missing.
pub fn read_layer(layer: &Layer, requested: &ComponentSet) -> Result<LayerContents> {
    if !layer.exists() {
        return Err(Error::LayerNotFound {
            layer: layer.id().clone(),
            path: layer.path().clone(),
        });
    }

    let mut contents = LayerContents::empty(layer.id().clone());
    for kind in requested.iter() {
        match kind {
            ComponentKind::Settings => contents.settings = read_settings(layer)?,
            ComponentKind::Keybindings => contents.keybindings = read_keybindings(layer)?,
            ComponentKind::Extensions => contents.extensions = read_extensions(layer)?,
            ComponentKind::Tasks => contents.tasks = read_tasks(layer)?,
            ComponentKind::Snippets => contents.snippets = read_snippets(layer)?,
        }
    }

    tracing::debug!(
        layer = %layer.id(),
        provides = ?requested.iter().filter(|k| contents.provides(*k)).collect::<Vec<_>>(),
        "read layer"
    );
    Ok(contents)
}

/// Read a component file as text; `None` when the layer has no such file.
fn read_component_text(layer: &Layer, kind: ComponentKind) -> Result<Option<(NormalizedPath, String)>> {
    let path = layer.path().join(kind.file_name());
    let Some(bytes) = io::read_bytes_if_exists(&path)? else {
        return Ok(None);
    };
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some((path, text))),
        Err(_) => Err(Error::malformed(layer.id(), &path, "not valid UTF-8")),
    }
}

fn read_settings(layer: &Layer) -> Result<Option<Mapping>> {
    let Some((path, text)) = read_component_text(layer, ComponentKind::Settings)? else {
        return Ok(None);
    };
    jsonc::parse_mapping(&text)
        .map(Some)
        .map_err(|e| Error::malformed(layer.id(), &path, e))
}

fn read_keybindings(layer: &Layer) -> Result<Option<ComponentFile>> {
    let Some((path, text)) = read_component_text(layer, ComponentKind::Keybindings)? else {
        return Ok(None);
    };
    let entries = jsonc::parse_sequence(&text).map_err(|e| Error::malformed(layer.id(), &path, e))?;
    for (index, entry) in entries.into_iter().enumerate() {
        KeybindingEntry::from_node(entry)
            .map_err(|e| Error::malformed(layer.id(), &path, format!("entry {}: {}", index, e)))?;
    }
    Ok(Some(ComponentFile::new(layer.id().clone(), text)))
}

fn read_extensions(layer: &Layer) -> Result<Option<Vec<String>>> {
    let Some((path, text)) = read_component_text(layer, ComponentKind::Extensions)? else {
        return Ok(None);
    };
    let document = jsonc::parse_mapping(&text).map_err(|e| Error::malformed(layer.id(), &path, e))?;
    recommendations(&document)
        .map(Some)
        .map_err(|reason| Error::malformed(layer.id(), &path, reason))
}

/// The `recommendations` list of an extensions document.
///
/// A document without the key recommends nothing.
pub(crate) fn recommendations(document: &Mapping) -> std::result::Result<Vec<String>, String> {
    let Some(node) = document.get("recommendations") else {
        return Ok(Vec::new());
    };
    let items = node
        .as_sequence()
        .ok_or_else(|| format!("`recommendations` must be an array, found {}", node.kind_name()))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("extension identifiers must be strings, found {}", item.kind_name()))
        })
        .collect()
}

fn read_tasks(layer: &Layer) -> Result<Option<ComponentFile>> {
    let Some((path, text)) = read_component_text(layer, ComponentKind::Tasks)? else {
        return Ok(None);
    };
    jsonc::parse_mapping(&text).map_err(|e| Error::malformed(layer.id(), &path, e))?;
    Ok(Some(ComponentFile::new(layer.id().clone(), text)))
}

fn read_snippets(layer: &Layer) -> Result<SnippetFiles> {
    let dir = layer.path().join(ComponentKind::Snippets.file_name());
    let mut files = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(files);
    }
    for (relative, path) in walk_files(&dir)? {
        let content = io::read_bytes(&path)?;
        files.insert(relative, ComponentFile::new(layer.id().clone(), content));
    }
    Ok(files)
}

/// Every regular file below `dir`, keyed by its `/`-separated relative path.
///
/// Symlinks are followed, so a linked directory contributes its files.
pub(crate) fn walk_files(dir: &NormalizedPath) -> Result<Vec<(String, NormalizedPath)>> {
    let root = dir.to_native();
    let mut found = Vec::new();

    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
            vsc_fs::Error::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = NormalizedPath::new(entry.path());
        if let Some(relative) = path.relative_to(dir) {
            found.push((relative, path));
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

/// Lists layers available under a configs root.
#[derive(Debug, Clone)]
pub struct LayerReader {
    root: NormalizedPath,
}

impl LayerReader {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    /// Names of the layers of `kind` present on disk, sorted.
    ///
    /// For [`LayerKind::Base`] this is `["base"]` when the base directory
    /// exists and empty otherwise.
    pub fn list(&self, kind: LayerKind) -> Result<Vec<String>> {
        let dir = self.root.join(kind.directory());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        if kind == LayerKind::Base {
            return Ok(vec!["base".to_string()]);
        }

        let native = dir.to_native();
        let mut names = Vec::new();
        for entry in fs::read_dir(&native).map_err(|e| vsc_fs::Error::io(&native, e))? {
            let entry = entry.map_err(|e| vsc_fs::Error::io(&native, e))?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
