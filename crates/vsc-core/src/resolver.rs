//! Combining layers into one resolved configuration
//!
//! [`resolve_contents`] is the pure core: it takes what each layer provides,
//! lowest priority first, and applies each component's [`Strategy`].
//! [`resolve`] reads the layers of a [`LayerOrder`] from disk and then
//! calls it.

use std::collections::BTreeMap;

use vsc_content::{Mapping, dedupe_preserving_order, merge_all};

use crate::component::{ComponentKind, ComponentSet, Strategy};
use crate::layer::{LayerId, LayerOrder};
use crate::reader::{ComponentFile, LayerContents, SnippetFiles, read_layer};
use crate::{Error, Result};

/// The effective configuration produced by one resolution.
///
/// A component is `None` when no layer provided it. Components that were
/// not requested are always `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfiguration {
    /// Layers that took part, lowest priority first
    pub layers: Vec<LayerId>,
    pub requested: ComponentSet,
    pub settings: Option<Mapping>,
    pub extensions: Option<Vec<String>>,
    pub keybindings: Option<ComponentFile>,
    pub tasks: Option<ComponentFile>,
    pub snippets: Option<SnippetFiles>,
}

impl ResolvedConfiguration {
    pub fn is_present(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Settings => self.settings.is_some(),
            ComponentKind::Extensions => self.extensions.is_some(),
            ComponentKind::Keybindings => self.keybindings.is_some(),
            ComponentKind::Tasks => self.tasks.is_some(),
            ComponentKind::Snippets => self.snippets.is_some(),
        }
    }

    /// Requested components that no layer provided.
    pub fn absent(&self) -> Vec<ComponentKind> {
        self.requested
            .iter()
            .filter(|kind| !self.is_present(*kind))
            .collect()
    }

    /// Fail with [`Error::EmptyResolution`] unless `kind` was resolved.
    pub fn require(&self, kind: ComponentKind) -> Result<()> {
        if self.is_present(kind) {
            Ok(())
        } else {
            Err(Error::EmptyResolution { component: kind })
        }
    }

    /// Layer that supplied a winner-takes-all component.
    pub fn source_of(&self, kind: ComponentKind) -> Option<&LayerId> {
        match kind {
            ComponentKind::Keybindings => self.keybindings.as_ref().map(|f| &f.origin),
            ComponentKind::Tasks => self.tasks.as_ref().map(|f| &f.origin),
            _ => None,
        }
    }
}

/// Read every layer in `order` and resolve the requested components.
pub fn resolve(order: &LayerOrder, requested: &ComponentSet) -> Result<ResolvedConfiguration> {
    let contents = order
        .iter()
        .map(|layer| read_layer(layer, requested))
        .collect::<Result<Vec<_>>>()?;
    resolve_contents(&contents, requested)
}

/// Resolve already-read layer contents, lowest priority first.
///
/// Deterministic: the same contents and request always give the same
/// result.
pub fn resolve_contents(
    contents: &[LayerContents],
    requested: &ComponentSet,
) -> Result<ResolvedConfiguration> {
    for (index, layer) in contents.iter().enumerate() {
        if contents[..index].iter().any(|earlier| earlier.id == layer.id) {
            return Err(Error::AmbiguousSelection {
                layer: layer.id.clone(),
            });
        }
    }

    let mut resolved = ResolvedConfiguration {
        layers: contents.iter().map(|c| c.id.clone()).collect(),
        requested: requested.clone(),
        settings: None,
        extensions: None,
        keybindings: None,
        tasks: None,
        snippets: None,
    };

    for kind in requested.iter() {
        match kind {
            ComponentKind::Settings => resolved.settings = merge_settings(contents),
            ComponentKind::Extensions => resolved.extensions = union_extensions(contents),
            ComponentKind::Snippets => resolved.snippets = union_snippets(contents),
            ComponentKind::Keybindings => {
                resolved.keybindings = select_winner(contents, |c| c.keybindings.as_ref());
            }
            ComponentKind::Tasks => {
                resolved.tasks = select_winner(contents, |c| c.tasks.as_ref());
            }
        }
        log_component(&resolved, kind, contents);
    }

    Ok(resolved)
}

fn merge_settings(contents: &[LayerContents]) -> Option<Mapping> {
    let trees: Vec<Mapping> = contents.iter().filter_map(|c| c.settings.clone()).collect();
    if trees.is_empty() {
        return None;
    }
    Some(merge_all(trees))
}

fn union_extensions(contents: &[LayerContents]) -> Option<Vec<String>> {
    let mut any = false;
    let mut all = Vec::new();
    for list in contents.iter().filter_map(|c| c.extensions.as_ref()) {
        any = true;
        all.extend(list.iter().cloned());
    }
    any.then(|| dedupe_preserving_order(all))
}

fn union_snippets(contents: &[LayerContents]) -> Option<SnippetFiles> {
    let mut files = BTreeMap::new();
    for layer in contents {
        for (relative, file) in &layer.snippets {
            files.insert(relative.clone(), file.clone());
        }
    }
    (!files.is_empty()).then_some(files)
}

/// The file from the highest-priority layer that has one.
fn select_winner<F>(contents: &[LayerContents], pick: F) -> Option<ComponentFile>
where
    F: Fn(&LayerContents) -> Option<&ComponentFile>,
{
    contents.iter().rev().find_map(|c| pick(c)).cloned()
}

fn log_component(resolved: &ResolvedConfiguration, kind: ComponentKind, contents: &[LayerContents]) {
    let contributors: Vec<String> = contents
        .iter()
        .filter(|c| c.provides(kind))
        .map(|c| c.id.to_string())
        .collect();
    match kind.strategy() {
        Strategy::WinnerTakesAll => tracing::debug!(
            component = %kind,
            candidates = ?contributors,
            winner = ?resolved.source_of(kind).map(ToString::to_string),
            "selected winner"
        ),
        strategy => tracing::debug!(
            component = %kind,
            ?strategy,
            layers = ?contributors,
            present = resolved.is_present(kind),
            "combined layers"
        ),
    }
}
