//! Layers and their precedence order
//!
//! A configs repository holds one directory per layer:
//!
//! ```text
//! <root>/base/
//! <root>/apps/<name>/
//! <root>/stacks/<name>/
//! <root>/projects/<name>/
//! ```
//!
//! A [`LayerOrder`] lists the layers taking part in one resolution, lowest
//! priority first: base, then the app, then stacks in caller order, then
//! the project. Anything else is rejected when the order is built.

use std::fmt;

use serde::{Deserialize, Serialize};
use vsc_fs::NormalizedPath;

use crate::{Error, Result};

/// The four kinds of layer, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Base,
    App,
    Stack,
    Project,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [Self::Base, Self::App, Self::Stack, Self::Project];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::App => "app",
            Self::Stack => "stack",
            Self::Project => "project",
        }
    }

    /// Directory under the configs root holding layers of this kind.
    ///
    /// For `Base` this is the layer directory itself.
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::App => "apps",
            Self::Stack => "stacks",
            Self::Project => "projects",
        }
    }

    /// Only stacks may appear more than once in an order.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Self::Stack)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a layer: its kind plus its name.
///
/// The base layer is always named `base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId {
    pub kind: LayerKind,
    pub name: String,
}

impl LayerId {
    pub fn new(kind: LayerKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn base() -> Self {
        Self::new(LayerKind::Base, "base")
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LayerKind::Base => f.write_str("base"),
            kind => write!(f, "{}:{}", kind, self.name),
        }
    }
}

/// A layer located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    id: LayerId,
    path: NormalizedPath,
}

impl Layer {
    /// Locate a layer under a configs root.
    ///
    /// Names must be a single non-empty path segment. The base layer ignores
    /// `name`.
    pub fn locate(root: &NormalizedPath, kind: LayerKind, name: &str) -> Result<Self> {
        if kind == LayerKind::Base {
            return Ok(Self {
                id: LayerId::base(),
                path: root.join(kind.directory()),
            });
        }

        validate_name(name)?;
        Ok(Self {
            id: LayerId::new(kind, name),
            path: root.join(kind.directory()).join(name),
        })
    }

    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.id.kind
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(Error::InvalidLayerName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Layers taking part in a resolution, lowest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerOrder {
    layers: Vec<Layer>,
}

impl LayerOrder {
    /// Validate and wrap an explicit layer list.
    ///
    /// Kinds must be non-decreasing (base, app, stacks, project), at most
    /// one base, app and project may appear, and no layer may appear twice.
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        let mut seen: Vec<&LayerId> = Vec::with_capacity(layers.len());
        let mut previous: Option<LayerKind> = None;

        for layer in &layers {
            if seen.contains(&layer.id()) {
                return Err(Error::AmbiguousSelection {
                    layer: layer.id().clone(),
                });
            }

            let kind = layer.kind();
            if let Some(prev) = previous {
                if kind < prev {
                    return Err(Error::InvalidLayerOrder {
                        reason: format!("{} layer {} follows a {} layer", kind, layer.id(), prev),
                    });
                }
                if kind == prev && !kind.is_repeatable() {
                    return Err(Error::InvalidLayerOrder {
                        reason: format!("more than one {} layer", kind),
                    });
                }
            }

            previous = Some(kind);
            seen.push(layer.id());
        }

        Ok(Self { layers })
    }

    /// Start building an order of layers under `root`.
    pub fn builder(root: impl Into<NormalizedPath>) -> LayerOrderBuilder {
        LayerOrderBuilder {
            root: root.into(),
            base: false,
            app: None,
            stacks: Vec::new(),
            project: None,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<'a> IntoIterator for &'a LayerOrder {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// Builder for a [`LayerOrder`] rooted at a configs directory.
///
/// The builder always emits layers in precedence order regardless of the
/// order its methods were called in; stacks keep their call order.
#[derive(Debug, Clone)]
pub struct LayerOrderBuilder {
    root: NormalizedPath,
    base: bool,
    app: Option<String>,
    stacks: Vec<String>,
    project: Option<String>,
}

impl LayerOrderBuilder {
    pub fn base(mut self) -> Self {
        self.base = true;
        self
    }

    pub fn app(mut self, name: impl Into<String>) -> Self {
        self.app = Some(name.into());
        self
    }

    pub fn stack(mut self, name: impl Into<String>) -> Self {
        self.stacks.push(name.into());
        self
    }

    pub fn stacks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stacks.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.project = Some(name.into());
        self
    }

    pub fn build(self) -> Result<LayerOrder> {
        let mut layers = Vec::new();
        if self.base {
            layers.push(Layer::locate(&self.root, LayerKind::Base, "base")?);
        }
        if let Some(app) = &self.app {
            layers.push(Layer::locate(&self.root, LayerKind::App, app)?);
        }
        for stack in &self.stacks {
            layers.push(Layer::locate(&self.root, LayerKind::Stack, stack)?);
        }
        if let Some(project) = &self.project {
            layers.push(Layer::locate(&self.root, LayerKind::Project, project)?);
        }
        LayerOrder::new(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> NormalizedPath {
        NormalizedPath::new("/configs")
    }

    #[test]
    fn builder_emits_precedence_order() {
        let order = LayerOrder::builder("/configs")
            .project("acme")
            .stack("python")
            .app("vscode")
            .stack("web")
            .base()
            .build()
            .unwrap();

        let names: Vec<String> = order.iter().map(|l| l.id().to_string()).collect();
        assert_eq!(
            names,
            vec!["base", "app:vscode", "stack:python", "stack:web", "project:acme"]
        );
        assert_eq!(order.layers()[1].path().as_str(), "/configs/apps/vscode");
        assert_eq!(order.layers()[0].path().as_str(), "/configs/base");
    }

    #[test]
    fn duplicate_stack_is_ambiguous() {
        let result = LayerOrder::builder("/configs")
            .stack("python")
            .stack("python")
            .build();
        assert!(matches!(result, Err(Error::AmbiguousSelection { .. })));
    }

    #[test]
    fn project_before_app_is_rejected() {
        let layers = vec![
            Layer::locate(&root(), LayerKind::Project, "acme").unwrap(),
            Layer::locate(&root(), LayerKind::App, "vscode").unwrap(),
        ];
        assert!(matches!(
            LayerOrder::new(layers),
            Err(Error::InvalidLayerOrder { .. })
        ));
    }

    #[test]
    fn two_apps_are_rejected() {
        let layers = vec![
            Layer::locate(&root(), LayerKind::App, "vscode").unwrap(),
            Layer::locate(&root(), LayerKind::App, "cursor").unwrap(),
        ];
        assert!(matches!(
            LayerOrder::new(layers),
            Err(Error::InvalidLayerOrder { .. })
        ));
    }

    #[test]
    fn empty_order_is_valid() {
        assert!(LayerOrder::new(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn names_must_be_single_segments() {
        for bad in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                Layer::locate(&root(), LayerKind::Stack, bad),
                Err(Error::InvalidLayerName { .. })
            ));
        }
    }
}
