//! Component kinds and how each one combines across layers

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A kind of editor configuration file held by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Settings,
    Keybindings,
    Extensions,
    Tasks,
    Snippets,
}

/// How a component's per-layer values are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Fold every layer's tree through the deep merge
    DeepMerge,
    /// Concatenate every layer's list and drop repeats
    ListUnion,
    /// Union of files by relative path; the highest layer owns each file
    FileUnion,
    /// The highest layer providing the file supplies all of it
    WinnerTakesAll,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 5] = [
        Self::Settings,
        Self::Keybindings,
        Self::Extensions,
        Self::Tasks,
        Self::Snippets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Keybindings => "keybindings",
            Self::Extensions => "extensions",
            Self::Tasks => "tasks",
            Self::Snippets => "snippets",
        }
    }

    /// File (or directory, for snippets) name inside a layer or profile.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Settings => "settings.json",
            Self::Keybindings => "keybindings.json",
            Self::Extensions => "extensions.json",
            Self::Tasks => "tasks.json",
            Self::Snippets => "snippets",
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Settings => Strategy::DeepMerge,
            Self::Extensions => Strategy::ListUnion,
            Self::Snippets => Strategy::FileUnion,
            Self::Keybindings | Self::Tasks => Strategy::WinnerTakesAll,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower || kind.file_name() == lower)
            .ok_or_else(|| Error::UnknownComponent {
                name: s.to_string(),
                expected: Self::ALL.map(|k| k.as_str()).join(", "),
            })
    }
}

/// The set of components a caller asked for.
///
/// Iterates in [`ComponentKind`] declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSet {
    kinds: BTreeSet<ComponentKind>,
}

impl ComponentSet {
    pub fn all() -> Self {
        Self::from_iter(ComponentKind::ALL)
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn without(mut self, kind: ComponentKind) -> Self {
        self.kinds.remove(&kind);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.kinds.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for ComponentSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<ComponentKind> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = ComponentKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_file_names() {
        assert_eq!("settings".parse::<ComponentKind>().unwrap(), ComponentKind::Settings);
        assert_eq!(
            "keybindings.json".parse::<ComponentKind>().unwrap(),
            ComponentKind::Keybindings
        );
        assert_eq!("Snippets".parse::<ComponentKind>().unwrap(), ComponentKind::Snippets);
    }

    #[test]
    fn unknown_component_lists_choices() {
        let err = "themes".parse::<ComponentKind>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("themes"));
        assert!(message.contains("settings, keybindings, extensions, tasks, snippets"));
    }

    #[test]
    fn strategies_per_kind() {
        assert_eq!(ComponentKind::Settings.strategy(), Strategy::DeepMerge);
        assert_eq!(ComponentKind::Extensions.strategy(), Strategy::ListUnion);
        assert_eq!(ComponentKind::Snippets.strategy(), Strategy::FileUnion);
        assert_eq!(ComponentKind::Keybindings.strategy(), Strategy::WinnerTakesAll);
        assert_eq!(ComponentKind::Tasks.strategy(), Strategy::WinnerTakesAll);
    }

    #[test]
    fn set_iterates_in_declaration_order() {
        let set: ComponentSet = [ComponentKind::Snippets, ComponentKind::Settings]
            .into_iter()
            .collect();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![ComponentKind::Settings, ComponentKind::Snippets]
        );
        assert!(!ComponentSet::all().without(ComponentKind::Tasks).contains(ComponentKind::Tasks));
    }
}
