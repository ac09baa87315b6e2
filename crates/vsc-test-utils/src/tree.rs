//! [`LayerTree`] builder for layered configs test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a configs repository under `configs/`
/// and editor profile directories under `profiles/`.
///
/// # Example
///
/// ```rust,no_run
/// use vsc_test_utils::LayerTree;
///
/// let tree = LayerTree::new();
/// tree.base().settings(r#"{"editor.tabSize": 2}"#);
/// tree.stack("python").keybindings("[]").snippet("python.json", "{}");
/// tree.assert_file_exists("configs/stacks/python/snippets/python.json");
/// ```
pub struct LayerTree {
    temp_dir: TempDir,
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerTree {
    /// Create an empty temporary directory with an empty `configs/` root.
    pub fn new() -> Self {
        let tree = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(tree.configs()).unwrap();
        tree
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The configs repository root.
    pub fn configs(&self) -> PathBuf {
        self.root().join("configs")
    }

    pub fn base(&self) -> LayerDir {
        LayerDir::create(self.configs().join("base"))
    }

    pub fn app(&self, name: &str) -> LayerDir {
        LayerDir::create(self.configs().join("apps").join(name))
    }

    pub fn stack(&self, name: &str) -> LayerDir {
        LayerDir::create(self.configs().join("stacks").join(name))
    }

    pub fn project(&self, name: &str) -> LayerDir {
        LayerDir::create(self.configs().join("projects").join(name))
    }

    /// An editor profile directory, created empty.
    pub fn profile(&self, name: &str) -> LayerDir {
        LayerDir::create(self.root().join("profiles").join(name))
    }

    /// Write `content` at `path` relative to the root, creating parents.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        write_file(&full_path, content);
        full_path
    }

    /// Read the file at `path` relative to the root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the root) contains
    /// `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}

/// One layer (or profile) directory. Every method writes immediately and
/// returns `&Self` so calls can be chained.
pub struct LayerDir {
    path: PathBuf,
}

impl LayerDir {
    fn create(path: PathBuf) -> Self {
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self, content: &str) -> &Self {
        self.file("settings.json", content)
    }

    pub fn keybindings(&self, content: &str) -> &Self {
        self.file("keybindings.json", content)
    }

    pub fn tasks(&self, content: &str) -> &Self {
        self.file("tasks.json", content)
    }

    /// Write an `extensions.json` recommending `ids`.
    pub fn extensions(&self, ids: &[&str]) -> &Self {
        let list = ids
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(", ");
        self.file("extensions.json", &format!("{{\"recommendations\": [{list}]}}\n"))
    }

    /// Write a snippet file at `relative` below `snippets/`.
    pub fn snippet(&self, relative: &str, content: &str) -> &Self {
        self.file(&format!("snippets/{relative}"), content)
    }

    /// Write any file at `relative` inside this directory.
    pub fn file(&self, relative: &str, content: &str) -> &Self {
        write_file(&self.path.join(relative), content);
        self
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
