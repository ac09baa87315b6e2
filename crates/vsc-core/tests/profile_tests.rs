//! Status and apply against an editor profile directory

use pretty_assertions::assert_eq;
use vsc_core::{
    ApplyOptions, ComponentKind, ComponentSet, FileChange, LayerOrder, LocalState, SyncState,
    diff, resolve, write_profile,
};
use vsc_fs::NormalizedPath;
use vsc_test_utils::LayerTree;

fn populated() -> LayerTree {
    let layers = LayerTree::new();
    layers
        .base()
        .settings(r#"{"editor.tabSize": 2, "files.eol": "\n"}"#)
        .extensions(&["editorconfig.editorconfig"])
        .snippet("global.code-snippets", "{}\n");
    layers
        .app("vscode")
        .settings(r#"{"workbench.colorTheme": "Default Dark+"}"#)
        .keybindings("[\n  {\"key\": \"ctrl+k\", \"command\": \"x\"}\n]\n");
    layers
        .stack("python")
        .settings(r#"{"editor.tabSize": 4}"#)
        .extensions(&["ms-python.python"])
        .tasks(r#"{"version": "2.0.0", "tasks": []}"#);
    layers
}

fn order(layers: &LayerTree) -> LayerOrder {
    LayerOrder::builder(layers.configs())
        .base()
        .app("vscode")
        .stack("python")
        .build()
        .unwrap()
}

#[test]
fn apply_then_status_is_in_sync() {
    let layers = populated();
    let profile = layers.profile("Code");
    let target = NormalizedPath::new(profile.path());
    let resolved = resolve(&order(&layers), &ComponentSet::all()).unwrap();

    let before = diff(&LocalState::read(&target).unwrap(), &resolved);
    assert!(before.iter().all(|s| s.state == SyncState::WouldChange));

    let actions = write_profile(&target, &resolved, &ApplyOptions::default())
        .unwrap()
        .actions;
    assert_eq!(actions.len(), 5);
    assert!(actions.iter().all(|a| a.change == FileChange::Create));

    let after = diff(&LocalState::read(&target).unwrap(), &resolved);
    assert!(
        after.iter().all(|s| s.state == SyncState::InSync),
        "{after:#?}"
    );
    layers.assert_file_contains("profiles/Code/settings.json", "\"editor.tabSize\": 4");
    layers.assert_file_contains("profiles/Code/extensions.json", "ms-python.python");
    layers.assert_file_exists("profiles/Code/snippets/global.code-snippets");
}

#[test]
fn local_edits_are_detected() {
    let layers = populated();
    let profile = layers.profile("Code");
    let target = NormalizedPath::new(profile.path());
    let resolved = resolve(&order(&layers), &ComponentSet::all()).unwrap();
    write_profile(&target, &resolved, &ApplyOptions::default()).unwrap();

    profile
        .settings(r#"{"editor.tabSize": 4, "files.eol": "\n", "workbench.colorTheme": "Light"}"#)
        .snippet("mine.json", "{}");

    let statuses = diff(&LocalState::read(&target).unwrap(), &resolved);
    let settings = statuses
        .iter()
        .find(|s| s.component == ComponentKind::Settings)
        .unwrap();
    assert_eq!(settings.state, SyncState::WouldChange);
    assert_eq!(settings.details, vec!["~ workbench.colorTheme"]);

    let snippets = statuses
        .iter()
        .find(|s| s.component == ComponentKind::Snippets)
        .unwrap();
    assert_eq!(snippets.state, SyncState::LocalOnly);
}

#[test]
fn skipping_tasks_leaves_them_untouched() {
    let layers = populated();
    let profile = layers.profile("Code");
    profile.tasks(r#"{"mine": true}"#);
    let target = NormalizedPath::new(profile.path());

    let requested = ComponentSet::all().without(ComponentKind::Tasks);
    let resolved = resolve(&order(&layers), &requested).unwrap();
    let actions = write_profile(&target, &resolved, &ApplyOptions::default())
        .unwrap()
        .actions;

    assert!(actions.iter().all(|a| a.component != ComponentKind::Tasks));
    assert_eq!(layers.read("profiles/Code/tasks.json"), r#"{"mine": true}"#);
}
