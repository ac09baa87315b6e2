//! End-to-end workflow across the vsc-sync crates
//!
//! tool config -> layer order -> resolve -> status -> apply -> status

use std::collections::BTreeMap;
use std::thread;

use pretty_assertions::assert_eq;
use vsc_core::{
    AppDetails, ApplyOptions, ComponentKind, ComponentSet, LayerOrder, LocalState, SyncConfig,
    SyncState, diff, resolve, sort_keybindings_file, write_profile,
};
use vsc_fs::NormalizedPath;
use vsc_test_utils::LayerTree;

fn populated() -> LayerTree {
    let layers = LayerTree::new();
    layers
        .base()
        .settings(r#"{"editor.tabSize": 2, "editor.rulers": [80]}"#)
        .extensions(&["editorconfig.editorconfig"]);
    layers
        .app("vscode")
        .settings(r#"{"workbench.startupEditor": "none"}"#)
        .keybindings(r#"[{"key": "ctrl+b", "command": "b"}, {"key": "ctrl+a", "command": "a"}]"#);
    layers
        .app("cursor")
        .settings(r#"{"cursor.cpp.enabled": true}"#);
    layers
        .stack("python")
        .settings(r#"{"editor.tabSize": 4, "editor.rulers": [88]}"#)
        .extensions(&["ms-python.python"])
        .snippet("python.json", "{\"main\": {}}\n");
    layers
}

#[test]
fn registered_app_round_trip() {
    let layers = populated();
    let profile = layers.profile("Code/User");

    let config_path = NormalizedPath::new(layers.root().join("vsc-sync.toml"));
    let mut apps = BTreeMap::new();
    apps.insert(
        "vscode".to_string(),
        AppDetails {
            config_path: profile.path().to_path_buf(),
        },
    );
    SyncConfig {
        configs_path: layers.configs(),
        apps,
    }
    .save(&config_path)
    .unwrap();

    let config = SyncConfig::load(&config_path).unwrap();
    let target = NormalizedPath::new(&config.app("vscode").unwrap().config_path);
    let order = LayerOrder::builder(config.configs_root())
        .base()
        .app("vscode")
        .stack("python")
        .build()
        .unwrap();

    let resolved = resolve(&order, &ComponentSet::all()).unwrap();
    let settings = serde_json::to_value(resolved.settings.as_ref().unwrap()).unwrap();
    assert_eq!(
        settings,
        serde_json::json!({
            "editor.tabSize": 4,
            "editor.rulers": [80, 88],
            "workbench.startupEditor": "none"
        })
    );

    write_profile(&target, &resolved, &ApplyOptions::default()).unwrap();
    let statuses = diff(&LocalState::read(&target).unwrap(), &resolved);
    let not_in_sync: Vec<_> = statuses
        .iter()
        .filter(|s| s.state != SyncState::InSync)
        .collect();
    assert!(not_in_sync.is_empty(), "{not_in_sync:#?}");
}

#[test]
fn resolution_never_normalizes_keybindings() {
    let layers = populated();
    let order = LayerOrder::builder(layers.configs())
        .base()
        .app("vscode")
        .build()
        .unwrap();
    let requested: ComponentSet = [ComponentKind::Keybindings].into_iter().collect();

    let before = resolve(&order, &requested).unwrap().keybindings.unwrap();
    assert!(before.text().find("ctrl+b") < before.text().find("ctrl+a"));

    let file = NormalizedPath::new(layers.configs().join("apps/vscode/keybindings.json"));
    let outcome = sort_keybindings_file(&file, true).unwrap();
    assert!(outcome.changed);

    let after = resolve(&order, &requested).unwrap().keybindings.unwrap();
    assert!(after.text().find("ctrl+a") < after.text().find("ctrl+b"));
    assert_ne!(before.checksum(), after.checksum());
}

#[test]
fn concurrent_resolutions_for_two_apps() {
    let layers = populated();
    let root = layers.configs();

    let handles: Vec<_> = ["vscode", "cursor"]
        .into_iter()
        .map(|app| {
            let root = root.clone();
            thread::spawn(move || -> vsc_core::Result<_> {
                let order = LayerOrder::builder(root)
                    .base()
                    .app(app)
                    .stack("python")
                    .build()?;
                resolve(&order, &ComponentSet::all())
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    assert!(results[0].settings.as_ref().unwrap().contains_key("workbench.startupEditor"));
    assert!(results[1].settings.as_ref().unwrap().contains_key("cursor.cpp.enabled"));
    assert!(results[1].keybindings.is_none());
    assert_eq!(results[0].extensions, results[1].extensions);
}
