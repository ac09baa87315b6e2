//! Resolution over real layer directories

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use vsc_content::{Mapping, Node};
use vsc_core::{
    ComponentKind, ComponentSet, Error, LayerId, LayerKind, LayerOrder, LayerReader, resolve,
};
use vsc_test_utils::LayerTree;

fn tree(value: serde_json::Value) -> Mapping {
    Node::from(value).into_mapping().unwrap()
}

fn order(tree: &LayerTree, app: &str, stacks: &[&str]) -> LayerOrder {
    LayerOrder::builder(tree.configs())
        .base()
        .app(app)
        .stacks(stacks.iter().copied())
        .build()
        .unwrap()
}

#[test]
fn highest_layer_scalar_wins() {
    let layers = LayerTree::new();
    layers.base().settings(r#"{"editor.tabSize": 2}"#);
    layers.app("vscode").settings(r#"{"editor.tabSize": 4}"#);
    layers.stack("python").settings(r#"{"editor.tabSize": 8}"#);

    let resolved = resolve(&order(&layers, "vscode", &["python"]), &ComponentSet::all()).unwrap();
    assert_eq!(resolved.settings, Some(tree(json!({"editor.tabSize": 8}))));
}

#[test]
fn extension_recommendations_union() {
    let layers = LayerTree::new();
    layers.base().extensions(&["a", "b"]);
    layers.app("vscode");
    layers.stack("python").extensions(&["b", "c"]);

    let resolved = resolve(&order(&layers, "vscode", &["python"]), &ComponentSet::all()).unwrap();
    assert_eq!(
        resolved.extensions,
        Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
}

#[test]
fn keybindings_from_rightmost_providing_stack() {
    let layers = LayerTree::new();
    layers.base().keybindings(r#"[{"key": "ctrl+a", "command": "base"}]"#);
    layers.app("vscode");
    layers.stack("stack1");
    layers.stack("stack2").keybindings("// stack2\n[{\"key\": \"ctrl+a\", \"command\": \"two\"},]\n");

    let resolved = resolve(
        &order(&layers, "vscode", &["stack1", "stack2"]),
        &ComponentSet::all(),
    )
    .unwrap();

    assert_eq!(
        resolved.source_of(ComponentKind::Keybindings),
        Some(&LayerId::new(LayerKind::Stack, "stack2"))
    );
}

#[test]
fn winner_file_is_passed_through_byte_for_byte() {
    let layers = LayerTree::new();
    let stack1_source = "[\n    // unsorted on purpose\n    {\"key\": \"b\"}, {\"key\": \"a\"},\n]";
    layers.base().keybindings("[]");
    layers.app("vscode");
    layers.stack("stack1").keybindings(stack1_source);
    layers.stack("stack2");

    let resolved = resolve(
        &order(&layers, "vscode", &["stack1", "stack2"]),
        &ComponentSet::all(),
    )
    .unwrap();

    let winner = resolved.keybindings.unwrap();
    assert_eq!(winner.origin, LayerId::new(LayerKind::Stack, "stack1"));
    assert_eq!(winner.content, stack1_source.as_bytes());
}

#[test]
fn swapping_stacks_changes_the_result() {
    let layers = LayerTree::new();
    layers.base();
    layers.app("vscode");
    layers.stack("python").settings(r#"{"editor.formatOnSave": true}"#);
    layers.stack("web").settings(r#"{"editor.formatOnSave": false}"#);

    let forward = resolve(&order(&layers, "vscode", &["python", "web"]), &ComponentSet::all()).unwrap();
    let backward = resolve(&order(&layers, "vscode", &["web", "python"]), &ComponentSet::all()).unwrap();

    assert_eq!(forward.settings, Some(tree(json!({"editor.formatOnSave": false}))));
    assert_eq!(backward.settings, Some(tree(json!({"editor.formatOnSave": true}))));
}

#[test]
fn project_layer_has_highest_priority() {
    let layers = LayerTree::new();
    layers.base().tasks(r#"{"version": "2.0.0", "tasks": []}"#);
    layers.app("vscode");
    layers.project("acme").tasks(r#"{"version": "2.0.0", "tasks": [{"label": "build"}]}"#);

    let order = LayerOrder::builder(layers.configs())
        .base()
        .app("vscode")
        .project("acme")
        .build()
        .unwrap();
    let resolved = resolve(&order, &ComponentSet::all()).unwrap();
    assert_eq!(
        resolved.source_of(ComponentKind::Tasks),
        Some(&LayerId::new(LayerKind::Project, "acme"))
    );
}

#[test]
fn missing_named_layer_is_reported() {
    let layers = LayerTree::new();
    layers.base();
    layers.app("vscode");

    let err = resolve(&order(&layers, "vscode", &["rust"]), &ComponentSet::all()).unwrap_err();
    match err {
        Error::LayerNotFound { layer, .. } => {
            assert_eq!(layer, LayerId::new(LayerKind::Stack, "rust"));
        }
        other => panic!("expected LayerNotFound, got {other}"),
    }
}

#[rstest]
#[case::settings("settings.json", r#"{"a": [1, }"#)]
#[case::keybindings("keybindings.json", r#"{"key": "ctrl+a"}"#)]
#[case::extensions("extensions.json", r#"{"recommendations": "a.b"}"#)]
#[case::tasks("tasks.json", r#"["not", "an", "object"]"#)]
fn malformed_component_fails_resolution(#[case] file: &str, #[case] content: &str) {
    let layers = LayerTree::new();
    layers.base();
    layers.app("vscode").file(file, content);

    let err = resolve(&order(&layers, "vscode", &[]), &ComponentSet::all()).unwrap_err();
    assert!(
        matches!(err, Error::MalformedComponentFile { .. }),
        "got {err}"
    );
}

#[test]
fn malformed_unrequested_component_is_ignored() {
    let layers = LayerTree::new();
    layers.base().settings(r#"{"a": 1}"#).tasks("{{{");
    layers.app("vscode");

    let requested: ComponentSet = [ComponentKind::Settings].into_iter().collect();
    let resolved = resolve(&order(&layers, "vscode", &[]), &requested).unwrap();
    assert_eq!(resolved.settings, Some(tree(json!({"a": 1}))));
}

#[test]
fn absent_components_are_listed() {
    let layers = LayerTree::new();
    layers.base().settings("{}");
    layers.app("vscode");

    let resolved = resolve(&order(&layers, "vscode", &[]), &ComponentSet::all()).unwrap();
    assert_eq!(
        resolved.absent(),
        vec![
            ComponentKind::Keybindings,
            ComponentKind::Extensions,
            ComponentKind::Tasks,
            ComponentKind::Snippets,
        ]
    );
}

#[test]
fn snippets_union_across_layers() {
    let layers = LayerTree::new();
    layers
        .base()
        .snippet("global.code-snippets", "base-global")
        .snippet("python.json", "base-python");
    layers.app("vscode");
    layers.stack("python").snippet("python.json", "stack-python");

    let resolved = resolve(&order(&layers, "vscode", &["python"]), &ComponentSet::all()).unwrap();
    let snippets = resolved.snippets.unwrap();
    assert_eq!(snippets["global.code-snippets"].content, b"base-global");
    assert_eq!(snippets["python.json"].content, b"stack-python");
}

#[test]
fn layer_reader_lists_each_kind() {
    let layers = LayerTree::new();
    layers.base();
    layers.app("vscode");
    layers.app("cursor");
    layers.stack("python");

    let reader = LayerReader::new(layers.configs());
    assert_eq!(reader.list(LayerKind::Base).unwrap(), vec!["base"]);
    assert_eq!(reader.list(LayerKind::App).unwrap(), vec!["cursor", "vscode"]);
    assert_eq!(reader.list(LayerKind::Stack).unwrap(), vec!["python"]);
    assert!(reader.list(LayerKind::Project).unwrap().is_empty());
}
