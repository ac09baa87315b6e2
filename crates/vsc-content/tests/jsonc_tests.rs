//! Tests for reading VS Code style files

use pretty_assertions::assert_eq;
use rstest::rstest;
use vsc_content::{Error, Node, jsonc};

#[test]
fn test_keybindings_file_with_comments() {
    let source = r#"// Place your key bindings in this file to override the defaults
[
    {
        "key": "ctrl+shift+t",
        "command": "workbench.action.terminal.new",
        "when": "terminalFocus"
    },
    // disabled default
    { "key": "-ctrl+k", "command": "deleteAllRight" },
]
"#;
    let items = jsonc::parse_sequence(source).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[1].as_mapping().and_then(|m| m.get("key")).and_then(Node::as_str),
        Some("-ctrl+k")
    );
}

#[test]
fn test_extra_fields_keep_source_order() {
    let items =
        jsonc::parse_sequence(r#"[{"key": "a", "command": "c", "args": {"z": 1, "a": 2}}]"#).unwrap();
    let text = serde_json::to_string(&items).unwrap();
    assert_eq!(text, r#"[{"key":"a","command":"c","args":{"z":1,"a":2}}]"#);
}

#[rstest]
#[case("{\"a\": 1,}")]
#[case("{a: 1}")]
#[case("/* c */ {\"a\": 1}")]
fn test_lenient_syntax_is_accepted(#[case] source: &str) {
    let mapping = jsonc::parse_mapping(source).unwrap();
    assert!(mapping.contains_key("a"));
}

#[rstest]
#[case("{\"a\": 1")]
#[case("not json")]
fn test_broken_syntax_is_rejected(#[case] source: &str) {
    assert!(matches!(jsonc::parse_mapping(source), Err(Error::ParseError { .. })));
}

#[test]
fn test_recommendations_parse_as_typed_struct() {
    #[derive(serde::Deserialize)]
    struct Extensions {
        recommendations: Vec<String>,
    }

    let parsed: Extensions = jsonc::parse_as(
        r#"{
            // shared
            "recommendations": ["ms-python.python", "rust-lang.rust-analyzer",],
        }"#,
    )
    .unwrap();
    assert_eq!(
        parsed.recommendations,
        vec!["ms-python.python", "rust-lang.rust-analyzer"]
    );
}

#[test]
fn test_settings_with_large_integers_round_trip() {
    let source = r#"{
    // inode limits copied from the remote host
    "files.watcherMaxInotifyWatches": 18446744073709551615,
    "remote.SSH.connectTimeout": 9223372036854775807,
}"#;
    let mapping = jsonc::parse_mapping(source).unwrap();
    let written = jsonc::to_pretty_string(&mapping).unwrap();
    assert_eq!(
        written,
        "{\n  \"files.watcherMaxInotifyWatches\": 18446744073709551615,\n  \"remote.SSH.connectTimeout\": 9223372036854775807\n}\n"
    );
    assert_eq!(jsonc::parse_mapping(&written).unwrap(), mapping);
}
