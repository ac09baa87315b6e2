//! JSON-with-comments codec
//!
//! Editor config files allow `//` and `/* */` comments and trailing commas.
//! Those are blanked out and the rest is parsed by `serde_json`, which keeps
//! integers beyond `i64` as `u64` (or `f64` past that). Documents that are
//! not JSONC but are valid JSON5 (unquoted keys, single quotes) are retried
//! with the `json5` parser. Output is always plain pretty-printed JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::tree::{Mapping, Node};

const FORMAT: &str = "JSONC";

fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{feff}').unwrap_or(source)
}

/// Replace comments with spaces, keeping newlines so error positions still
/// match the source. String literals are left untouched.
fn blank_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                out.push(' ');
                while chars.peek().is_some_and(|next| *next != '\n') {
                    chars.next();
                    out.push(' ');
                }
            }
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");
                let mut previous = '\0';
                for next in chars.by_ref() {
                    out.push(if next == '\n' { '\n' } else { ' ' });
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Replace commas that directly precede `]` or `}` with a space.
fn blank_trailing_commas(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut in_string = false;
    let mut escaped = false;

    for (index, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => in_string = true,
            ',' => {
                let next = chars[index + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some(']' | '}')) {
                    out.push(' ');
                    continue;
                }
            }
            _ => {}
        }
        out.push(c);
    }
    out
}

fn decode<T: DeserializeOwned>(source: &str) -> Result<T> {
    let source = strip_bom(source);
    let plain = blank_trailing_commas(&blank_comments(source));
    match serde_json::from_str::<T>(&plain) {
        Ok(value) => Ok(value),
        Err(jsonc_error) => json5::from_str::<T>(source)
            .map_err(|_| Error::parse(FORMAT, jsonc_error.to_string())),
    }
}

/// Parse a JSONC document into a tree.
pub fn parse(source: &str) -> Result<Node> {
    decode(source)
}

/// Parse a JSONC document into any deserializable type.
pub fn parse_as<T: DeserializeOwned>(source: &str) -> Result<T> {
    decode(source)
}

/// Parse a document whose top level must be an object.
///
/// A blank file is treated as an empty object.
pub fn parse_mapping(source: &str) -> Result<Mapping> {
    if strip_bom(source).trim().is_empty() {
        return Ok(Mapping::new());
    }
    match parse(source)? {
        Node::Mapping(m) => Ok(m),
        other => Err(Error::shape("object", other.kind_name())),
    }
}

/// Parse a document whose top level must be an array.
///
/// A blank file is treated as an empty array.
pub fn parse_sequence(source: &str) -> Result<Vec<Node>> {
    if strip_bom(source).trim().is_empty() {
        return Ok(Vec::new());
    }
    match parse(source)? {
        Node::Sequence(items) => Ok(items),
        other => Err(Error::shape("array", other.kind_name())),
    }
}

/// Pretty-print a value as JSON with two-space indentation and a trailing
/// newline.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Scalar;

    #[test]
    fn parse_accepts_comments_and_trailing_commas() {
        let source = r#"
// header comment
{
    /* block */
    "editor.tabSize": 2, // inline
    "files.exclude": { "**/.git": true, },
}
"#;
        let mapping = parse_mapping(source).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.get("editor.tabSize"),
            Some(&Node::Scalar(Scalar::Number(2.into())))
        );
    }

    #[test]
    fn parse_strips_byte_order_mark() {
        let mapping = parse_mapping("\u{feff}{\"a\": 1}").unwrap();
        assert!(mapping.contains_key("a"));
    }

    #[test]
    fn blank_documents_are_empty() {
        assert!(parse_mapping("  \n").unwrap().is_empty());
        assert!(parse_sequence("").unwrap().is_empty());
    }

    #[test]
    fn wrong_top_level_shape_is_rejected() {
        let err = parse_mapping("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::UnexpectedShape { ref found, .. } if found == "array"));

        let err = parse_sequence("{}").unwrap_err();
        assert!(matches!(err, Error::UnexpectedShape { ref found, .. } if found == "object"));
    }

    #[test]
    fn invalid_syntax_is_a_parse_error() {
        assert!(matches!(parse("{\"a\": }"), Err(Error::ParseError { .. })));
    }

    #[test]
    fn integers_beyond_i64_are_kept() {
        let source = r#"{"x": 18446744073709551615, "y": -9223372036854775808}"#;
        let mapping = parse_mapping(source).unwrap();
        assert_eq!(
            mapping.get("x"),
            Some(&Node::Scalar(Scalar::Number(u64::MAX.into())))
        );
        assert_eq!(
            to_pretty_string(&mapping).unwrap(),
            "{\n  \"x\": 18446744073709551615,\n  \"y\": -9223372036854775808\n}\n"
        );
    }

    #[test]
    fn integers_beyond_u64_become_floats() {
        let mapping = parse_mapping(r#"{"x": 100000000000000000000}"#).unwrap();
        assert!(matches!(
            mapping.get("x"),
            Some(Node::Scalar(Scalar::Number(n))) if n.as_f64() == Some(1e20) && !n.is_u64()
        ));
    }

    #[test]
    fn comment_markers_inside_strings_are_kept() {
        let mapping = parse_mapping(
            r#"{"url": "http://example.com/*x*/", "quote": "a\"//b", "list": "[1,]"}"#,
        )
        .unwrap();
        assert_eq!(mapping.get("url").and_then(Node::as_str), Some("http://example.com/*x*/"));
        assert_eq!(mapping.get("quote").and_then(Node::as_str), Some("a\"//b"));
        assert_eq!(mapping.get("list").and_then(Node::as_str), Some("[1,]"));
    }

    #[test]
    fn trailing_comma_before_comment_is_dropped() {
        let items = parse_sequence("[1, 2, // last\n]").unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn pretty_output_ends_with_newline() {
        let mapping = parse_mapping(r#"{"b": 1, "a": [true]}"#).unwrap();
        let text = to_pretty_string(&mapping).unwrap();
        assert_eq!(text, "{\n  \"b\": 1,\n  \"a\": [\n    true\n  ]\n}\n");
    }
}
