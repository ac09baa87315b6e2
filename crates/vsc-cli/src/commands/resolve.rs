//! Resolve command implementation
//!
//! Prints the effective configuration for a layer selection.

use colored::Colorize;
use serde_json::{Value, json};
use vsc_core::{ComponentKind, ComponentSet, ResolvedConfiguration, resolve};
use vsc_content::jsonc;
use vsc_fs::checksum;

use super::layer_chain;
use crate::cli::Selection;
use crate::context::Context;
use crate::error::Result;

/// Run the resolve command.
///
/// With no `components` every kind is resolved and absent ones are reported.
/// Components named explicitly must be provided by some layer.
pub fn run_resolve(
    context: &Context,
    selection: &Selection,
    components: &[String],
    json: bool,
) -> Result<()> {
    let requested = if components.is_empty() {
        ComponentSet::all()
    } else {
        components
            .iter()
            .map(|name| name.parse::<ComponentKind>())
            .collect::<vsc_core::Result<ComponentSet>>()?
    };

    let order = context.layer_order(selection)?;
    let resolved = resolve(&order, &requested)?;

    if !components.is_empty() {
        for kind in requested.iter() {
            resolved.require(kind)?;
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&resolved))?);
    } else {
        print_resolved(&resolved)?;
    }
    Ok(())
}

fn to_json(resolved: &ResolvedConfiguration) -> Value {
    let file = |file: &vsc_core::ComponentFile| {
        json!({
            "source": file.origin.to_string(),
            "checksum": file.checksum(),
            "content": file.text(),
        })
    };

    let mut components = serde_json::Map::new();
    for kind in resolved.requested.iter() {
        let value = match kind {
            ComponentKind::Settings => resolved
                .settings
                .as_ref()
                .map(|s| Value::from(&vsc_content::Node::Mapping(s.clone()))),
            ComponentKind::Extensions => resolved.extensions.as_ref().map(|e| json!(e)),
            ComponentKind::Keybindings => resolved.keybindings.as_ref().map(file),
            ComponentKind::Tasks => resolved.tasks.as_ref().map(file),
            ComponentKind::Snippets => resolved.snippets.as_ref().map(|snippets| {
                let files = snippets
                    .iter()
                    .map(|(relative, f)| {
                        (
                            relative.clone(),
                            json!({"source": f.origin.to_string(), "checksum": f.checksum()}),
                        )
                    })
                    .collect::<serde_json::Map<_, _>>();
                Value::Object(files)
            }),
        };
        components.insert(kind.to_string(), value.unwrap_or(Value::Null));
    }

    json!({
        "layers": resolved.layers.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "components": components,
        "absent": resolved.absent().iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

fn print_resolved(resolved: &ResolvedConfiguration) -> Result<()> {
    println!("{} {}", "Resolved".blue().bold(), layer_chain(&resolved.layers));

    for kind in resolved.requested.iter() {
        println!();
        if !resolved.is_present(kind) {
            println!("{} {}", kind.to_string().bold(), "(absent)".dimmed());
            continue;
        }

        match kind {
            ComponentKind::Settings => {
                if let Some(settings) = &resolved.settings {
                    println!("{} ({} keys)", kind.to_string().bold(), settings.len());
                    print_indented(&jsonc::to_pretty_string(settings)?);
                }
            }
            ComponentKind::Extensions => {
                if let Some(extensions) = &resolved.extensions {
                    println!("{} ({})", kind.to_string().bold(), extensions.len());
                    for id in extensions {
                        println!("  {} {}", "+".green(), id);
                    }
                }
            }
            ComponentKind::Keybindings | ComponentKind::Tasks => {
                let file = match kind {
                    ComponentKind::Keybindings => resolved.keybindings.as_ref(),
                    _ => resolved.tasks.as_ref(),
                };
                if let Some(file) = file {
                    println!(
                        "{} from {} {}",
                        kind.to_string().bold(),
                        file.origin.to_string().cyan(),
                        checksum::short(&file.checksum()).dimmed()
                    );
                }
            }
            ComponentKind::Snippets => {
                if let Some(snippets) = &resolved.snippets {
                    println!("{} ({} files)", kind.to_string().bold(), snippets.len());
                    for (relative, file) in snippets {
                        println!("  {} {}", relative, format!("({})", file.origin).dimmed());
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_indented(text: &str) {
    for line in text.lines() {
        println!("  {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsc_core::{LayerContents, LayerId, LayerKind, resolve_contents};

    #[test]
    fn json_lists_absent_components_as_null() {
        let contents = vec![
            LayerContents::empty(LayerId::base()).with_extensions(["a.b"]),
            LayerContents::empty(LayerId::new(LayerKind::App, "vscode")).with_tasks("{}"),
        ];
        let resolved = resolve_contents(&contents, &ComponentSet::all()).unwrap();
        let value = to_json(&resolved);

        assert_eq!(value["layers"], json!(["base", "app:vscode"]));
        assert_eq!(value["components"]["extensions"], json!(["a.b"]));
        assert_eq!(value["components"]["tasks"]["source"], json!("app:vscode"));
        assert_eq!(value["components"]["settings"], Value::Null);
        assert_eq!(value["absent"], json!(["settings", "keybindings", "snippets"]));
    }
}
