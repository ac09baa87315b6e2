//! Layers command implementation

use colored::Colorize;
use serde_json::json;
use vsc_core::LayerKind;

use crate::context::Context;
use crate::error::Result;

/// Run the layers command
pub fn run_layers(context: &Context, json: bool) -> Result<()> {
    context.ensure_configs_root()?;
    let reader = context.reader();

    let mut listing = Vec::with_capacity(LayerKind::ALL.len());
    for kind in LayerKind::ALL {
        listing.push((kind, reader.list(kind)?));
    }

    if json {
        let output: serde_json::Map<String, serde_json::Value> = listing
            .iter()
            .map(|(kind, names)| (kind.directory().to_string(), json!(names)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", "Layers in".bold(), context.configs_root().as_str().yellow());
    for (kind, names) in &listing {
        println!();
        println!("{}:", kind.directory().bold());
        if names.is_empty() {
            println!("  {}", "None".dimmed());
        }
        for name in names {
            println!("  {} {}", "+".green(), name.cyan());
        }
    }
    Ok(())
}
