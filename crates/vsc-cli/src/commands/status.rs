//! Status command implementation

use colored::Colorize;
use serde_json::json;
use vsc_core::{ComponentSet, ComponentStatus, LayerId, LocalState, SyncState, diff, resolve};
use vsc_fs::NormalizedPath;

use super::layer_chain;
use crate::cli::Selection;
use crate::context::Context;
use crate::error::Result;

/// Run the status command
pub fn run_status(
    context: &Context,
    selection: &Selection,
    target: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let checked = check(context, selection, target)?;

    if json {
        let output = json!({
            "target": checked.target.as_str(),
            "layers": checked.layers.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "in_sync": checked.in_sync(),
            "components": checked.statuses,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_status(&checked.target, &checked.layers, &checked.statuses);
    }
    Ok(())
}

/// Run the status command for every app registered in the tool config.
///
/// Each app is resolved from the base and its own app layer. An app that
/// cannot be checked is reported in its row; the others still run.
pub fn run_status_all(context: &Context, json: bool) -> Result<()> {
    context.ensure_configs_root()?;

    let rows: Vec<(&str, Result<Checked>)> = context
        .registered_apps()
        .keys()
        .map(|alias| {
            let selection = Selection {
                app: alias.clone(),
                stacks: Vec::new(),
                project: None,
            };
            (alias.as_str(), check(context, &selection, None))
        })
        .collect();

    if json {
        let apps: Vec<_> = rows
            .iter()
            .map(|(app, outcome)| match outcome {
                Ok(checked) => json!({
                    "app": app,
                    "target": checked.target.as_str(),
                    "in_sync": checked.in_sync(),
                    "components": checked.statuses,
                }),
                Err(e) => json!({ "app": app, "error": e.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json!({ "apps": apps }))?);
    } else {
        print_summary(&rows);
    }
    Ok(())
}

struct Checked {
    target: NormalizedPath,
    layers: Vec<LayerId>,
    statuses: Vec<ComponentStatus>,
}

impl Checked {
    fn in_sync(&self) -> bool {
        self.statuses.iter().all(|s| s.state == SyncState::InSync)
    }
}

fn check(context: &Context, selection: &Selection, target: Option<&std::path::Path>) -> Result<Checked> {
    let order = context.layer_order(selection)?;
    let target = context.target_dir(selection, target)?;
    let resolved = resolve(&order, &ComponentSet::all())?;
    let local = LocalState::read(&target)?;
    let statuses = diff(&local, &resolved);
    Ok(Checked {
        target,
        layers: resolved.layers,
        statuses,
    })
}

fn print_summary(rows: &[(&str, Result<Checked>)]) {
    println!("{}", "Registered Apps".bold());
    println!();

    if rows.is_empty() {
        println!("No apps registered. Add an {} table to the tool config.", "[apps.<alias>]".cyan());
        return;
    }

    let width = rows.iter().map(|(app, _)| app.len()).max().unwrap_or(0);
    for (app, outcome) in rows {
        match outcome {
            Ok(checked) if checked.in_sync() => println!(
                "  {:<width$}  {:<14} {}",
                app,
                "in-sync".green(),
                checked.target.as_str().dimmed()
            ),
            Ok(checked) => {
                let pending = checked
                    .statuses
                    .iter()
                    .filter(|s| s.state != SyncState::InSync)
                    .count();
                println!(
                    "  {:<width$}  {:<14} {} ({} component(s))",
                    app,
                    "out-of-sync".yellow(),
                    checked.target.as_str().dimmed(),
                    pending
                );
            }
            Err(e) => println!("  {:<width$}  {:<14} {}", app, "ERROR".red().bold(), e),
        }
    }
    println!();

    if rows.iter().any(|(_, outcome)| matches!(outcome, Ok(c) if !c.in_sync())) {
        println!("Run {} for details.", "vsc-sync status --app <alias>".cyan());
    }
}

fn print_status(target: &NormalizedPath, layers: &[LayerId], statuses: &[ComponentStatus]) {
    println!("{}", "Profile Status".bold());
    println!();
    println!("{}: {}", "Target".dimmed(), target.as_str().yellow());
    println!("{}: {}", "Layers".dimmed(), layer_chain(layers));
    println!();

    for status in statuses {
        let (marker, state) = match status.state {
            SyncState::InSync => ("=".green(), status.state.as_str().green()),
            SyncState::WouldChange => ("~".yellow(), status.state.as_str().yellow()),
            SyncState::LocalOnly => ("?".blue(), status.state.as_str().blue()),
        };
        let source = status
            .source
            .as_ref()
            .map(|id| format!(" (from {})", id).dimmed().to_string())
            .unwrap_or_default();
        println!(
            "  {} {:<12} {}{}",
            marker,
            status.component.to_string(),
            state,
            source
        );
        for detail in &status.details {
            println!("      {}", detail.dimmed());
        }
    }
    println!();

    if statuses.iter().all(|s| s.state == SyncState::InSync) {
        println!("{} Profile is in sync.", "OK".green().bold());
    } else if statuses.iter().any(|s| s.state == SyncState::WouldChange) {
        println!("Run {} to update the profile.", "vsc-sync apply".cyan());
    }
}
