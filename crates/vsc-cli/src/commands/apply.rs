//! Apply command implementation

use colored::Colorize;
use vsc_core::{
    ApplyOptions, ApplyReport, BackupPolicy, ComponentKind, ComponentSet, FileChange, resolve,
    write_profile,
};
use vsc_fs::NormalizedPath;

use super::layer_chain;
use crate::cli::Selection;
use crate::context::Context;
use crate::error::Result;

/// Backup policy from the apply flags. Backups are on unless `--no-backup`.
pub fn backup_policy(no_backup: bool, suffix: Option<String>) -> BackupPolicy {
    match (no_backup, suffix) {
        (true, _) => BackupPolicy::Skip,
        (false, Some(suffix)) => BackupPolicy::Suffix(suffix),
        (false, None) => BackupPolicy::Timestamped,
    }
}

/// Run the apply command
pub fn run_apply(
    context: &Context,
    selection: &Selection,
    target: Option<&std::path::Path>,
    options: &ApplyOptions,
    no_tasks: bool,
) -> Result<()> {
    let order = context.layer_order(selection)?;
    let target = context.target_dir(selection, target)?;

    let mut requested = ComponentSet::all();
    if no_tasks {
        requested = requested.without(ComponentKind::Tasks);
    }

    let resolved = resolve(&order, &requested)?;
    let report = write_profile(&target, &resolved, options)?;
    if !options.dry_run {
        tracing::info!(target = %target, files = report.changed(), "applied profile");
    }

    print_report(&target, &resolved.layers, &report, options.dry_run);
    for kind in resolved.absent() {
        println!("  {} {} {}", "-".dimmed(), kind, "(no layer provides it)".dimmed());
    }
    Ok(())
}

fn print_report(
    target: &NormalizedPath,
    layers: &[vsc_core::LayerId],
    report: &ApplyReport,
    dry_run: bool,
) {
    let heading = if dry_run { "Would apply" } else { "Applied" };
    println!("{} {}", heading.blue().bold(), layer_chain(layers));
    println!("{}: {}", "Target".dimmed(), target.as_str().yellow());
    if let Some(backup) = &report.backup {
        println!("{}: {}", "Backup".dimmed(), backup.path.as_str().yellow());
    }
    println!();

    for action in &report.actions {
        let relative = action
            .path
            .relative_to(target)
            .unwrap_or_else(|| action.path.to_string());
        let verb = match (action.change, dry_run) {
            (FileChange::Create, true) => "create".green(),
            (FileChange::Create, false) => "created".green(),
            (FileChange::Update, true) => "update".yellow(),
            (FileChange::Update, false) => "updated".yellow(),
            (FileChange::Unchanged, _) => "unchanged".dimmed(),
        };
        let source = action
            .source
            .as_ref()
            .map(|id| format!(" (from {})", id).dimmed().to_string())
            .unwrap_or_default();
        println!("  {:<10} {}{}", verb, relative, source);
    }

    let changed = report.changed();
    println!();
    if changed == 0 {
        println!("{} Profile already up to date.", "OK".green().bold());
    } else if dry_run {
        println!("{} file(s) would change. Run without {} to write them.", changed, "--dry-run".cyan());
    } else {
        println!("{} {} file(s) written.", "OK".green().bold(), changed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backups_are_on_by_default() {
        assert_eq!(backup_policy(false, None), BackupPolicy::Timestamped);
        assert_eq!(backup_policy(true, None), BackupPolicy::Skip);
        assert_eq!(
            backup_policy(false, Some("old".to_string())),
            BackupPolicy::Suffix("old".to_string())
        );
    }
}
