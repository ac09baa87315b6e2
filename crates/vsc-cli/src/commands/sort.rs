//! Sort command implementation

use colored::Colorize;
use vsc_core::{SortOutcome, sort_keybindings_file, sort_settings_file};
use vsc_fs::NormalizedPath;

use crate::cli::SortTarget;
use crate::error::{CliError, Result};

/// Run the sort command
pub fn run_sort(target: &SortTarget) -> Result<()> {
    let (outcome, check) = match target {
        SortTarget::Keybindings { file, check } => {
            (sort_keybindings_file(&NormalizedPath::new(file), !check)?, *check)
        }
        SortTarget::Settings { file, check } => {
            (sort_settings_file(&NormalizedPath::new(file), !check)?, *check)
        }
    };

    for dropped in &outcome.discarded {
        println!(
            "  {} {} {} (entry {} superseded by entry {})",
            "-".red(),
            dropped.entry.key(),
            dropped.entry.when().map(|w| format!("when {}", w)).unwrap_or_default().dimmed(),
            dropped.index,
            dropped.superseded_by
        );
    }

    report(&outcome, check)
}

fn report(outcome: &SortOutcome, check: bool) -> Result<()> {
    match (outcome.changed, check) {
        (false, _) => {
            println!("{} {} is already sorted", "OK".green().bold(), outcome.path);
            Ok(())
        }
        (true, true) => Err(CliError::user(format!("{} is not sorted", outcome.path))),
        (true, false) => {
            println!(
                "{} {} ({} entries, {} duplicates removed)",
                "Sorted".green().bold(),
                outcome.path,
                outcome.entries,
                outcome.discarded.len()
            );
            Ok(())
        }
    }
}
