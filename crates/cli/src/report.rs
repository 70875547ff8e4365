//! Tables for rename plans and sync pass summaries.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use homeutils_core::rename::{RenameConflict, RenamePlan};
use homeutils_core::rsync::PassSummary;

/// Two-column table of planned renames.
pub fn rename_table(plan: &RenamePlan) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["From", "To"]);

    for (from, to) in plan.iter() {
        table.add_row(vec![
            Cell::new(from.display()),
            Cell::new(to.display()),
        ]);
    }
    table
}

/// One line per conflicting target.
pub fn conflict_lines(conflicts: &[RenameConflict]) -> Vec<String> {
    conflicts
        .iter()
        .map(|c| match c {
            RenameConflict::SharedTarget { target, sources } => format!(
                "{} sources would be renamed to {}",
                sources.len(),
                target.display()
            ),
            RenameConflict::TargetExists { source, target } => format!(
                "{} already exists; {} will be skipped",
                target.display(),
                source.display()
            ),
        })
        .collect()
}

/// Per-job status table for one pass.
pub fn pass_table(summary: &PassSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Job", "Status"]);

    for outcome in &summary.succeeded {
        table.add_row(vec![
            Cell::new(&outcome.job),
            Cell::new("✓ synced").fg(Color::Green),
        ]);
    }
    for (job, err) in &summary.failed {
        table.add_row(vec![
            Cell::new(job),
            Cell::new(format!("✗ {}", err)).fg(Color::Red),
        ]);
    }
    table
}
