//! Terminal styling shared by both binaries.
//!
//! Status lines carry a colored marker in front of the plain message, so
//! they stay readable when colors are off (piped output, `NO_COLOR`).

use console::Style;

fn marked(marker: &str, style: Style, msg: &str) -> String {
    format!("{} {}", style.apply_to(marker), msg)
}

/// A finished step: green check mark.
pub fn success(msg: &str) -> String {
    marked("✓", Style::new().green(), msg)
}

/// A failed step: red cross.
pub fn error(msg: &str) -> String {
    marked("✗", Style::new().red(), msg)
}

/// Something the user should look at before continuing.
pub fn warn(msg: &str) -> String {
    marked("⚠", Style::new().yellow(), msg)
}

pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

/// Secondary detail such as file locations.
pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

/// Label for a dry pass (yellow) or a real pass (bold green).
pub fn mode_label(dry_run: bool) -> String {
    if dry_run {
        Style::new().yellow().apply_to("DRY RUN").to_string()
    } else {
        Style::new().green().bold().apply_to("RUN").to_string()
    }
}
