//! Pure formatting functions for UI output.
//!
//! This module contains the styling of every message the user sees,
//! separated from where the message is written. Colors follow the
//! global `console` color setting (disabled by `--no-ansi` or a non-tty).

use console::style;

use crate::boundary::BoundaryWarning;

/// Format an error message in red.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

/// Format a success message with green checkmark.
pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

/// Format a status message with yellow arrow.
pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// Format a non-fatal warning.
pub fn format_warning(message: &str) -> String {
    format!("{} {}", style("⚠").yellow().bold(), style(message).yellow())
}

/// Format a boundary warning for display.
pub fn format_boundary_warning(warning: &BoundaryWarning) -> String {
    format_warning(&warning.to_string())
}

/// Format a yes/no question with its default answer.
pub fn format_confirm(question: &str, default: bool) -> String {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    format!("{} {}: ", style(question).bold(), hint)
}

/// Format a numbered choice list followed by the selection prompt.
///
/// `default` is a 0-based index into `options`.
pub fn format_choice(question: &str, options: &[String], default: usize) -> String {
    let mut out = format!("{}\n", style(question).bold());
    for (i, option) in options.iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", i + 1, option));
    }
    let default_label = options.get(default).map(String::as_str).unwrap_or("");
    out.push_str(&format!(
        "Select (1-{}) [default: {}]: ",
        options.len(),
        default_label
    ));
    out
}

/// Format a free-text question.
pub fn format_question(question: &str) -> String {
    format!("{}: ", style(question).bold())
}

/// Format the final timing line of a release.
pub fn format_elapsed(seconds: f64) -> String {
    format!("{}", style(format!("Released in {:.3}s", seconds)).dim())
}
