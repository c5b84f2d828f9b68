/// cli/src/report.rs
/// Terminal rendering of optimizer errors and trace notes.

use console::Style;
use pulsec_core::{Diagnostic, PulseErrorExt, generate_error_report};

/// Styles for the different kinds of lines the CLI prints.
pub struct FormatStyle {
    pub info: Style,
    pub error: Style,
    pub success: Style,
    pub caret: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            info: Style::new().cyan(),
            error: Style::new().red().bold().for_stderr(),
            success: Style::new().green().bold(),
            caret: Style::new().green().for_stderr(),
        }
    }
}

/// Print a fatal optimizer error. When the script source is available the
/// offending line is quoted with a caret under the column.
pub fn print_error(error: &dyn PulseErrorExt, source: Option<&str>) {
    let style = FormatStyle::default();
    eprintln!("{}", style.error.apply_to(generate_error_report(error)));

    let (Some(loc), Some(source)) = (error.location(), source) else {
        return;
    };
    // lines and columns are 1-based
    if let Some(line_str) = source.lines().nth(loc.line.saturating_sub(1)) {
        eprintln!(" {:4} | {}", loc.line, line_str);
        let caret_line = format!("      | {}^", " ".repeat(loc.column.saturating_sub(1)));
        eprintln!("{}", style.caret.apply_to(caret_line));
    }
}

pub fn print_note(note: &Diagnostic) {
    let style = FormatStyle::default();
    println!("{} {}", style.info.apply_to("note:"), note);
}

pub fn print_failure(message: &str) {
    let style = FormatStyle::default();
    eprintln!("{} {}", style.error.apply_to("error:"), message);
}

pub fn print_success(message: &str) {
    let style = FormatStyle::default();
    println!("{}", style.success.apply_to(message));
}
