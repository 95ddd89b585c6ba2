//! Console status lines.
//!
//! `colored` drops the escape codes on its own when `NO_COLOR` is set or
//! stdout is not a terminal.

use colored::Colorize;

/// green check line
pub fn ok(message: &str) {
    println!("{} {}", "✔".green(), message.green());
}

/// yellow warning line
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message.yellow());
}

/// red error line, on stderr
pub fn err(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
}

/// indented plain line
pub fn info(message: &str) {
    println!("  {message}");
}

/// indented dimmed line
pub fn dim(message: &str) {
    println!("  {}", message.dimmed());
}

/// blue label for interactive prompts
pub fn prompt_label(message: &str) -> String {
    format!("{}", message.blue())
}
