// Colored operator output.
// Status lines are yellow, results green, per-item warnings red, summaries magenta.

use std::io::{Write, stderr, stdout};

use crossterm::style::Stylize;

/// A step is starting.
pub fn status(msg: &str) {
    println!("{}", msg.yellow());
}

/// A step finished successfully.
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Per-item problem worth the operator's attention; never fatal.
pub fn warn(msg: &str) {
    println!("{}", msg.red());
}

/// Informational aside (skipped items, debug hints).
pub fn note(msg: &str) {
    println!("{}", msg.magenta());
}

/// Summary line at the end of a run.
pub fn summary(msg: &str) {
    println!("{}", msg.magenta());
}

/// Fatal diagnostic, rendered to stderr.
pub fn error(msg: &str) {
    let _ = writeln!(stderr(), "{}", msg.red());
}

/// In-place progress line, overwritten on each call.
pub fn progress(current: usize, total: usize, name: &str) {
    let line = format!("Fetching [{}/{}]: {}", current, total, name);
    print!("\r{}", format!("{:<100}", line).cyan());
    let _ = stdout().flush();
}

/// Clear the progress line so the next message starts on a clean row.
pub fn clear_progress() {
    print!("\r{:<100}\r", "");
    let _ = stdout().flush();
}
