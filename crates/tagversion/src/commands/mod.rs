//! Command implementations

pub mod bump;

use owo_colors::{OwoColorize, Stream};

/// Print a diagnostic line to stderr, styling the prefix when stderr is a
/// color-capable terminal.
///
/// Shared by `main` (unexpected failures) and the commands (expected refusals).
pub fn print_diagnostic(prefix: &str, message: &str) {
    eprintln!(
        "{} {message}",
        prefix.if_supports_color(Stream::Stderr, |p| p.red().bold().to_string())
    );
}
