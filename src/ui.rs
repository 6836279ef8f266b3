//! ANSI output helpers for the command-line binary.

/// Print an error message in red to stderr
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Print a success message with a green checkmark
pub fn display_success(message: &str) {
    println!("\x1b[32m\u{2713}\x1b[0m {}", message);
}

/// Print a status message with a yellow arrow
pub fn display_status(message: &str) {
    println!("\x1b[33m\u{2192}\x1b[0m {}", message);
}
