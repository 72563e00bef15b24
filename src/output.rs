//! Styled terminal output for towerctl

use owo_colors::OwoColorize;

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    // Pastel mint green: RGB(152, 225, 152)
    println!(
        "{} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white()
    );
}

/// Print an error message with a red X
pub fn error(message: &str) {
    // Pastel coral/salmon: RGB(255, 160, 160)
    eprintln!(
        "{} {}",
        "✗".truecolor(255, 160, 160).bold(),
        message.bright_white()
    );
}

/// Print a progress indicator
pub fn progress(current: usize, total: usize, item_name: &str) {
    // Brighter grey: RGB(160, 160, 160)
    println!(
        "  {} {} {}",
        format!("[{}/{}]", current, total).truecolor(160, 160, 160),
        "Processing".truecolor(160, 160, 160),
        item_name.bright_white()
    );
}
