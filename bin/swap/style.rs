//! Terminal styling for the swap CLI

/// ANSI codes used by the swap screens
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

use colors::*;

fn paint(code: &str, s: &str) -> String {
    format!("{}{}{}", code, s, RESET)
}

pub fn style_bold(s: &str) -> String {
    paint(BOLD, s)
}

pub fn style_dim(s: &str) -> String {
    paint(DIM, s)
}

pub fn style_cyan(s: &str) -> String {
    paint(CYAN, s)
}

pub fn style_gray(s: &str) -> String {
    paint(GRAY, s)
}

pub fn print_success(msg: &str) {
    println!("  {} {}", paint(GREEN, "✓"), msg);
}

/// Quote and wallet failures go to stderr so `--json` output stays clean
pub fn print_error(msg: &str) {
    eprintln!("  {} {}", paint(RED, "✗"), paint(RED, msg));
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", paint(YELLOW, "⚠"), paint(YELLOW, msg));
}

pub fn print_info(msg: &str) {
    println!("  {} {}", paint(CYAN, "›"), msg);
}

/// `Step 2 of 6 · Which direction do you want to swap?`
pub fn print_step(step: usize, total: usize, title: &str) {
    println!(
        "  {} {}",
        style_gray(&format!("Step {} of {} ·", step, total)),
        style_bold(title)
    );
}

/// Section title padded with a rule to a fixed width
pub fn print_header(title: &str) {
    let rule = "─".repeat(48usize.saturating_sub(title.chars().count()));
    println!();
    println!("{}{} {} {}{}", BOLD, CYAN, title, rule, RESET);
    println!();
}

/// Wizard completion bar; `percent` comes from the wizard state
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0).clamp(0.0, 1.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "{} {}",
        paint(GREEN, &"━".repeat(filled)) + &paint(GRAY, &"━".repeat(width - filled)),
        style_gray(&format!("{:.0}%", percent))
    )
}
