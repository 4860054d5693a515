use colored::*;
use console::Term;
use std::fmt::Display;

/// User-facing output with colors and symbols.
/// Diagnostics go through `log` instead; this is only what the user is meant to read.
/// All methods are static. There's no state worth keeping, it's just a namespace.
/// Color scheme: teal (0, 150, 136) for info, amber (255, 179, 0) for highlights.
pub struct Logger;

impl Logger {
    /// Prints the tool name centered on the terminal.
    pub fn banner() {
        let width = Term::stdout().size().1 as usize;
        let title = "⚽  Player Registry  ⚽";
        println!(
            "{:^width$}\n",
            title.truecolor(0, 150, 136).bold().to_string(),
            width = width
        );
    }

    pub fn info<T: Display>(msg: T) {
        println!("{} {}", "•".truecolor(0, 150, 136).bold(), msg);
    }

    pub fn success<T: Display>(msg: T) {
        println!("{} {}", "✔".green().bold(), msg);
    }

    /// Goes to stderr so piped `--xml` output stays clean.
    pub fn error<T: Display>(msg: T) {
        eprintln!("{} {}", "✖".red().bold(), msg);
    }

    pub fn warn<T: Display>(msg: T) {
        eprintln!("{} {}", "⚠".yellow().bold(), msg);
    }

    /// Section header. The leading newline keeps it off the previous output.
    pub fn header<T: Display>(msg: T) {
        println!("\n{}", msg.to_string().truecolor(255, 179, 0).bold().underline());
    }

    /// Inline highlight for names and ids.
    pub fn highlight<T: Display>(msg: T) -> String {
        msg.to_string().truecolor(255, 179, 0).bold().to_string()
    }

    pub fn dim<T: Display>(msg: T) -> String {
        msg.to_string().dimmed().to_string()
    }
}
