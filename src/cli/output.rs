//! Terminal output for unlatch
//!
//! Styled status lines for humans. Results go to stdout; progress goes to
//! stderr so the password line stays easy to pipe.

use console::style;
use std::sync::Arc;

use crate::parallel::{ProgressReporter, ProgressSnapshot};

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {:<14} {}", style(key).dim(), styled_value);
        }
    }

    /// One row of the stage table
    pub fn stage_row(&self, index: usize, name: &str, shape: &str, mode: &str, count: u64) {
        if !self.quiet {
            println!(
                "  {:>2}. {:<20} {:<30} {:<11} {}",
                index,
                style(name).cyan(),
                shape,
                style(mode).dim(),
                style(count.to_string()).yellow()
            );
        }
    }

    /// Print blank line
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// The recovered password, printed even in quiet mode so scripts can capture it
    pub fn password(&self, password: &str) {
        if self.quiet {
            println!("{password}");
        } else {
            println!(
                "{} {} {}",
                style("🔓").green(),
                style("Password:").bold(),
                style(password).green().bold()
            );
        }
    }

    /// Reporter printing periodic search progress to stderr, or `None` when quiet
    pub fn progress_reporter(&self) -> Option<ProgressReporter> {
        if self.quiet {
            return None;
        }
        Some(Arc::new(|snapshot: &ProgressSnapshot| {
            eprintln!("{} {}", style("►").cyan(), style(snapshot).dim());
        }))
    }
}
