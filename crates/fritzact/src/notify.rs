//! One-line status notices on stderr.

use owo_colors::OwoColorize;

use crate::cli::GlobalOpts;
use crate::output;

#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    color: bool,
    quiet: bool,
}

impl Notifier {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            color: output::should_color(&global.color),
            quiet: global.quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{} {message}", "✓".green());
        } else {
            eprintln!("✓ {message}");
        }
    }

    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{}", message.dimmed());
        } else {
            eprintln!("{message}");
        }
    }
}
