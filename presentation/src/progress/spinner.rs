//! Spinner for a single agent turn

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner displayed while one agent call is in flight.
///
/// A hidden spinner draws nothing.
pub struct TurnSpinner {
    bar: ProgressBar,
}

impl TurnSpinner {
    pub fn start(message: &str, visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_prefix("ANA");
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    pub fn finish_ok(self) {
        self.bar.finish_and_clear();
    }

    pub fn finish_err(self, message: &str) {
        self.bar
            .finish_with_message(format!("{} {}", "x".red(), message));
    }
}
