//! Progress indication for transfers
//!
//! Requests are sent as a whole, so transfers show a spinner; a byte bar is
//! used where the command reads local data itself.

use std::time::Duration;

use indicatif::ProgressStyle;

use super::OutputConfig;

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

/// Progress bar wrapper
///
/// In quiet or JSON mode, or with --no-progress, nothing is drawn.
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

fn hidden(config: &OutputConfig) -> bool {
    config.quiet || config.json || config.no_progress
}

impl ProgressBar {
    /// Byte progress over `total` bytes
    pub fn new(config: &OutputConfig, total: u64) -> Self {
        if hidden(config) {
            return Self { bar: None };
        }

        let bar = indicatif::ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar: Some(bar) }
    }

    /// Spinner for a call whose progress is not observable
    pub fn spinner(config: &OutputConfig, message: &str) -> Self {
        if hidden(config) {
            return Self { bar: None };
        }

        let bar = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_hidden_modes() {
        for config in [
            OutputConfig {
                quiet: true,
                ..Default::default()
            },
            OutputConfig {
                json: true,
                ..Default::default()
            },
            OutputConfig {
                no_progress: true,
                ..Default::default()
            },
        ] {
            assert!(!ProgressBar::new(&config, 100).is_visible());
            assert!(!ProgressBar::spinner(&config, "x").is_visible());
        }
    }

    #[test]
    fn test_progress_bar_normal() {
        let bar = ProgressBar::new(&OutputConfig::default(), 100);
        assert!(bar.is_visible());
        bar.inc(10);
        bar.finish_and_clear();
    }
}
