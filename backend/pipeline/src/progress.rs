//! Progress display for a batch run.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str = "{prefix} {wide_bar} {pos}/{len} {msg}";

/// A bar sized to the candidate list, advanced once per candidate whether or
/// not it was processed.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Drawn on stderr when `visible`, otherwise counts silently.
    pub fn new(total: usize, visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(total as u64), target);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style);
        }
        bar.set_prefix("Processing images");
        Self { bar }
    }

    pub fn set_current(&self, file_name: &str) {
        self.bar.set_message(format!("Current file: {file_name}"));
    }

    pub fn advance(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> u64 {
        self.bar.length().unwrap_or(0)
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }
}
