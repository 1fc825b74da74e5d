use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Item `current` of `total` is about to be processed.
    Item {
        current: usize,
        total: usize,
        label: String,
    },
    Finished {
        total: usize,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: ProgressEvent) {}
}

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress bar on stderr for the per-item loops.
///
/// The bar stays hidden until the first item and hides itself when stderr is
/// not a terminal. Log output should go through [`ProgressBar::suspend`] on
/// [`TerminalProgressSink::bar`] so it never lands inside a drawn line.
pub struct TerminalProgressSink {
    bar: ProgressBar,
    draw_on_start: bool,
    started: AtomicBool,
}

impl TerminalProgressSink {
    pub fn new() -> Self {
        Self::with_drawing(true)
    }

    fn with_drawing(draw_on_start: bool) -> Self {
        let bar = ProgressBar::hidden();
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self {
            bar,
            draw_on_start,
            started: AtomicBool::new(false),
        }
    }

    /// Handle to the bar, shared with whatever prints while it is drawn.
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }
}

impl Default for TerminalProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgressSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Item {
                current,
                total,
                label,
            } => {
                if self.draw_on_start && !self.started.swap(true, Ordering::Relaxed) {
                    self.bar.set_draw_target(ProgressDrawTarget::stderr());
                }
                self.bar.set_length(total as u64);
                self.bar.set_position(current.saturating_sub(1) as u64);
                self.bar.set_message(label);
            }
            ProgressEvent::Finished { total } => {
                self.bar.set_position(total as u64);
                self.bar.finish_and_clear();
            }
        }
    }
}
