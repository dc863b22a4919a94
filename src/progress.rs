//! Page progress reporting

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Tracks pages fetched out of the total
///
/// Draws a terminal bar when enabled; always logs one `debug!` line per page.
pub struct PageProgress {
    bar: Option<ProgressBar>,
    total_pages: u64,
}

impl PageProgress {
    /// Create a tracker for `total_pages` pages
    pub fn new(total_pages: u64, show_bar: bool) -> Self {
        let bar = show_bar.then(|| {
            let pb = ProgressBar::new(total_pages);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        });
        Self { bar, total_pages }
    }

    /// Record that `page` was fetched with `results` entries
    pub fn page_done(&self, page: u64, results: usize) {
        debug!(
            page,
            total_pages = self.total_pages,
            results,
            "page fetched"
        );
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Close the bar, leaving it on screen
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }

    /// Remove the bar after a failure
    pub fn abandon(&self) {
        if let Some(bar) = &self.bar {
            bar.abandon();
        }
    }

    /// Pages completed so far (only tracked while a bar is shown)
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }
}
