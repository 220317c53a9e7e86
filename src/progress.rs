//! Progress bar construction for byte transfers.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg} | {elapsed_precise} elapsed, ETA {eta_precise}";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {bytes} {msg} | {elapsed_precise} elapsed";

/// Creates a byte progress bar for a transfer.
///
/// With a known length this is a full bar with ETA; without one it degrades
/// to a spinner that only counts bytes. When `visible` is false nothing is
/// drawn, but the position is still tracked.
pub(crate) fn transfer_bar(total: Option<u64>, message: String, visible: bool) -> ProgressBar {
    let pb = match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓▒░ "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            if visible {
                pb.enable_steady_tick(Duration::from_millis(100));
            }
            pb
        }
    };
    if !visible {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_message(message);
    pb
}
