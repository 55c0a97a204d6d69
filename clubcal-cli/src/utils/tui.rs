use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

const FEED_TICKS: &[&str] = &["◐", "◓", "◑", "◒", "●"];

/// Spinner shown on stderr while the feed is fetched. Hidden automatically
/// when stderr is not a terminal.
pub fn feed_spinner(feed_url: Option<&Url>, refresh: bool) -> ProgressBar {
    let verb = if refresh { "Refreshing" } else { "Loading" };
    let message = match feed_url.and_then(Url::host_str) {
        Some(host) => format!("{verb} events from {host}"),
        None => format!("{verb} events"),
    };

    let style = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(FEED_TICKS);

    let spinner = ProgressBar::new_spinner().with_style(style).with_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_spinner_names_host() {
        let url = Url::parse("https://club.example.org/events.json").unwrap();

        let spinner = feed_spinner(Some(&url), true);
        assert_eq!(spinner.message(), "Refreshing events from club.example.org");
        spinner.finish_and_clear();

        let spinner = feed_spinner(None, false);
        assert_eq!(spinner.message(), "Loading events");
        spinner.finish_and_clear();
    }
}
