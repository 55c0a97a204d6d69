pub mod events;
pub mod facets;
pub mod init_config;
pub mod show;

use anyhow::Result;
use clubcal_core::Widget;

use crate::utils::tui::feed_spinner;

/// Load the feed behind a spinner.
pub async fn load(widget: &mut Widget, refresh: bool) -> Result<()> {
    let feed_url = widget.config().feed_url().ok();
    let spinner = feed_spinner(feed_url.as_ref(), refresh);

    let result = if refresh {
        widget.refresh().await
    } else {
        widget.load().await
    };

    spinner.finish_and_clear();
    result?;

    Ok(())
}
