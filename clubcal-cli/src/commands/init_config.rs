use std::path::Path;

use anyhow::Result;
use clubcal_core::config::WidgetConfig;
use owo_colors::OwoColorize;

pub fn run(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => WidgetConfig::config_path()?,
    };

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}\n\nUse --force to overwrite it.",
            path.display()
        );
    }

    WidgetConfig::create_default_config(&path)?;
    println!("{} {}", "Created".green(), path.display());
    println!("{}", "Set feed_url in this file to point at your club's events feed.".dimmed());

    Ok(())
}
