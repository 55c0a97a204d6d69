use anyhow::Result;
use clubcal_core::{ClickAction, Widget};
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(mut widget: Widget, id: i64, open: bool) -> Result<()> {
    super::load(&mut widget, false).await?;

    let url = match widget.handle_click(id)? {
        ClickAction::Popup { details } => {
            println!("{}", details.render());
            details.url
        }
        ClickAction::Link { url } => {
            println!("{}", url);
            Some(url)
        }
        ClickAction::Both { details, url } => {
            println!("{}", details.render());
            Some(url)
        }
    };

    if open {
        match url {
            Some(url) => {
                open::that(&url)?;
                println!("{}", format!("Opened {}", url).dimmed());
            }
            None => println!("{}", "This event has no page to open".dimmed()),
        }
    }

    Ok(())
}
