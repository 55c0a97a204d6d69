mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use clubcal_core::config::WidgetConfig;
use clubcal_core::date_range::DateRange;
use clubcal_core::Widget;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clubcal")]
#[command(about = "Browse and filter your club's events feed")]
struct Cli {
    /// Events feed URL (overrides the config file)
    #[arg(long, global = true)]
    feed_url: Option<String>,

    /// Path to the config file (default: ~/.config/clubcal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// IANA timezone for dates and times (default: system timezone)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events matching the given filters
    Events {
        /// Show events from this date (YYYY-MM-DD, or "start" for all past events)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Include events that have already started
        #[arg(long)]
        past: bool,

        /// Skip the cache and fetch the feed again
        #[arg(long)]
        refresh: bool,

        /// Print calendar items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the details of one event
    Show {
        id: i64,

        /// Open the event page in the browser
        #[arg(long)]
        open: bool,
    },
    /// List the available filter options
    Facets,
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Interest area, e.g. "hiking"
    #[arg(long)]
    interest: Option<String>,

    /// Committee name, e.g. "Wine"
    #[arg(long)]
    committee: Option<String>,

    /// Cost bracket: free, under-25, under-50, over-50
    #[arg(long)]
    cost: Option<String>,

    /// Time of day: morning, afternoon, evening
    #[arg(long)]
    time: Option<String>,

    /// Quick filter id (repeatable): hasOpenings, free, weekend, newcomerFriendly, registrationOpen
    #[arg(long = "quick", value_name = "ID")]
    quick: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Events {
            ref from,
            ref to,
            ref filters,
            past,
            refresh,
            json,
        } => {
            let mut config = load_config(&cli)?;
            if past {
                config.show_past_events = true;
            }
            let widget = build_widget(config)?;
            let range = DateRange::from_args(from.as_deref(), to.as_deref(), widget.timezone())
                .map_err(|e| anyhow::anyhow!(e))?;
            commands::events::run(widget, range, filters, refresh, json).await
        }
        Commands::Show { id, open } => {
            let widget = build_widget(load_config(&cli)?)?;
            commands::show::run(widget, id, open).await
        }
        Commands::Facets => {
            let widget = build_widget(load_config(&cli)?)?;
            commands::facets::run(widget).await
        }
        Commands::InitConfig { force } => commands::init_config::run(cli.config.as_deref(), force),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file + environment, then command-line overrides.
fn load_config(cli: &Cli) -> Result<WidgetConfig> {
    let mut config = WidgetConfig::load(cli.config.as_deref())?;

    if let Some(url) = &cli.feed_url {
        config.feed_url = Some(url.clone());
    }
    if let Some(tz) = &cli.timezone {
        config.timezone = Some(tz.clone());
    }
    if config.timezone.is_none() {
        config.timezone = system_timezone();
    }

    Ok(config)
}

fn system_timezone() -> Option<String> {
    match iana_time_zone::get_timezone() {
        Ok(name) if name.parse::<chrono_tz::Tz>().is_ok() => Some(name),
        Ok(name) => {
            tracing::debug!("system timezone '{name}' is not a known IANA zone");
            None
        }
        Err(e) => {
            tracing::debug!("could not determine system timezone: {e}");
            None
        }
    }
}

fn build_widget(config: WidgetConfig) -> Result<Widget> {
    if !config.has_feed_url() {
        anyhow::bail!(
            "No feed URL configured.\n\n\
            Pass one with:\n  \
            clubcal --feed-url <URL> events\n\n\
            Or set it once in the config file:\n  \
            clubcal init-config"
        );
    }

    Ok(Widget::new(config)?)
}
