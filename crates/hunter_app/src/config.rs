use std::time::Duration;

use clap::{Parser, Subcommand};
use hunter_client::ApiSettings;

#[derive(Parser)]
#[command(name = "markethunter")]
#[command(about = "Terminal observer for the MarketHunter scan backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Submit a new scan and watch it to completion
    Scan {
        /// Search query, e.g. "Herman Miller Aeron"
        query: String,

        /// Marketplace search location
        #[arg(short, long, default_value = "erskineville")]
        location: String,

        /// Search radius in kilometres
        #[arg(short, long, default_value = "10")]
        radius: u32,

        /// Minimum number of listings to scrape
        #[arg(long, default_value = "30")]
        min_listings: u32,

        /// Extra guidance for the analysis step
        #[arg(long)]
        intent: Option<String>,
    },

    /// Observe an existing scan
    Watch {
        /// Backend-assigned scan id
        scan_id: String,
    },

    /// List past scans
    Jobs,

    /// Delete a scan and its data
    Delete {
        /// Backend-assigned scan id
        scan_id: String,
    },

    /// List recurring scan schedules
    Schedules,

    /// Show the SMTP settings used for scheduled-scan emails
    Settings,
}

/// Runtime configuration taken from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    /// Status/log poll cadence while a scan is running.
    pub poll_interval: Duration,
    /// Fast tick driving the elapsed readout.
    pub elapsed_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut api = ApiSettings::default();
        if let Ok(base_url) = std::env::var("MARKETHUNTER_API_URL") {
            if !base_url.trim().is_empty() {
                api.base_url = base_url.trim().to_string();
            }
        }
        let poll_interval = std::env::var("MARKETHUNTER_POLL_MS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(2000));
        Self {
            api,
            poll_interval,
            elapsed_interval: Duration::from_millis(250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scan_parses_query_and_flags() {
        let cli = Cli::try_parse_from([
            "markethunter",
            "scan",
            "Herman Miller Aeron",
            "--location",
            "sydney",
            "--radius",
            "25",
            "--intent",
            "resell",
        ])
        .expect("parse");
        match cli.command {
            Command::Scan {
                query,
                location,
                radius,
                min_listings,
                intent,
            } => {
                assert_eq!(query, "Herman Miller Aeron");
                assert_eq!(location, "sydney");
                assert_eq!(radius, 25);
                assert_eq!(min_listings, 30);
                assert_eq!(intent.as_deref(), Some("resell"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scan_without_query_is_an_error() {
        assert!(Cli::try_parse_from(["markethunter", "scan"]).is_err());
    }

    #[test]
    fn watch_requires_an_id() {
        assert!(Cli::try_parse_from(["markethunter", "watch"]).is_err());
        let cli = Cli::try_parse_from(["markethunter", "watch", "abc123"]).expect("parse");
        assert_eq!(
            cli.command,
            Command::Watch {
                scan_id: "abc123".to_string()
            }
        );
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["markethunter", "scan", "Aeron", "--frobnicate", "1"]).is_err());
    }
}
