use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use ipgeolocation_core::{
    ApiResult, Config, GeolocationParams, TimezoneParams, client_from_config,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "ipgeo", version, about = "ipgeolocation.io lookups from the command line")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key in the config file.
    Configure {
        /// Key to store; prompts for it when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Geolocate an IP address (defaults to this machine's address).
    Geo {
        #[arg(long)]
        ip: Option<String>,

        /// Comma-separated field selector, e.g. "geo,time_zone".
        #[arg(long)]
        fields: Option<String>,

        /// Print the raw result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Look up a timezone by IP, zone name or coordinates.
    Timezone {
        #[arg(long)]
        ip: Option<String>,

        /// IANA zone name, e.g. "America/New_York".
        #[arg(long)]
        tz: Option<String>,

        #[arg(long, requires = "long", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        long: Option<f64>,

        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Geo { ip, fields, json } => {
                let client = client_from_config(&Config::load()?)?;
                let params = GeolocationParams {
                    ip: ip.unwrap_or_default(),
                    fields: fields.unwrap_or_default(),
                };

                let geo = client.geolocation_with(&params);
                if json {
                    output::print_json(&geo)?;
                } else {
                    output::print_geolocation(&geo);
                }
                ensure_success(&geo)
            }
            Command::Timezone { ip, tz, lat, long, json } => {
                let client = client_from_config(&Config::load()?)?;
                let params = TimezoneParams {
                    ip: ip.unwrap_or_default(),
                    timezone: tz.unwrap_or_default(),
                    latitude: lat,
                    longitude: long,
                };

                let timezone = client.timezone_with(&params);
                if json {
                    output::print_json(&timezone)?;
                } else {
                    output::print_timezone(&timezone);
                }
                ensure_success(&timezone)
            }
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("ipgeolocation.io API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    let path = Config::config_file_path()?;
    let mut cfg = Config::load_from(&path)?;
    cfg.set_api_key(api_key);

    if !cfg.is_configured() {
        bail!("API key must not be empty");
    }

    cfg.save_to(&path)?;
    println!("Saved API key to {}", path.display());
    Ok(())
}

fn ensure_success(result: &impl ApiResult) -> anyhow::Result<()> {
    if result.is_success() {
        return Ok(());
    }
    bail!("Lookup failed with status {}", result.status())
}
