use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{InquireError, Text};
use pollen_core::{
    Session, Settings, UserRequest,
    flow::{Page, UiState},
    handle, load_api_key,
};
use tracing_subscriber::EnvFilter;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pollen", version, about = "Live pollen risk for any place")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins if set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch pollen data for one area and print it.
    Show {
        /// Area, city or country. Defaults to `default_area` from the config file.
        area: Option<String>,

        /// Print the page as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Keep asking for areas until Esc or Ctrl-C.
    Interactive,

    /// Show the config file location and the effective settings.
    Config {
        /// Write a config file with default values if none exists.
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    pub fn init_logging(&self) {
        let fallback = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { area, json } => {
                let settings = Settings::load()?;
                let session = start_session(&settings)?;
                let area = area.unwrap_or_else(|| settings.default_area.clone());

                let page = handle(&session, &UserRequest { area, trigger: true })
                    .await
                    .context("Fetching pollen data failed")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&page)?);
                } else {
                    render::print_header();
                    render::print_page(&page);
                }

                if page.next == UiState::Halted {
                    bail!("cannot continue without an API key");
                }
            }
            Command::Interactive => {
                let settings = Settings::load()?;
                let session = start_session(&settings)?;
                render::print_header();
                interactive(&session, &settings).await?;
            }
            Command::Config { init } => {
                let path = Settings::config_file_path()?;
                if init {
                    if Settings::init_file(&path)? {
                        println!("Wrote default settings to {}", path.display());
                    } else {
                        println!("Config file already exists: {}", path.display());
                    }
                }

                let settings = Settings::load_from(&path)?;
                println!("Config file: {}", path.display());
                print!("{}", settings.to_toml()?);
            }
        }

        Ok(())
    }
}

fn start_session(settings: &Settings) -> anyhow::Result<Session> {
    let api_key = load_api_key();
    tracing::debug!("Pollen endpoint {}, geocoder {}", settings.pollen_url, settings.geocoder_url);
    Session::from_settings(api_key, settings).context("Failed to set up HTTP clients")
}

/// The idle loop: hint, prompt, one cycle, repeat.
async fn interactive(session: &Session, settings: &Settings) -> anyhow::Result<()> {
    let mut last_area = settings.default_area.clone();

    loop {
        let idle = handle(session, &UserRequest { area: last_area.clone(), trigger: false }).await?;
        render::print_page(&idle);
        if idle.next == UiState::Halted {
            bail!("cannot continue without an API key");
        }

        let area = match Text::new("Area / City/country").with_default(&last_area).prompt() {
            Ok(area) => area,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to read area"),
        };

        let page: Page = match handle(session, &UserRequest { area: area.clone(), trigger: true }).await {
            Ok(page) => page,
            Err(e) if e.is_recoverable() => {
                render::print_failure(&e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        render::print_page(&page);
        last_area = area;
    }
}
