use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weather_core::{BackendClient, Config, RouteController};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Backend API base, e.g. "http://localhost:3001/api". Overrides the config file.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the backend URL and the provider API key.
    Configure,

    /// Show current weather and forecast for a city.
    Show {
        /// City name.
        city: String,
    },

    /// Open a location fragment, e.g. "#/weather/Paris" or "#/notfound".
    Open {
        fragment: String,
    },

    /// Search cities interactively. This is the default.
    Search,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Search) {
            Command::Configure => configure(),
            Command::Show { city } => {
                let controller = controller(self.backend_url)?;
                controller.start().await;
                let Some(view) = controller.submit(&city).await else {
                    bail!("City name must not be empty");
                };
                println!("{}", render(&view));
                Ok(())
            }
            Command::Open { fragment } => {
                let controller = controller(self.backend_url)?;
                let view = controller.navigate(&fragment).await;
                println!("{}", render(&view));
                Ok(())
            }
            Command::Search => search(controller(self.backend_url)?).await,
        }
    }
}

fn controller(backend_url: Option<String>) -> anyhow::Result<RouteController> {
    let backend_url = match backend_url {
        Some(url) => url,
        None => Config::load()?.backend_url().to_string(),
    };
    log::debug!("using backend at {backend_url}");
    Ok(RouteController::new(BackendClient::new(&backend_url)))
}

async fn search(controller: RouteController) -> anyhow::Result<()> {
    let mut view = controller.start().await;

    loop {
        println!("{}", render(&view));

        let input = match Text::new("City:").with_help_message("Esc to quit").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read city"),
        };

        if let Some(next) = controller.key_pressed("Enter", &input).await {
            view = next;
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let backend_url = Text::new("Backend URL:")
        .with_default(config.backend_url())
        .prompt()
        .context("Failed to read backend URL")?;
    config.set_backend_url(&backend_url);

    let api_key = Password::new("OpenWeatherMap API key (empty to remove):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(&api_key);

    config.save()?;
    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
