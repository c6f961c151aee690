//! Backend for the weather app.
//!
//! Proxies current weather and forecast requests to the provider so the
//! API key never reaches the browser.

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use std::net::SocketAddr;
use weather_core::{Config, ProxyEndpoints, provider::openweather};

mod app;
mod error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Provider API key. Falls back to the key in the config file.
    #[arg(long, env = "OPENWEATHERMAP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// The only origin allowed to call the API from a browser.
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:5173")]
    allowed_origin: String,

    #[arg(
        long,
        env = "OPENWEATHERMAP_URL",
        default_value = openweather::DEFAULT_BASE_URL
    )]
    provider_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let api_key = match args.api_key {
        Some(key) => Some(key),
        None => match Config::load() {
            Ok(config) => config.api_key().map(str::to_owned),
            Err(err) => {
                log::warn!("Ignoring unreadable config file: {err:#}");
                None
            }
        },
    };

    let proxy = ProxyEndpoints::from_settings(api_key.as_deref(), &args.provider_url);
    if !proxy.is_configured() {
        log::warn!("OPENWEATHERMAP_API_KEY is not set. API calls will fail.");
    }

    let allowed_origin = HeaderValue::from_str(&args.allowed_origin)
        .with_context(|| format!("Invalid allowed origin: {}", args.allowed_origin))?;
    log::info!("Allowing cross-origin requests from {allowed_origin:?}");

    let app = app::create_app(proxy, allowed_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let port = args.port;
    log::info!("Weather app backend listening at http://localhost:{port}");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
