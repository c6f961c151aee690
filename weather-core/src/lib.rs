//! Core library for the weather app.
//!
//! This crate defines:
//! - The provider client and the two proxy endpoints the backend exposes
//! - The front end's route controller and location-fragment grammar
//! - View models built from provider payloads (icons, forecast sampling, dates)
//! - Configuration & credentials handling
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod backend;
pub mod config;
pub mod controller;
pub mod icon;
pub mod model;
pub mod provider;
pub mod proxy;
pub mod route;
pub mod view;

pub use backend::{BackendClient, FetchJson, HttpFetcher};
pub use config::Config;
pub use controller::{RouteController, ViewState};
pub use icon::WeatherIcon;
pub use model::{
    ForecastItem, ForecastNote, ForecastViewModel, ProviderResult, WeatherQuery, WeatherViewModel,
};
pub use provider::{ProviderError, WeatherProvider};
pub use proxy::{Endpoint, ProxyEndpoints, ProxyError};
pub use route::RouteIntent;
pub use view::{NotFoundSignal, RenderDate};
