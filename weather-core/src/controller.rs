//! Owns every view transition.
//!
//! The visible view is derived from the location fragment alone. Navigating
//! hides everything, parses the fragment into a [`RouteIntent`] and then
//! shows exactly one view. A failed current-weather fetch does not render
//! anything itself; it rewrites the fragment to the not-found route and the
//! controller runs again.

use parking_lot::Mutex;

use crate::backend::{BackendClient, FetchJson, HttpFetcher};
use crate::model::{ForecastViewModel, WeatherQuery, WeatherViewModel};
use crate::route::{RouteIntent, SEARCH_FRAGMENT};
use crate::view::{NotFoundSignal, RenderDate, build_forecast_view, build_weather_view};

/// What the rendering layer should paint.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// All views hidden, a transition is in progress.
    Hidden,
    Search,
    Weather {
        weather: WeatherViewModel,
        forecast: ForecastViewModel,
    },
    NotFound {
        message: String,
    },
}

pub fn not_found_message(city: Option<&str>) -> String {
    match city {
        Some(city) => {
            format!("Could not find weather data for \"{city}\". Please try another city.")
        }
        None => "The city you searched for was not found. Please try another city.".to_string(),
    }
}

#[derive(Debug)]
struct Location {
    fragment: String,
    view: ViewState,
    /// Bumped on every navigation. Results from older navigations are dropped.
    generation: u64,
}

pub struct RouteController<F = HttpFetcher> {
    backend: BackendClient<F>,
    location: Mutex<Location>,
    clock: fn() -> RenderDate,
}

impl<F: FetchJson> RouteController<F> {
    pub fn new(backend: BackendClient<F>) -> Self {
        Self {
            backend,
            location: Mutex::new(Location {
                fragment: String::new(),
                view: ViewState::Hidden,
                generation: 0,
            }),
            clock: RenderDate::now,
        }
    }

    /// Replace the source of "today", e.g. to pin dates in tests.
    pub fn with_clock(mut self, clock: fn() -> RenderDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn fragment(&self) -> String {
        self.location.lock().fragment.clone()
    }

    pub fn view(&self) -> ViewState {
        self.location.lock().view.clone()
    }

    /// Startup always lands on the search view.
    pub async fn start(&self) -> ViewState {
        self.navigate(SEARCH_FRAGMENT).await
    }

    /// Navigate to the weather view for the typed city. Blank input is ignored.
    pub async fn submit(&self, input: &str) -> Option<ViewState> {
        let query = WeatherQuery::parse(input)?;
        let fragment = RouteIntent::Weather { city: query.city }.to_fragment();
        Some(self.navigate(&fragment).await)
    }

    /// Keyboard entry: only "Enter" submits.
    pub async fn key_pressed(&self, key: &str, input: &str) -> Option<ViewState> {
        if key == "Enter" {
            self.submit(input).await
        } else {
            None
        }
    }

    /// Set the fragment and show the view it names.
    ///
    /// Returns the view visible once this navigation settles. If a newer
    /// navigation started meanwhile, its view wins and is returned instead.
    pub async fn navigate(&self, fragment: &str) -> ViewState {
        let mut fragment = fragment.to_string();

        loop {
            let generation = self.begin(&fragment);
            let intent = RouteIntent::parse(&fragment);
            log::debug!("Navigating to {fragment:?} as {intent:?}");

            let next = match intent {
                RouteIntent::Search => ViewState::Search,
                RouteIntent::NotFound { city } => ViewState::NotFound {
                    message: not_found_message(city.as_deref()),
                },
                RouteIntent::Weather { city } => match self.load_weather(&city).await {
                    Ok(view) => view,
                    Err(NotFoundSignal) => {
                        if !self.is_current(generation) {
                            log::debug!("Dropping stale not-found result for {city:?}");
                            return self.view();
                        }
                        fragment = RouteIntent::NotFound { city: Some(city) }.to_fragment();
                        continue;
                    }
                },
            };

            return self.finish(generation, next);
        }
    }

    async fn load_weather(&self, city: &str) -> Result<ViewState, NotFoundSignal> {
        let dates = (self.clock)();

        let weather = build_weather_view(&self.backend.weather(city).await, dates.local)?;
        let forecast = build_forecast_view(&self.backend.forecast(city).await, dates.utc);

        Ok(ViewState::Weather { weather, forecast })
    }

    fn begin(&self, fragment: &str) -> u64 {
        let mut location = self.location.lock();
        location.generation += 1;
        location.fragment = fragment.to_string();
        location.view = ViewState::Hidden;
        location.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.location.lock().generation == generation
    }

    fn finish(&self, generation: u64, view: ViewState) -> ViewState {
        let mut location = self.location.lock();
        if location.generation != generation {
            log::debug!("Dropping stale result for {:?}", location.fragment);
            return location.view.clone();
        }
        location.view = view.clone();
        view
    }
}
