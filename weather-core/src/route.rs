use std::borrow::Cow;

/// Fragment the app starts on and falls back to.
pub const SEARCH_FRAGMENT: &str = "#/search";

const WEATHER_PREFIX: &str = "/weather/";
const NOT_FOUND_PREFIX: &str = "/notfound";

/// Which view should be visible, parsed from the location fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteIntent {
    Search,
    Weather { city: String },
    NotFound { city: Option<String> },
}

impl RouteIntent {
    /// Parse a location fragment. Every input yields exactly one intent.
    ///
    /// Recognized forms are `#/weather/<city>`, `#/notfound` and
    /// `#/notfound/<city>`; the leading `#` is optional. Anything else,
    /// including an empty fragment or `#/weather/` without a city, is a search.
    pub fn parse(fragment: &str) -> Self {
        let path = fragment.strip_prefix('#').unwrap_or(fragment);

        if let Some(city_part) = path.strip_prefix(WEATHER_PREFIX) {
            let city = decode_component(city_part);
            if city.is_empty() {
                RouteIntent::Search
            } else {
                RouteIntent::Weather { city }
            }
        } else if let Some(rest) = path.strip_prefix(NOT_FOUND_PREFIX) {
            let city = rest
                .strip_prefix('/')
                .map(decode_component)
                .filter(|city| !city.is_empty());
            RouteIntent::NotFound { city }
        } else {
            RouteIntent::Search
        }
    }

    /// The fragment that navigates to this intent.
    pub fn to_fragment(&self) -> String {
        match self {
            RouteIntent::Search => SEARCH_FRAGMENT.to_string(),
            RouteIntent::Weather { city } => format!("#{WEATHER_PREFIX}{}", encode_component(city)),
            RouteIntent::NotFound { city: None } => format!("#{NOT_FOUND_PREFIX}"),
            RouteIntent::NotFound { city: Some(city) } => {
                format!("#{NOT_FOUND_PREFIX}/{}", encode_component(city))
            }
        }
    }
}

pub fn encode_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Percent-decode a fragment segment. Escapes that do not form valid UTF-8
/// are replaced rather than rejected.
pub fn decode_component(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            let bytes = urlencoding::decode_binary(value.as_bytes());
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(city: &str) -> RouteIntent {
        RouteIntent::Weather {
            city: city.to_string(),
        }
    }

    fn not_found(city: &str) -> RouteIntent {
        RouteIntent::NotFound {
            city: Some(city.to_string()),
        }
    }

    #[test]
    fn empty_and_unknown_fragments_are_search() {
        assert_eq!(RouteIntent::parse(""), RouteIntent::Search);
        assert_eq!(RouteIntent::parse("#"), RouteIntent::Search);
        assert_eq!(RouteIntent::parse("#/search"), RouteIntent::Search);
        assert_eq!(RouteIntent::parse("#/settings"), RouteIntent::Search);
        assert_eq!(RouteIntent::parse("#/weather"), RouteIntent::Search);
    }

    #[test]
    fn weather_fragment_decodes_city() {
        assert_eq!(
            RouteIntent::parse("#/weather/New%20York"),
            weather("New York")
        );
        assert_eq!(
            RouteIntent::parse("/weather/S%C3%A3o%20Paulo"),
            weather("São Paulo")
        );
    }

    #[test]
    fn weather_without_city_falls_back_to_search() {
        assert_eq!(RouteIntent::parse("#/weather/"), RouteIntent::Search);
    }

    #[test]
    fn notfound_with_and_without_city() {
        let generic = RouteIntent::NotFound { city: None };
        assert_eq!(RouteIntent::parse("#/notfound"), generic);
        assert_eq!(RouteIntent::parse("#/notfound/"), generic);
        assert_eq!(RouteIntent::parse("#/notfound/Zzzzz"), not_found("Zzzzz"));
    }

    #[test]
    fn malformed_escape_does_not_panic() {
        assert_eq!(
            RouteIntent::parse("#/weather/%FFcity"),
            weather("\u{FFFD}city")
        );
    }

    #[test]
    fn weather_fragment_round_trips() {
        for city in ["Paris", "New York", "Zürich", "a/b", "100% rain", "#hash"] {
            let intent = weather(city);
            let fragment = intent.to_fragment();
            assert_eq!(RouteIntent::parse(&fragment), intent, "{city:?}");
        }
    }

    #[test]
    fn fragments_for_each_intent() {
        let generic = RouteIntent::NotFound { city: None };
        assert_eq!(RouteIntent::Search.to_fragment(), "#/search");
        assert_eq!(weather("New York").to_fragment(), "#/weather/New%20York");
        assert_eq!(generic.to_fragment(), "#/notfound");
        assert_eq!(not_found("Zzzzz").to_fragment(), "#/notfound/Zzzzz");
    }
}
