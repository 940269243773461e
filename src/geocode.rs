//! Location Resolver Module
//!
//! Turns raw coordinates or a free-text city query into a location
//! record via two geocoding providers: Open-Meteo (structured primary)
//! and Nominatim (reverse-only fallback with a different schema). The
//! reverse path is modeled as an ordered list of fallible strategies,
//! each reporting found/empty/unavailable, folded by a single
//! first-success-wins combinator that finally degrades to a
//! coordinate-only record. The search path deliberately has no secondary
//! provider; a miss there is a caller-visible `NotFound`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ===================== ENDPOINTS =====================

const SEARCH_ENDPOINT: &str = "https://geocoding-api.open-meteo.com/v1/search";
const REVERSE_ENDPOINT: &str = "https://geocoding-api.open-meteo.com/v1/reverse";
const NOMINATIM_REVERSE_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";

/// Identifies this client to the providers; Nominatim requires one.
const USER_AGENT: &str = "athan-cli/0.1 (prayer-times)";

/// Per-request acquisition timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ===================== TYPES =====================

/// A resolved location. Partial records are valid: consumers must
/// tolerate a missing timezone or display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name as reported by the provider, if any.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// First-level administrative area (state, region).
    #[serde(default)]
    pub admin1: Option<String>,
}

impl GeoLocation {
    /// Terminal degradation: coordinates only, with a formatted
    /// "lat, lon" display string.
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timezone: None,
            display_name: Some(format_coords(latitude, longitude)),
            country: None,
            admin1: None,
        }
    }
}

/// Outcome of one provider strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(GeoLocation),
    /// The provider answered but had nothing useful for this input.
    Empty,
    /// Timeout, non-success status, or malformed payload. Absorbed by
    /// the fallback chain, never propagated.
    Unavailable,
}

/// Location resolution errors that reach the caller.
#[derive(Debug)]
pub enum LocationError {
    /// Malformed caller input; surfaced immediately, no retry.
    InvalidInput(String),
    /// The search yielded no candidate. An actionable condition, not a
    /// silent default.
    NotFound(String),
    /// The search provider could not be reached. Only the search path
    /// surfaces this; the reverse path always degrades instead.
    Provider(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid location input: {}", msg),
            Self::NotFound(query) => write!(f, "no match for '{}'", query),
            Self::Provider(msg) => write!(f, "geocoding provider unavailable: {}", msg),
        }
    }
}

impl std::error::Error for LocationError {}

// ===================== HELPERS =====================

/// "lat, lon" display string, 4 decimal places (~10 m).
pub fn format_coords(latitude: f64, longitude: f64) -> String {
    format!("{:.4}, {:.4}", latitude, longitude)
}

/// Round a coordinate to 3 decimal places (~100 m); provider hit-rates
/// on sparse rural data improve with the coarser key.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Join the non-empty parts of a place name as "name, admin1, country".
pub fn compose_display_name(
    name: Option<&str>,
    admin1: Option<&str>,
    country: Option<&str>,
) -> Option<String> {
    let parts: Vec<&str> = [name, admin1, country]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect();
    if parts.is_empty() { None } else { Some(parts.join(", ")) }
}

/// Fold an ordered strategy list: first `Found` wins; `Empty` and
/// `Unavailable` both advance to the next strategy.
fn first_found<'a, I>(strategies: I) -> Option<GeoLocation>
where
    I: IntoIterator<Item = Box<dyn Fn() -> Lookup + 'a>>,
{
    for strategy in strategies {
        if let Lookup::Found(location) = strategy() {
            return Some(location);
        }
    }
    None
}

fn urlencode(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            _ if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') => c.to_string(),
            _ => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf)
                    .bytes()
                    .map(|b| format!("%{:02X}", b))
                    .collect()
            }
        })
        .collect()
}

// ===================== PROVIDER PAYLOADS =====================

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    results: Option<Vec<OpenMeteoPlace>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoPlace {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    hamlet: Option<String>,
    #[serde(default)]
    municipality: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Remap an Open-Meteo reverse payload onto the canonical shape. The
/// caller's coordinates are kept; the provider's snapped ones are not
/// the point the user asked about.
fn open_meteo_reverse_lookup(response: OpenMeteoResponse, latitude: f64, longitude: f64) -> Lookup {
    let Some(place) = response.results.and_then(|r| r.into_iter().next()) else {
        return Lookup::Empty;
    };

    // A record carrying none of locality/region/country is as good as
    // no record; report Empty so the chain retries with rounded input.
    if place.name.is_none() && place.admin1.is_none() && place.country.is_none() {
        return Lookup::Empty;
    }

    let display_name = compose_display_name(
        place.name.as_deref(),
        place.admin1.as_deref(),
        place.country.as_deref(),
    );
    Lookup::Found(GeoLocation {
        latitude,
        longitude,
        timezone: place.timezone,
        display_name,
        country: place.country,
        admin1: place.admin1,
    })
}

/// Remap a Nominatim `jsonv2` payload onto the canonical shape. The
/// locality name falls back through city, town, village, hamlet, and
/// municipality in that priority order; Nominatim reports no timezone.
fn nominatim_reverse_lookup(response: NominatimResponse, latitude: f64, longitude: f64) -> Lookup {
    let Some(address) = response.address else {
        return Lookup::Empty;
    };

    let name = address
        .city
        .or(address.town)
        .or(address.village)
        .or(address.hamlet)
        .or(address.municipality);
    let admin1 = address.state.or(address.region);
    let country = address.country;

    if name.is_none() && admin1.is_none() && country.is_none() {
        return Lookup::Empty;
    }

    let display_name = compose_display_name(name.as_deref(), admin1.as_deref(), country.as_deref());
    Lookup::Found(GeoLocation {
        latitude,
        longitude,
        timezone: None,
        display_name,
        country,
        admin1,
    })
}

// ===================== RESOLVER =====================

/// Sequential multi-provider resolver. Provider attempts run in order
/// (cheapest and most accurate first), each with its own timeout; there
/// is no shared state, so a resolver is freely cloneable across threads.
#[derive(Clone)]
pub struct Resolver {
    agent: ureq::Agent,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self { agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build() }
    }

    /// Resolve a coordinate to a location record. Never fails: when both
    /// providers are empty or unreachable the result degrades to the
    /// coordinate-only record.
    pub fn resolve_coordinates(&self, latitude: f64, longitude: f64) -> GeoLocation {
        let (lat_r, lon_r) = (round3(latitude), round3(longitude));
        let strategies: Vec<Box<dyn Fn() -> Lookup + '_>> = vec![
            Box::new(move || self.open_meteo_reverse(latitude, longitude)),
            Box::new(move || self.open_meteo_reverse(lat_r, lon_r)),
            Box::new(move || self.nominatim_reverse(latitude, longitude)),
        ];

        match first_found(strategies) {
            Some(mut location) => {
                location.latitude = latitude;
                location.longitude = longitude;
                if location.display_name.is_none() {
                    location.display_name = Some(format_coords(latitude, longitude));
                }
                location
            }
            None => GeoLocation::from_coordinates(latitude, longitude),
        }
    }

    /// Resolve a free-text city query. One result, English. No
    /// secondary-provider fallback on this path: only the reverse path
    /// has one, a deliberate scope limit.
    pub fn resolve_query(&self, query: &str) -> Result<GeoLocation, LocationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LocationError::InvalidInput("empty query".into()));
        }

        let url = format!(
            "{}?name={}&count=1&language=en&format=json",
            SEARCH_ENDPOINT,
            urlencode(query)
        );
        let response: OpenMeteoResponse = self
            .agent
            .get(&url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| LocationError::Provider(e.to_string()))?
            .into_json()
            .map_err(|e| LocationError::Provider(e.to_string()))?;

        let Some(place) = response.results.and_then(|r| r.into_iter().next()) else {
            return Err(LocationError::NotFound(query.to_string()));
        };

        let display_name = compose_display_name(
            place.name.as_deref(),
            place.admin1.as_deref(),
            place.country.as_deref(),
        );
        Ok(GeoLocation {
            latitude: place.latitude,
            longitude: place.longitude,
            timezone: place.timezone,
            display_name,
            country: place.country,
            admin1: place.admin1,
        })
    }

    fn open_meteo_reverse(&self, latitude: f64, longitude: f64) -> Lookup {
        let url = format!(
            "{}?latitude={}&longitude={}&count=1&language=en&format=json",
            REVERSE_ENDPOINT, latitude, longitude
        );
        match self.fetch_json::<OpenMeteoResponse>(&url) {
            Some(response) => open_meteo_reverse_lookup(response, latitude, longitude),
            None => Lookup::Unavailable,
        }
    }

    fn nominatim_reverse(&self, latitude: f64, longitude: f64) -> Lookup {
        let url = format!(
            "{}?format=jsonv2&lat={}&lon={}&zoom=10",
            NOMINATIM_REVERSE_ENDPOINT, latitude, longitude
        );
        match self.fetch_json::<NominatimResponse>(&url) {
            Some(response) => nominatim_reverse_lookup(response, latitude, longitude),
            None => Lookup::Unavailable,
        }
    }

    /// One provider call. Every failure mode (timeout, non-success
    /// status, malformed payload) collapses to `None` here so the chain
    /// can move on.
    fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Option<T> {
        self.agent
            .get(url)
            .set("User-Agent", USER_AGENT)
            .call()
            .ok()?
            .into_json()
            .ok()
    }
}

// ===================== TESTS =====================
