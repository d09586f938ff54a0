//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::conditions::Condition;

/// Shown when a lookup by name fails for any reason.
pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found. Please check the spelling and try again.";

/// Shown when the coordinates resolved but the provider lookup failed.
pub const LOCATION_FETCH_FAILED_MESSAGE: &str = "Unable to fetch weather for your location.";

/// Maximum number of entries kept in the recent-search list.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Animation timing for the header gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// Measurement system requested from the provider
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    pub fn toggle(&self) -> Self {
        match self {
            Unit::Metric => Unit::Imperial,
            Unit::Imperial => Unit::Metric,
        }
    }

    /// Value of the provider's `units` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    pub fn temp_symbol(&self) -> &'static str {
        match self {
            Unit::Metric => "°C",
            Unit::Imperial => "°F",
        }
    }

    pub fn format_temp(&self, value: f64) -> String {
        format!("{}{}", round_half_up(value), self.temp_symbol())
    }

    /// Wind speed arrives in m/s (metric) or mph (imperial); metric is shown as km/h.
    pub fn format_wind(&self, speed: f64) -> String {
        match self {
            Unit::Metric => format!("{} km/h", round_half_up(speed * 3.6)),
            Unit::Imperial => format!("{} mph", round_half_up(speed)),
        }
    }

    /// Label for the unit switch, active unit first.
    pub fn switch_label(&self) -> &'static str {
        match self {
            Unit::Metric => "°C | °F",
            Unit::Imperial => "°F | °C",
        }
    }
}

/// Rounds half-way values toward positive infinity (`-2.5` becomes `-2`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Current conditions for one city, as returned by the provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherResult {
    pub city: String,
    /// ISO country code; empty when the provider omits it
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    /// Condition category, e.g. "Clouds"
    pub condition: String,
    pub description: String,
    pub condition_id: u32,
    pub humidity: u8,
    /// Provider-native wind speed in the unit below
    pub wind_speed: f64,
    /// hPa
    pub pressure: u32,
    /// Metres; absent for some stations
    pub visibility: Option<u32>,
    /// Unit the values were requested in
    pub unit: Unit,
}

impl WeatherResult {
    pub fn location_label(&self) -> String {
        if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.country)
        }
    }

    pub fn condition_kind(&self) -> Condition {
        Condition::from_main(&self.condition)
    }

    pub fn glyph(&self) -> &'static str {
        self.condition_kind().glyph()
    }

    pub fn temperature_rounded(&self) -> i64 {
        round_half_up(self.temperature)
    }

    pub fn temperature_label(&self) -> String {
        self.unit.format_temp(self.temperature)
    }

    pub fn feels_like_label(&self) -> String {
        format!("Feels like {}", self.unit.format_temp(self.feels_like))
    }

    pub fn wind_label(&self) -> String {
        self.unit.format_wind(self.wind_speed)
    }

    pub fn humidity_label(&self) -> String {
        format!("{}%", self.humidity)
    }

    pub fn pressure_label(&self) -> String {
        format!("{} hPa", self.pressure)
    }

    pub fn visibility_label(&self) -> String {
        match self.visibility {
            Some(metres) => format!("{:.1} km", f64::from(metres) / 1000.0),
            None => "n/a".to_string(),
        }
    }

    /// Temperature in Celsius, for colour choices that must not depend on the unit.
    pub fn temperature_celsius(&self) -> f64 {
        match self.unit {
            Unit::Metric => self.temperature,
            Unit::Imperial => (self.temperature - 32.0) * 5.0 / 9.0,
        }
    }
}

/// Most-recent-first list of looked-up city names, unique and bounded
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a stored list, dropping blanks and duplicates and capping the length.
    pub fn from_saved(saved: Vec<String>) -> Self {
        let mut cities: Vec<String> = Vec::with_capacity(MAX_RECENT_SEARCHES);
        for city in saved {
            if city.trim().is_empty() || cities.contains(&city) {
                continue;
            }
            cities.push(city);
            if cities.len() == MAX_RECENT_SEARCHES {
                break;
            }
        }
        Self(cities)
    }

    /// Insert at the front; an existing entry moves instead of duplicating.
    pub fn push(&mut self, city: &str) {
        self.0.retain(|existing| existing != city);
        self.0.insert(0, city.to_string());
        self.0.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a request asks the provider for
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum LookupTarget {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

/// Why the location service could not produce coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LocationFailure {
    Denied,
    Unsupported,
    /// The location service could not be reached
    Unavailable,
}

impl LocationFailure {
    pub fn message(&self) -> &'static str {
        match self {
            LocationFailure::Denied => "Location access denied. Please search manually.",
            LocationFailure::Unsupported => "Geolocation is not supported on this system.",
            LocationFailure::Unavailable => {
                "Could not determine your location. Please search manually."
            }
        }
    }
}

/// The single request the controller is waiting on
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PendingLookup {
    pub seq: u64,
    pub kind: LookupKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum LookupKind {
    /// Lookup by the city name the user asked for
    Name(String),
    /// Waiting for the location service
    Locating,
    /// Lookup by resolved coordinates
    Coordinates { lat: f64, lon: f64 },
    /// Background refetch after a unit toggle
    Refresh(String),
}

impl LookupKind {
    /// Foreground lookups show the loading state and block new searches.
    pub fn is_foreground(&self) -> bool {
        !matches!(self, LookupKind::Refresh(_))
    }

    pub fn target(&self) -> Option<LookupTarget> {
        match self {
            LookupKind::Name(city) | LookupKind::Refresh(city) => {
                Some(LookupTarget::City(city.clone()))
            }
            LookupKind::Coordinates { lat, lon } => Some(LookupTarget::Coordinates {
                lat: *lat,
                lon: *lon,
            }),
            LookupKind::Locating => None,
        }
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Controller state (visible in debug) ---
    /// Text in the search box
    #[debug(section = "Search", label = "Query")]
    pub query: String,

    /// Last successful result; replaced wholesale per lookup
    #[debug(section = "Weather", label = "Result", debug_fmt)]
    pub weather: Option<WeatherResult>,

    /// User-facing error for the last attempt
    #[debug(section = "Weather", label = "Error", debug_fmt)]
    pub error: Option<String>,

    /// Unit used for the next request
    #[debug(section = "Weather", label = "Unit", debug_fmt)]
    pub unit: Unit,

    /// Persisted recent-search list
    #[debug(section = "Search", label = "Recent", debug_fmt)]
    pub recent: RecentSearches,

    /// Request currently awaited; completions with another seq are stale
    #[debug(section = "Lookup", label = "Pending", debug_fmt)]
    pub pending: Option<PendingLookup>,

    /// Seq handed to the next request
    #[debug(section = "Lookup", label = "Next seq")]
    pub next_seq: u64,

    /// Last failure writing the recent-search file
    #[debug(section = "Storage", label = "Error", debug_fmt)]
    pub storage_error: Option<String>,

    // --- Animation internals (skipped) ---
    /// Animation frame counter (for gradient seam)
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,

    // --- UI focus (skipped) ---
    /// Whether the search input is open
    #[debug(skip)]
    pub search_mode: bool,

    /// Highlighted row in the recent-search list
    #[debug(skip)]
    pub recent_selected: usize,
}

impl AppState {
    /// Create state from the stored recent searches and the initial unit
    pub fn new(recent: RecentSearches, unit: Unit) -> Self {
        Self {
            query: String::new(),
            weather: None,
            error: None,
            unit,
            recent,
            pending: None,
            next_seq: 1,
            storage_error: None,
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
            search_mode: false,
            recent_selected: 0,
        }
    }

    /// True while a foreground lookup is outstanding
    pub fn is_loading(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.kind.is_foreground())
    }

    /// Record `kind` as the awaited request and return its seq.
    pub fn begin_lookup(&mut self, kind: LookupKind) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending = Some(PendingLookup { seq, kind });
        seq
    }

    /// Take the pending lookup if `seq` is the one being awaited.
    pub fn settle(&mut self, seq: u64) -> Option<LookupKind> {
        match &self.pending {
            Some(pending) if pending.seq == seq => self.pending.take().map(|p| p.kind),
            _ => None,
        }
    }

    pub fn loading_anim_active(&self) -> bool {
        self.is_loading() || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RecentSearches::new(), Unit::default())
    }
}
