//! Actions: user intents and async completions

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{LocationFailure, WeatherResult};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// Open the search input
    SearchOpen,

    /// Close the search input without submitting
    SearchClose,

    /// Search text changed
    SearchQueryChange(String),

    /// Look up the current query by name
    SearchSubmit,

    /// Set the query and look it up (startup `--city`)
    SearchCity(String),

    /// Reset query, result and error
    SearchClear,

    // ===== Recent category =====
    /// Move the recent-search cursor
    RecentHighlight(usize),

    /// Open a recent search: set the query and look it up
    RecentOpen(String),

    /// Result: recent searches written to disk
    RecentDidSave,

    /// Result: writing recent searches failed
    RecentDidError(String),

    // ===== Location category =====
    /// Ask the location service for coordinates
    LocationRequest,

    /// Result: coordinates resolved
    LocationDidResolve { seq: u64, lat: f64, lon: f64 },

    /// Result: location service refused or is unavailable
    LocationDidError { seq: u64, failure: LocationFailure },

    // ===== Weather category =====
    /// Result: provider returned conditions
    WeatherDidLoad { seq: u64, result: WeatherResult },

    /// Result: provider lookup failed
    WeatherDidError { seq: u64, error: String },

    // ===== UI category =====
    /// Switch between metric and imperial
    UiToggleUnits,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
