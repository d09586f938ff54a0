//! Condition categories and their display glyphs
//!
//! The provider reports a coarse category in `weather[0].main`. Every category
//! maps to one glyph; anything unrecognised falls back to a sun-behind-cloud.

use ratatui::style::Color;

/// Weather condition categories
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    /// Mist, Smoke, Haze, Dust, Fog and Sand
    Atmosphere,
    Ash,
    Squall,
    Tornado,
    Unknown,
}

impl Condition {
    /// Map the provider's category name to a condition (case-sensitive, as sent).
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Drizzle" => Condition::Drizzle,
            "Thunderstorm" => Condition::Thunderstorm,
            "Snow" => Condition::Snow,
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" => Condition::Atmosphere,
            "Ash" => Condition::Ash,
            "Squall" => Condition::Squall,
            "Tornado" => Condition::Tornado,
            _ => Condition::Unknown,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Condition::Clear => "\u{2600}\u{fe0f}",
            Condition::Clouds => "\u{2601}\u{fe0f}",
            Condition::Rain => "\u{1f327}\u{fe0f}",
            Condition::Drizzle => "\u{1f326}\u{fe0f}",
            Condition::Thunderstorm => "\u{26c8}\u{fe0f}",
            Condition::Snow => "\u{1f328}\u{fe0f}",
            Condition::Atmosphere => "\u{1f32b}\u{fe0f}",
            Condition::Ash => "\u{1f30b}",
            Condition::Squall => "\u{1f4a8}",
            Condition::Tornado => "\u{1f32a}\u{fe0f}",
            Condition::Unknown => "\u{1f324}\u{fe0f}",
        }
    }

    /// Accent colour for the condition line
    pub fn accent(self) -> Color {
        match self {
            Condition::Clear => Color::Yellow,
            Condition::Clouds | Condition::Atmosphere | Condition::Unknown => Color::Gray,
            Condition::Rain | Condition::Drizzle => Color::Blue,
            Condition::Snow => Color::White,
            Condition::Thunderstorm | Condition::Squall | Condition::Tornado => Color::Magenta,
            Condition::Ash => Color::Red,
        }
    }
}
