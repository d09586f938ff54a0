use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, ColorStop, Fill, LinearGradient, Renderer,
    fonts, integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::LOADING_ANIM_CYCLE_TICKS;

pub struct LocationHeader;

pub struct LocationHeaderProps<'a> {
    /// Rendered large (FIGlet)
    pub title: &'a str,
    /// Plain line under the title
    pub subtitle: &'a str,
    pub temperature_celsius: Option<f64>,
    pub is_animating: bool,
    pub tick_count: u32,
}

/// Overhead inside the header area: 1 spacer + 1 subtitle line.
/// The FIGlet title gets `area.height - HEADER_OVERHEAD`.
pub const HEADER_OVERHEAD: u16 = 2;

/// Upper bound (exclusive, °C) and the two gradient ends for that band.
const TEMPERATURE_BANDS: [(f64, [u8; 3], [u8; 3]); 4] = [
    (0.0, [150, 200, 255], [200, 230, 255]),  // ice
    (15.0, [100, 180, 255], [150, 220, 200]), // cool
    (25.0, [100, 200, 150], [255, 220, 100]), // mild
    (35.0, [255, 180, 80], [255, 120, 80]),   // warm
];
const HOT_BAND: ([u8; 3], [u8; 3]) = ([255, 100, 80], [255, 60, 60]);
const NO_DATA_BAND: ([u8; 3], [u8; 3]) = ([180, 180, 180], [220, 220, 220]);

/// Stops per gradient; more stops make the moving seam smoother.
const GRADIENT_STOPS: usize = 12;
const GRADIENT_ANGLE: f32 = 5.0;

/// Two-colour palette picked from a temperature in °C
#[derive(Clone, Copy)]
pub(crate) struct Palette {
    pub start: ArtColor,
    pub end: ArtColor,
}

impl Palette {
    pub fn for_temperature(celsius: Option<f64>) -> Self {
        let (start, end) = band(celsius);
        Self {
            start: rgb(start),
            end: rgb(end),
        }
    }

    /// Colour at `t` on a start→end→start wave, so 0.0 and 1.0 meet seamlessly.
    fn wave(&self, t: f32) -> ArtColor {
        let t = t.rem_euclid(1.0);
        if t < 0.5 {
            self.start.interpolate(self.end, t * 2.0)
        } else {
            self.end.interpolate(self.start, (t - 0.5) * 2.0)
        }
    }

    /// Gradient with the wave shifted by `phase` (one full cycle per 1.0).
    pub fn fill(&self, phase: f32) -> Fill {
        let stops = (0..=GRADIENT_STOPS)
            .map(|i| {
                let pos = i as f32 / GRADIENT_STOPS as f32;
                ColorStop::new(pos, self.wave(pos - phase))
            })
            .collect();
        Fill::Linear(LinearGradient::new(GRADIENT_ANGLE, stops))
    }

    /// Left-to-right gradient without the wave, for the temperature readout.
    pub fn horizontal(&self) -> Fill {
        Fill::Linear(LinearGradient::horizontal(self.start, self.end))
    }
}

fn band(celsius: Option<f64>) -> ([u8; 3], [u8; 3]) {
    match celsius {
        Some(t) => TEMPERATURE_BANDS
            .iter()
            .find(|(upper, _, _)| t < *upper)
            .map(|&(_, start, end)| (start, end))
            .unwrap_or(HOT_BAND),
        None => NO_DATA_BAND,
    }
}

fn rgb([r, g, b]: [u8; 3]) -> ArtColor {
    ArtColor::rgb(r, g, b)
}

fn animated_phase(tick_count: u32) -> f32 {
    let steps = LOADING_ANIM_CYCLE_TICKS.max(1);
    (tick_count % steps) as f32 / steps as f32
}

impl Component<Action> for LocationHeader {
    type Props<'a> = LocationHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet title, artbox picks the best font
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Subtitle
        ])
        .split(area);

        let phase = if props.is_animating {
            animated_phase(props.tick_count)
        } else {
            0.0
        };
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(Palette::for_temperature(props.temperature_celsius).fill(phase));
        frame.render_widget(ArtBox::new(&renderer, props.title), chunks[0]);

        if !props.subtitle.is_empty() {
            let subtitle = Line::from(vec![Span::styled(
                props.subtitle.to_string(),
                Style::default().fg(Color::DarkGray),
            )])
            .centered();
            frame.render_widget(Paragraph::new(subtitle), chunks[2]);
        }
    }
}
