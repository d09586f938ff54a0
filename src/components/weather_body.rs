use artbox::{Alignment as ArtAlignment, Renderer, fonts, integrations::ratatui::ArtBox};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::location_header::{HEADER_OVERHEAD, Palette};
use super::{Component, ERROR_ICON, LOCATION_ICON, LocationHeader, LocationHeaderProps};
use crate::action::Action;
use crate::state::{AppState, LookupKind, WeatherResult};

pub struct WeatherBody;

pub struct WeatherBodyProps<'a> {
    pub state: &'a AppState,
}

/// Fixed rows: condition + blank + feels-like + blank + two detail rows.
const LAYOUT_FIXED: u16 = 6;

/// (city rows, temperature rows) per font: terminus, miniwi, then plain text.
const TEXT_TIERS: [(u16, u16); 3] = [
    (6 + HEADER_OVERHEAD, 6),
    (4 + HEADER_OVERHEAD, 4),
    (1 + HEADER_OVERHEAD, 1),
];

fn font_stack() -> Vec<artbox::Font> {
    fonts::stack(&["terminus", "miniwi"])
}

struct LayoutSizing {
    header_cap: u16,
    temp_cap: u16,
}

/// Largest text tier that fits; the plain tier when nothing does.
fn compute_layout(area_height: u16) -> LayoutSizing {
    let (header_cap, temp_cap) = TEXT_TIERS
        .iter()
        .copied()
        .find(|&(hcap, tcap)| hcap + tcap + LAYOUT_FIXED <= area_height)
        .unwrap_or(TEXT_TIERS[TEXT_TIERS.len() - 1]);
    LayoutSizing {
        header_cap,
        temp_cap,
    }
}

impl Component<Action> for WeatherBody {
    type Props<'a> = WeatherBodyProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        match WeatherView::from_state(state) {
            WeatherView::Ready(weather) => {
                let sizing = compute_layout(area.height);
                render_ready(frame, area, state, weather, &sizing);
            }
            WeatherView::Error(error) => render_error(frame, area, error),
            WeatherView::Loading(message) => render_placeholder(frame, area, state, message),
            WeatherView::Empty => render_hint(frame, area),
        }
    }
}

fn render_ready(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    weather: &WeatherResult,
    sizing: &LayoutSizing,
) {
    let chunks = Layout::vertical([
        Constraint::Max(sizing.header_cap),
        Constraint::Length(1), // condition
        Constraint::Length(1),
        Constraint::Max(sizing.temp_cap),
        Constraint::Length(1), // feels like
        Constraint::Length(1),
        Constraint::Length(1), // humidity / wind
        Constraint::Length(1), // pressure / visibility
    ])
    .flex(Flex::Center)
    .split(area);

    let subtitle = format!("{} {}", LOCATION_ICON, weather.location_label());
    let mut header = LocationHeader;
    header.render(
        frame,
        chunks[0],
        LocationHeaderProps {
            title: &weather.city,
            subtitle: &subtitle,
            temperature_celsius: Some(weather.temperature_celsius()),
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
        },
    );

    let condition = weather.condition_kind();
    let condition_line = Line::from(vec![
        Span::raw(format!("{}  ", condition.glyph())),
        Span::styled(
            weather.condition.clone(),
            Style::default().fg(condition.accent()).bold(),
        ),
        Span::styled(
            format!(" · {}", weather.description),
            Style::default().fg(Color::Gray),
        ),
    ])
    .centered();
    frame.render_widget(Paragraph::new(condition_line), chunks[1]);

    let renderer = Renderer::new(font_stack())
        .with_plain_fallback()
        .with_alignment(ArtAlignment::Center)
        .with_fill(Palette::for_temperature(Some(weather.temperature_celsius())).horizontal());
    frame.render_widget(
        ArtBox::new(&renderer, &weather.temperature_label()),
        chunks[3],
    );

    let feels = Line::from(vec![Span::styled(
        weather.feels_like_label(),
        Style::default().fg(Color::Gray),
    )])
    .centered();
    frame.render_widget(Paragraph::new(feels), chunks[4]);

    frame.render_widget(
        Paragraph::new(detail_line(&[
            ("Humidity", weather.humidity_label()),
            ("Wind", weather.wind_label()),
        ])),
        chunks[6],
    );
    frame.render_widget(
        Paragraph::new(detail_line(&[
            ("Pressure", weather.pressure_label()),
            ("Visibility", weather.visibility_label()),
        ])),
        chunks[7],
    );
}

fn detail_line(items: &[(&str, String)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(items.len() * 3);
    for (i, (label, value)) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("    "));
        }
        spans.push(Span::styled(
            format!("{label} "),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(value.clone(), Style::default().fg(Color::White)));
    }
    Line::from(spans).centered()
}

fn render_placeholder(frame: &mut Frame, area: Rect, state: &AppState, message: &str) {
    let chunks = Layout::vertical([
        Constraint::Max(TEXT_TIERS[0].0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .flex(Flex::Center)
    .split(area);

    let title = if state.query.is_empty() {
        "..."
    } else {
        state.query.as_str()
    };
    let mut header = LocationHeader;
    header.render(
        frame,
        chunks[0],
        LocationHeaderProps {
            title,
            subtitle: "",
            temperature_celsius: None,
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
        },
    );

    let msg = Line::from(vec![Span::styled(
        message.to_string(),
        Style::default().fg(Color::DarkGray),
    )])
    .centered();
    frame.render_widget(Paragraph::new(msg), chunks[2]);
}

fn render_hint(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Length(1)])
        .flex(Flex::Center)
        .split(area);

    let hint = Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("/", Style::default().fg(Color::Cyan).bold()),
        Span::styled(" to search a city or ", Style::default().fg(Color::DarkGray)),
        Span::styled("l", Style::default().fg(Color::Cyan).bold()),
        Span::styled(" for your location", Style::default().fg(Color::DarkGray)),
    ])
    .centered();
    frame.render_widget(Paragraph::new(hint), chunks[0]);
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // blank
        Constraint::Length(1), // icon
        Constraint::Length(1), // "Error"
        Constraint::Length(1), // message
        Constraint::Length(1), // blank
        Constraint::Length(1), // hint
    ])
    .flex(Flex::Center)
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(ERROR_ICON).centered()),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled(
                "Error",
                Style::default().fg(Color::Red).bold(),
            )])
            .centered(),
        ),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled(
                error.to_string(),
                Style::default().fg(Color::Rgb(200, 100, 100)),
            )])
            .centered(),
        ),
        chunks[3],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled("/", Style::default().fg(Color::Cyan).bold()),
                Span::styled(" to search again", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        ),
        chunks[5],
    );
}

// ============================================================================
// Helpers
// ============================================================================

/// What the body shows. A result wins over an error; the error strip above
/// the body carries the message in that case and only then.
pub(crate) enum WeatherView<'a> {
    Ready(&'a WeatherResult),
    Error(&'a str),
    Loading(&'static str),
    Empty,
}

impl<'a> WeatherView<'a> {
    pub(crate) fn from_state(state: &'a AppState) -> Self {
        let loading = state
            .pending
            .as_ref()
            .filter(|pending| pending.kind.is_foreground());
        match (&state.weather, &state.error, loading) {
            (Some(weather), _, _) => WeatherView::Ready(weather),
            (None, _, Some(pending)) => WeatherView::Loading(loading_message(&pending.kind)),
            (None, Some(error), None) => WeatherView::Error(error),
            (None, None, None) => WeatherView::Empty,
        }
    }
}

pub(crate) fn loading_message(kind: &LookupKind) -> &'static str {
    match kind {
        LookupKind::Locating | LookupKind::Coordinates { .. } => "Locating...",
        LookupKind::Name(_) | LookupKind::Refresh(_) => "Searching...",
    }
}
