use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::weather_body::{WeatherView, loading_message};
use super::{Component, RecentList, RecentListProps, WeatherBody, WeatherBodyProps};
use crate::action::Action;
use crate::state::AppState;

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";
pub const LOCATION_ICON: &str = "\u{1f4cd}";
pub const APP_TITLE: &str = "\u{1f324}\u{fe0f} Weather App";

/// Ticks per spinner frame
const SPINNER_TICKS: u32 = 8;

/// Props for WeatherDisplay - read-only view of state
pub struct WeatherDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The main weather display component
#[derive(Default)]
pub struct WeatherDisplay {
    recent: RecentList,
}

impl WeatherDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for WeatherDisplay {
    type Props<'a> = WeatherDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let state = props.state;

        match key.code {
            KeyCode::Char('/') | KeyCode::Char('s') => vec![Action::SearchOpen],
            KeyCode::Char('l') => vec![Action::LocationRequest],
            KeyCode::Char('u') => vec![Action::UiToggleUnits],
            KeyCode::Char('c') => vec![Action::SearchClear],
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                state
                    .recent
                    .get(index)
                    .map(|city| Action::RecentOpen(city.to_string()))
                    .into_iter()
                    .collect()
            }
            KeyCode::Enter => state
                .recent
                .get(state.recent_selected)
                .map(|city| Action::RecentOpen(city.to_string()))
                .into_iter()
                .collect(),
            KeyCode::Up | KeyCode::Down => self
                .recent
                .handle_event(
                    event,
                    RecentListProps {
                        recent: &state.recent,
                        selected: state.recent_selected,
                        is_focused: true,
                        on_select: Action::RecentHighlight,
                    },
                )
                .into_iter()
                .collect(),
            KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherDisplayProps<'_>) {
        let state = props.state;
        let notice = notice_line(state);
        let chunks = Layout::vertical([
            Constraint::Length(1),                                 // Title bar
            Constraint::Length(1),                                 // Query
            Constraint::Length(u16::from(notice.is_some())),       // Error strip
            Constraint::Min(1),                                    // Main content
            Constraint::Length(RecentList::height(&state.recent)), // Recent searches
            Constraint::Length(1),                                 // Help bar
        ])
        .split(area);

        render_title(frame, chunks[0], state);
        render_query(frame, chunks[1], state);
        if let Some(line) = notice {
            frame.render_widget(Paragraph::new(line), chunks[2]);
        }

        let mut body = WeatherBody;
        body.render(frame, chunks[3], WeatherBodyProps { state });

        self.recent.render(
            frame,
            chunks[4],
            RecentListProps {
                recent: &state.recent,
                selected: state.recent_selected,
                is_focused: props.is_focused,
                on_select: Action::RecentHighlight,
            },
        );

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[5],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("/", "search"),
                    StatusBarHint::new("l", "locate"),
                    StatusBarHint::new("u", "units"),
                    StatusBarHint::new("c", "clear"),
                    StatusBarHint::new("1-5", "recent"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn render_title(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::horizontal([Constraint::Min(1), Constraint::Length(12)]).split(area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::styled(
            APP_TITLE,
            Style::default().fg(Color::White).bold(),
        )])),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled(
                state.unit.switch_label(),
                Style::default().fg(Color::Cyan),
            )])
            .right_aligned(),
        ),
        chunks[1],
    );
}

fn render_query(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled("Search: ", Style::default().fg(Color::DarkGray))];
    if state.query.is_empty() {
        spans.push(Span::styled(
            "Enter city name...",
            Style::default().fg(Color::DarkGray).italic(),
        ));
    } else {
        spans.push(Span::styled(
            state.query.clone(),
            Style::default().fg(Color::White),
        ));
    }
    if let Some(pending) = state.pending.as_ref().filter(|p| p.kind.is_foreground()) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(
                "{} {}",
                spinner_frame(state.tick_count),
                loading_message(&pending.kind)
            ),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Error strip, or the dim storage note when there is no error. The strip
/// stays empty while the body already shows the error in full.
fn notice_line(state: &AppState) -> Option<Line<'static>> {
    let body_shows_error = matches!(WeatherView::from_state(state), WeatherView::Error(_));
    if let Some(error) = state.error.as_ref().filter(|_| !body_shows_error) {
        return Some(Line::from(vec![
            Span::raw(format!("{ERROR_ICON} ")),
            Span::styled(error.clone(), Style::default().fg(Color::Red)),
        ]));
    }
    state.storage_error.as_ref().map(|msg| {
        Line::from(vec![Span::styled(
            format!("Recent searches not saved: {msg}"),
            Style::default().fg(Color::DarkGray),
        )])
    })
}

fn spinner_frame(tick_count: u32) -> char {
    match (tick_count / SPINNER_TICKS) % 4 {
        0 => '|',
        1 => '/',
        2 => '-',
        _ => '\\',
    }
}
