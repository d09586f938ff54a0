use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle,
};

use super::Component;
use crate::action::Action;
use crate::state::RecentSearches;

pub const RECENT_LABEL: &str = "Recent searches:";

/// Recent searches, most recent first, numbered for the `1`-`5` shortcuts
pub struct RecentList {
    list: SelectList,
}

impl Default for RecentList {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

pub struct RecentListProps<'a> {
    pub recent: &'a RecentSearches,
    pub selected: usize,
    pub is_focused: bool,
    pub on_select: fn(usize) -> Action,
}

impl RecentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows needed to show `recent`, label included. Zero hides the list.
    pub fn height(recent: &RecentSearches) -> u16 {
        if recent.is_empty() {
            0
        } else {
            recent.len() as u16 + 1
        }
    }

    fn items(recent: &RecentSearches) -> Vec<Line<'static>> {
        recent
            .iter()
            .enumerate()
            .map(|(i, city)| {
                Line::from(vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(Color::Cyan)),
                    Span::raw(city.to_string()),
                ])
            })
            .collect()
    }

    fn list_style() -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: None,
                fg: None,
            },
            selection: SelectionStyle::default(),
            scrollbar: ScrollbarStyle::default(),
        }
    }
}

impl Component<Action> for RecentList {
    type Props<'a> = RecentListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.recent.is_empty() {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if !matches!(key.code, KeyCode::Up | KeyCode::Down) {
            return Vec::new();
        }

        let items = Self::items(props.recent);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.selected,
            is_focused: true,
            style: Self::list_style(),
            behavior: SelectListBehavior::default(),
            on_select: props.on_select,
            render_item: &|item| item.clone(),
        };
        self.list
            .handle_event(event, list_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if props.recent.is_empty() || area.height == 0 {
            return;
        }

        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);
        let label = Line::from(vec![Span::styled(
            RECENT_LABEL,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )]);
        frame.render_widget(
            Paragraph::new(label),
            chunks[0].inner(Margin::new(1, 0)),
        );

        let items = Self::items(props.recent);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.selected,
            is_focused: props.is_focused,
            style: Self::list_style(),
            behavior: SelectListBehavior::default(),
            on_select: props.on_select,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, chunks[1], list_props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn recent() -> RecentSearches {
        RecentSearches::from_saved(vec!["Paris".into(), "Tokyo".into()])
    }

    #[test]
    fn test_height_hides_empty_list() {
        assert_eq!(RecentList::height(&RecentSearches::new()), 0);
        assert_eq!(RecentList::height(&recent()), 3);
    }

    #[test]
    fn test_render_numbers_entries() {
        let mut render = RenderHarness::new(40, 6);
        let mut list = RecentList::new();
        let recent = recent();

        let output = render.render_to_string_plain(|frame| {
            list.render(
                frame,
                frame.area(),
                RecentListProps {
                    recent: &recent,
                    selected: 0,
                    is_focused: true,
                    on_select: Action::RecentHighlight,
                },
            );
        });

        assert!(output.contains(RECENT_LABEL));
        assert!(output.contains("1 Paris"));
        assert!(output.contains("2 Tokyo"));
    }

    #[test]
    fn test_ignores_keys_other_than_arrows() {
        let mut list = RecentList::new();
        let recent = recent();
        let actions: Vec<_> = list
            .handle_event(
                &EventKind::Key(key("x")),
                RecentListProps {
                    recent: &recent,
                    selected: 0,
                    is_focused: true,
                    on_select: Action::RecentHighlight,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }
}
