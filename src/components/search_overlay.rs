use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, TextInput, TextInputProps,
    TextInputStyle, centered_rect,
};

use super::Component;
use crate::action::Action;

pub const SEARCH_PLACEHOLDER: &str = "Enter city name...";

const OVERLAY_BG: Color = Color::Rgb(35, 35, 45);
const INPUT_BG: Color = Color::Rgb(50, 50, 60);
/// Rows: input (3), gap, hint, plus modal padding
const OVERLAY_HEIGHT: u16 = 7;

fn plain_base(padding: Padding) -> BaseStyle {
    BaseStyle {
        border: None,
        padding,
        bg: None,
        fg: None,
    }
}

fn input_style(bg: Option<Color>, padding: Padding) -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            bg,
            ..plain_base(padding)
        },
        placeholder_style: None,
        cursor_style: None,
    }
}

pub struct SearchOverlay {
    input: TextInput,
    modal: Modal,
    was_open: bool,
}

pub struct SearchOverlayProps<'a> {
    pub query: &'a str,
    pub is_focused: bool,
    /// Submitting is a no-op while a lookup is in flight
    pub is_loading: bool,
    pub on_query_change: fn(String) -> Action,
    pub on_query_submit: fn(String) -> Action,
}

impl Default for SearchOverlay {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            modal: Modal::new(),
            was_open: false,
        }
    }
}

impl SearchOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the input state each time the overlay opens.
    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.input = TextInput::new();
        }
        self.was_open = is_open;
    }
}

impl Component<Action> for SearchOverlay {
    type Props<'a> = SearchOverlayProps<'a>;

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

        match key.code {
            KeyCode::Esc => return vec![Action::SearchClose],
            KeyCode::Enter => return vec![(props.on_query_submit)(props.query.to_string())],
            _ => {}
        }

        // Editing keys: the input only reads focus and value here
        let input_props = TextInputProps {
            value: props.query,
            placeholder: SEARCH_PLACEHOLDER,
            is_focused: true,
            style: input_style(None, Padding::new(1, 0, 1, 0)),
            on_change: props.on_query_change,
            on_submit: props.on_query_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < OVERLAY_HEIGHT {
            return;
        }

        let SearchOverlay { input, modal, .. } = self;
        let modal_area = centered_rect(60, OVERLAY_HEIGHT, area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Input
                Constraint::Length(1),
                Constraint::Length(1), // Hint
            ])
            .split(content_area);

            let input_props = TextInputProps {
                value: props.query,
                placeholder: SEARCH_PLACEHOLDER,
                is_focused: props.is_focused,
                style: input_style(Some(INPUT_BG), Padding::all(1)),
                on_change: props.on_query_change,
                on_submit: props.on_query_submit,
                on_cursor_move: Some(|_| Action::Render),
            };
            input.render(frame, chunks[0], input_props);

            let enter_hint = if props.is_loading {
                " wait for the current lookup"
            } else {
                " search"
            };
            let hint = Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Cyan)),
                Span::styled(enter_hint, Style::default().fg(Color::DarkGray)),
                Span::raw("   "),
                Span::styled("Esc", Style::default().fg(Color::Cyan)),
                Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
            ])
            .centered();
            frame.render_widget(Paragraph::new(hint), chunks[2]);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(OVERLAY_BG),
                        ..plain_base(Padding::default())
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::SearchClose,
                render_content: &mut render_content,
            },
        );
    }
}
