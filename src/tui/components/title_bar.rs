//! # TitleBar Component
//!
//! Single-line header: the page title, the endpoint being queried and the
//! latest status message.
//!
//! Purely presentational. All three fields are props:
//! - `endpoint`: from the resolved config (via `App`)
//! - `status_message`: from `App`, set by the reducer
//! - `in_flight`: number of requests not yet settled

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const TITLE: &str = "User Playlist API";

pub struct TitleBar {
    pub endpoint: String,
    pub status_message: String,
    pub in_flight: usize,
}

impl TitleBar {
    pub fn new(endpoint: String, status_message: String, in_flight: usize) -> Self {
        Self {
            endpoint,
            status_message,
            in_flight,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" ({})", self.endpoint),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.in_flight > 1 {
            spans.push(Span::styled(
                format!(" | {} in flight", self.in_flight),
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
