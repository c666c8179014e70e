//! # ResponseView Component
//!
//! The display area under the input row. Shows exactly one of:
//!
//! - the loading indicator while any lookup is in flight,
//! - the error message after a failed lookup,
//! - the pretty-printed, highlighted JSON of the last successful lookup,
//! - a hint when nothing has been looked up yet.
//!
//! `ResponseView` is transient (built each frame) and wraps the persistent
//! `ResponseViewState` that owns scroll position and the highlight cache.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::{App, Status};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::highlight::highlight_json;

pub const LOADING_TEXT: &str = "Loading...";
pub const RESPONSE_TITLE: &str = "API Response:";
pub const IDLE_HINT: &str = "Type a user id, then press Enter or click Go.";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Scroll and cache state; must be persisted in the parent TuiState.
#[derive(Default)]
pub struct ResponseViewState {
    pub scroll_state: ScrollViewState,
    /// Pretty JSON and its highlighted form, rebuilt when the payload changes
    cache: Option<(String, Text<'static>)>,
    /// Last known viewport and content heights (for scroll clamping)
    pub viewport_height: u16,
    pub content_height: u16,
}

impl ResponseViewState {
    pub fn new() -> Self {
        Self::default()
    }

    fn highlighted(&mut self, pretty: String) -> Text<'static> {
        match &self.cache {
            Some((cached, text)) if *cached == pretty => text.clone(),
            _ => {
                let text = highlight_json(&pretty);
                // New document: start reading from the top
                self.scroll_state.scroll_to_top();
                self.cache = Some((pretty, text.clone()));
                text
            }
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for ResponseViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        Some(())
    }
}

/// Rows the paragraph needs at `width`, capped at what a `Rect` can hold.
fn wrapped_height(paragraph: &Paragraph, width: u16) -> u16 {
    u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX)
}

pub struct ResponseView<'a> {
    pub app: &'a App,
    pub state: &'a mut ResponseViewState,
    pub spinner_frame: usize,
}

impl<'a> ResponseView<'a> {
    pub fn new(app: &'a App, state: &'a mut ResponseViewState, spinner_frame: usize) -> Self {
        Self {
            app,
            state,
            spinner_frame,
        }
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        let line = Line::from(vec![
            Span::styled(format!("{spinner} "), Style::default().fg(Color::Yellow)),
            Span::styled(LOADING_TEXT, Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(Paragraph::new(line).block(Block::bordered()), area);
    }

    fn render_error(&self, frame: &mut Frame, area: Rect, message: &str) {
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .block(Block::bordered().border_style(Style::default().fg(Color::Red)))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_hint(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(IDLE_HINT)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::default().add_modifier(Modifier::DIM)));
        frame.render_widget(paragraph, area);
    }

    fn render_payload(&mut self, frame: &mut Frame, area: Rect, pretty: String) {
        let block = Block::bordered()
            .title(RESPONSE_TITLE)
            .title_style(Style::default().add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = self.state.highlighted(pretty);
        // One column for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
        let content_height = wrapped_height(&paragraph, content_width);

        self.state.viewport_height = inner.height;
        self.state.content_height = content_height;
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, content_height));

        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}

impl Component for ResponseView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        match self.app.status() {
            Status::Loading => self.render_loading(frame, area),
            Status::Error => {
                let message = self.app.error.clone().unwrap_or_default();
                self.render_error(frame, area, &message);
            }
            Status::Idle => match self.app.pretty_payload() {
                Some(pretty) => self.render_payload(frame, area, pretty),
                None => self.render_hint(frame, area),
            },
        }
    }
}
