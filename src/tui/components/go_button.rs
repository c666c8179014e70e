//! # GoButton Component
//!
//! The clickable **Go** button next to the input. It is never disabled:
//! clicking while a lookup is in flight starts another one.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::Component;

/// Columns reserved for the button, borders included.
pub const BUTTON_WIDTH: u16 = 8;
pub const LABEL: &str = "Go";

pub struct GoButton {
    /// A lookup is in flight (Prop). Only changes the colour.
    pub busy: bool,
}

impl GoButton {
    pub fn new(busy: bool) -> Self {
        Self { busy }
    }

    /// Whether a click at (`column`, `row`) lands on a button drawn in `area`.
    pub fn hit(area: Rect, column: u16, row: u16) -> bool {
        area.contains(Position::new(column, row))
    }
}

impl Component for GoButton {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let color = if self.busy { Color::Yellow } else { Color::Cyan };
        let button = Paragraph::new(LABEL)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color)),
            );
        frame.render_widget(button, area);
    }
}
