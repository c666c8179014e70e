use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::go_button::BUTTON_WIDTH;
use crate::tui::components::{GoButton, ResponseView, TitleBar};

/// The four regions of the page.
pub struct PageAreas {
    pub title: Rect,
    pub input: Rect,
    pub button: Rect,
    pub response: Rect,
}

/// Split the frame: title line, input row (field + Go), response area.
pub fn page_areas(frame_area: Rect) -> PageAreas {
    use Constraint::{Length, Min};

    let [title, input_row, response] =
        Layout::vertical([Length(1), Length(3), Min(0)]).areas(frame_area);
    let [input, button] = Layout::horizontal([Min(0), Length(BUTTON_WIDTH)]).areas(input_row);

    PageAreas {
        title,
        input,
        button,
        response,
    }
}

/// Hit test: does a click at (`column`, `row`) land on the Go button?
pub fn hit_test_button(column: u16, row: u16, frame_area: Rect) -> bool {
    GoButton::hit(page_areas(frame_area).button, column, row)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let areas = page_areas(frame.area());

    TitleBar::new(app.endpoint.clone(), app.status_message.clone(), app.pending)
        .render(frame, areas.title);

    tui.input_box.render(frame, areas.input);
    GoButton::new(app.is_loading()).render(frame, areas.button);

    ResponseView::new(app, &mut tui.response, spinner_frame).render(frame, areas.response);
}
