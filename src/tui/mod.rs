//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the page,
//! and translates keyboard and mouse events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or finished lookups.
//!
//! ## Requests
//!
//! Each submit spawns one tokio task. Tasks report back through an mpsc
//! channel of `Action`s; the loop applies them in arrival order. Nothing is
//! cancelled or deduplicated.

mod component;
mod components;
mod event;
mod highlight;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::api::PlaylistSource;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, ResponseViewState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core logic)
pub struct TuiState {
    pub input_box: InputBox,
    pub response: ResponseViewState,
}

impl TuiState {
    pub fn new(input_box: InputBox) -> Self {
        Self {
            input_box,
            response: ResponseViewState::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Apply `action` and carry out the resulting effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::Quit => true,
        Effect::SpawnFetch {
            request_id,
            user_id,
        } => {
            spawn_fetch(app.source.clone(), request_id, user_id, tx.clone());
            false
        }
        Effect::None => false,
    }
}

pub fn run(config: ResolvedConfig, source: Arc<dyn PlaylistSource>) -> std::io::Result<()> {
    let mut app = App::new(source, config.target().to_string());
    let initial_input = match &config.user_id {
        Some(id) => InputBox::with_text(id),
        None => InputBox::new(),
    };
    let mut tui = TuiState::new(initial_input);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    if let Some(id) = config.user_id.clone() {
        info!("Submitting initial user id from config/CLI");
        dispatch(&mut app, Action::Submit(id), &tx);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    let result = loop {
        let animating = app.is_loading();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        // Short timeout while the spinner runs, long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain everything pending before the next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Resize => {}
                TuiEvent::Quit => {
                    should_quit = dispatch(&mut app, Action::Quit, &tx);
                }
                TuiEvent::MouseClick(column, row) => {
                    let frame_area = terminal.get_frame().area();
                    if ui::hit_test_button(column, row, frame_area) {
                        debug!("Go button clicked");
                        let user_id = tui.input_box.buffer.clone();
                        dispatch(&mut app, Action::Submit(user_id), &tx);
                    }
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.response.handle_event(&event);
                }
                _ => {
                    if let Some(InputEvent::Submit(user_id)) = tui.input_box.handle_event(&event) {
                        dispatch(&mut app, Action::Submit(user_id), &tx);
                    }
                }
            }
            if should_quit {
                break;
            }
        }

        if should_quit {
            break Ok(());
        }

        // Results from background lookups
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            dispatch(&mut app, action, &tx);
        }
    };

    ratatui::restore();
    result
}

/// Run one lookup on the tokio runtime and report the outcome as an Action.
pub(crate) fn spawn_fetch(
    source: Arc<dyn PlaylistSource>,
    request_id: u64,
    user_id: String,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning lookup #{} via {}", request_id, source.name());
    tokio::spawn(async move {
        let started = Instant::now();
        let action = match source.fetch(&user_id).await {
            Ok(payload) => {
                info!(
                    "Lookup #{} succeeded in {}ms",
                    request_id,
                    started.elapsed().as_millis()
                );
                Action::FetchSucceeded {
                    request_id,
                    payload,
                }
            }
            Err(e) => {
                warn!("Lookup #{} failed: {}", request_id, e);
                Action::FetchFailed {
                    request_id,
                    message: e.user_message().to_string(),
                }
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to report lookup #{}: receiver dropped", request_id);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PlaylistClient, USER_ERROR_MESSAGE};
    use crate::core::state::Status;
    use crate::test_support::StubSource;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PLAYLIST_PATH: &str = "/dev/user-playlist";

    fn app_with(response: Result<serde_json::Value, u16>) -> App {
        App::new(
            Arc::new(StubSource { response }),
            "http://test.invalid".to_string(),
        )
    }

    fn app_for(server: &MockServer) -> App {
        let endpoint = format!("{}{}", server.uri(), PLAYLIST_PATH);
        App::new(
            Arc::new(PlaylistClient::new(Some(endpoint.clone()))),
            endpoint,
        )
    }

    async fn recv(rx: mpsc::Receiver<Action>) -> (Action, mpsc::Receiver<Action>) {
        tokio::task::spawn_blocking(move || {
            let action = rx.recv().unwrap();
            (action, rx)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_submit_round_trip_success() {
        let mut app = app_with(Ok(json!({"items": ["a"]})));
        let (tx, rx) = mpsc::channel();

        assert!(!dispatch(&mut app, Action::Submit("bob".to_string()), &tx));
        assert_eq!(app.status(), Status::Loading);

        let action = tokio::task::spawn_blocking(move || rx.recv().unwrap())
            .await
            .unwrap();
        dispatch(&mut app, action, &tx);

        assert_eq!(app.status(), Status::Idle);
        assert_eq!(app.payload, Some(json!({"items": ["a"]})));
    }

    #[tokio::test]
    async fn test_dispatch_submit_round_trip_failure() {
        let mut app = app_with(Err(503));
        let (tx, rx) = mpsc::channel();

        dispatch(&mut app, Action::Submit("bob".to_string()), &tx);
        let action = tokio::task::spawn_blocking(move || rx.recv().unwrap())
            .await
            .unwrap();
        assert!(matches!(action, Action::FetchFailed { request_id: 1, .. }));
        dispatch(&mut app, action, &tx);

        assert_eq!(app.status(), Status::Error);
        assert_eq!(app.error.as_deref(), Some(USER_ERROR_MESSAGE));
        assert!(app.payload.is_none());
    }

    #[test]
    fn test_dispatch_quit() {
        let mut app = app_with(Ok(json!(null)));
        let (tx, _rx) = mpsc::channel();
        assert!(dispatch(&mut app, Action::Quit, &tx));
    }

    #[tokio::test]
    async fn test_spawn_fetch_reports_http_result() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PLAYLIST_PATH))
            .and(query_param("userId", "a b&c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let app = app_for(&mock_server);
        let (tx, rx) = mpsc::channel();
        spawn_fetch(app.source.clone(), 7, "a b&c".to_string(), tx);

        let (action, _rx) = recv(rx).await;
        match action {
            Action::FetchSucceeded {
                request_id,
                payload,
            } => {
                assert_eq!(request_id, 7);
                assert_eq!(payload, json!({"items": []}));
            }
            other => panic!("expected FetchSucceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_then_success_clears_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("userId", "bad"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("userId", "good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&mock_server)
            .await;

        let mut app = app_for(&mock_server);
        let (tx, rx) = mpsc::channel();

        dispatch(&mut app, Action::Submit("bad".to_string()), &tx);
        let (action, rx) = recv(rx).await;
        dispatch(&mut app, action, &tx);
        assert_eq!(app.status(), Status::Error);
        assert!(app.payload.is_none());

        dispatch(&mut app, Action::Submit("good".to_string()), &tx);
        assert_eq!(app.status(), Status::Loading);
        assert_eq!(app.error.as_deref(), Some(USER_ERROR_MESSAGE));

        let (action, _rx) = recv(rx).await;
        dispatch(&mut app, action, &tx);
        assert_eq!(app.status(), Status::Idle);
        assert!(app.error.is_none());
        assert_eq!(app.payload, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_overlapping_lookups_last_resolved_wins() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("userId", "slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"user": "slow"}))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("userId", "fast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": "fast"})))
            .mount(&mock_server)
            .await;

        let mut app = app_for(&mock_server);
        let (tx, rx) = mpsc::channel();

        // Issue slow first, fast second
        dispatch(&mut app, Action::Submit("slow".to_string()), &tx);
        dispatch(&mut app, Action::Submit("fast".to_string()), &tx);

        let (first, rx) = recv(rx).await;
        assert!(matches!(first, Action::FetchSucceeded { request_id: 2, .. }));
        dispatch(&mut app, first, &tx);
        assert_eq!(app.status(), Status::Loading);
        assert_eq!(app.payload, Some(json!({"user": "fast"})));

        let (second, _rx) = recv(rx).await;
        dispatch(&mut app, second, &tx);
        assert_eq!(app.status(), Status::Idle);
        assert_eq!(app.payload, Some(json!({"user": "slow"})));
    }
}
