//! # Application State
//!
//! Core state for the playlist lookup. Domain data only, no TUI types.
//! The input text lives in the TUI (`InputBox`); it only reaches the core
//! when the user submits it.
//!
//! ```text
//! App
//! ├── source: Arc<dyn PlaylistSource>  // where lookups go
//! ├── endpoint: String                 // shown in the title bar
//! ├── payload: Option<Value>           // last successful response
//! ├── error: Option<String>            // last failure message
//! ├── pending: usize                   // requests in flight
//! ├── next_request_id: u64             // log correlation only
//! └── status_message: String           // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::api::PlaylistSource;
use serde_json::Value;
use std::sync::Arc;

/// What the response area shows. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Error,
}

pub struct App {
    pub source: Arc<dyn PlaylistSource>,
    pub endpoint: String,
    pub payload: Option<Value>,
    pub error: Option<String>,
    /// Number of submitted lookups that have not settled yet.
    pub pending: usize,
    pub next_request_id: u64,
    pub status_message: String,
}

impl App {
    pub fn new(source: Arc<dyn PlaylistSource>, endpoint: String) -> Self {
        Self {
            source,
            endpoint,
            payload: None,
            error: None,
            pending: 0,
            next_request_id: 1,
            status_message: String::new(),
        }
    }

    /// Loading wins while anything is in flight; payload and error are kept
    /// underneath and reappear only once a request settles.
    pub fn status(&self) -> Status {
        if self.pending > 0 {
            Status::Loading
        } else if self.error.is_some() {
            Status::Error
        } else {
            Status::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// The payload as two-space indented JSON.
    pub fn pretty_payload(&self) -> Option<String> {
        self.payload
            .as_ref()
            .and_then(|value| serde_json::to_string_pretty(value).ok())
    }
}
