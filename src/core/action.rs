//! # Actions
//!
//! Everything that can happen becomes an `Action`.
//! User presses Enter or clicks Go? That's `Action::Submit(user_id)`.
//! The endpoint answers? That's `Action::FetchSucceeded` or `Action::FetchFailed`.
//!
//! `update()` folds an action into the state and returns an `Effect` telling
//! the adapter what I/O to perform. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Results are applied in the order they arrive, so when lookups overlap the
//! last one to resolve decides what is shown.

use log::{debug, info};
use serde_json::Value;

use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start a lookup for the given raw (unencoded) user id.
    Submit(String),
    FetchSucceeded { request_id: u64, payload: Value },
    FetchFailed { request_id: u64, message: String },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SpawnFetch { request_id: u64, user_id: String },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(user_id) => {
            let request_id = app.next_request_id;
            app.next_request_id += 1;
            app.pending += 1;
            app.status_message = format!("Looking up {user_id:?}");
            info!(
                "Submit #{} for user id {:?} ({} in flight)",
                request_id, user_id, app.pending
            );
            // Payload and error stay put until this request settles.
            Effect::SpawnFetch {
                request_id,
                user_id,
            }
        }
        Action::FetchSucceeded {
            request_id,
            payload,
        } => {
            app.pending = app.pending.saturating_sub(1);
            debug!("Request #{} succeeded ({} still in flight)", request_id, app.pending);
            app.payload = Some(payload);
            app.error = None;
            app.status_message = format!("Request #{request_id} succeeded");
            Effect::None
        }
        Action::FetchFailed {
            request_id,
            message,
        } => {
            app.pending = app.pending.saturating_sub(1);
            debug!("Request #{} failed ({} still in flight)", request_id, app.pending);
            app.payload = None;
            app.error = Some(message);
            app.status_message = format!("Request #{request_id} failed");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
