//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;

use crate::api::{FetchError, PlaylistSource};

/// A source that answers every lookup with a fixed result, no network.
pub struct StubSource {
    pub response: Result<Value, u16>,
}

#[async_trait]
impl PlaylistSource for StubSource {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch(&self, _user_id: &str) -> Result<Value, FetchError> {
        match &self.response {
            Ok(value) => Ok(value.clone()),
            Err(status) => Err(FetchError::Status {
                status: *status,
                body: String::new(),
            }),
        }
    }
}

/// Creates a test App whose source returns an empty object.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(StubSource {
            response: Ok(Value::Object(Default::default())),
        }),
        "http://test.invalid/user-playlist".to_string(),
    )
}
