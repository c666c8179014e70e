//! One-shot lookup without the terminal UI (`--print`).

use std::io::{self, Write};

use log::warn;

use crate::api::PlaylistSource;

/// Fetch once and write pretty JSON to `out`.
///
/// On failure the generic message goes to `err` and the lookup error is
/// returned, so the caller decides the exit status.
pub async fn print_once(
    source: &dyn PlaylistSource,
    user_id: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    match source.fetch(user_id).await {
        Ok(payload) => {
            let pretty = serde_json::to_string_pretty(&payload)?;
            writeln!(out, "{pretty}")
        }
        Err(e) => {
            warn!("Lookup failed: {}", e);
            writeln!(err, "{}", e.user_message())?;
            Err(io::Error::other(e))
        }
    }
}
