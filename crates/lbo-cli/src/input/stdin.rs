use serde::de::DeserializeOwned;
use std::io::{self, Read};
use tracing::debug;

/// Whether stdin is an interactive terminal.
pub fn is_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Read piped JSON from stdin into `T`.
///
/// `None` when stdin is a terminal or the pipe carried only whitespace, so
/// the caller can fall back to its defaults.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if is_tty() {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        debug!("stdin pipe was empty");
        return Ok(None);
    }

    let value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse JSON from stdin: {e}"))?;
    Ok(Some(value))
}
