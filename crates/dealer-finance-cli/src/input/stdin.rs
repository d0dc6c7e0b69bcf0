use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a JSON request body from stdin when one is piped in.
///
/// Returns `None` on an interactive terminal or an empty pipe.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: T = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse request from stdin: {e}"))?;
    Ok(Some(value))
}

/// Request body from `--input`, else from piped stdin.
pub fn read_request<T: DeserializeOwned>(
    input: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match input {
        Some(path) => super::file::read_json(path).map(Some),
        None => read_stdin(),
    }
}
