use serde_json::Value;
use std::io::{self, Read};

/// Read piped loan input from stdin. Returns None on a TTY or empty input.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    tracing::debug!(bytes = trimmed.len(), "read loan input from stdin");
    let value: Value = serde_json::from_str(trimmed).map_err(|e| {
        format!(
            "Loan input on stdin is not valid JSON (line {}, column {}): {}",
            e.line(),
            e.column(),
            e
        )
    })?;
    Ok(Some(value))
}
