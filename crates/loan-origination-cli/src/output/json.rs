use serde_json::Value;
use std::io::{self, Write};

/// Write the result envelope as pretty JSON on stdout.
pub fn print_json(value: &Value) {
    let mut out = io::stdout().lock();
    if let Err(e) = write_json(&mut out, value) {
        tracing::error!(error = %e, "failed to write loan output");
        eprintln!("Failed to write loan output: {}", e);
    }
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()
}
