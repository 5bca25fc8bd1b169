//! Output handling for the CLI
//!
//! Results go to stdout; logs go to stderr through tracing.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Write one line to stdout
pub fn write_line(line: impl std::fmt::Display) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

/// File a dumped endpoint is written to: `<out>/<endpoint>.json`
pub fn dump_path(out: &Path, endpoint: &str) -> CliResult<PathBuf> {
    let endpoint = endpoint.trim_matches('/');
    if endpoint.is_empty() || endpoint.split('/').any(|part| part.is_empty() || part == "..") {
        return Err(CliError::invalid_argument(format!(
            "invalid endpoint '{}'",
            endpoint
        )));
    }
    Ok(out.join(format!("{}.json", endpoint)))
}

/// Write a payload wrapped in the `data` envelope, pretty-printed
pub fn write_dump(path: &Path, data: Value) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(&json!({ "data": data }))?;
    std::fs::write(path, body + "\n")?;
    Ok(())
}
