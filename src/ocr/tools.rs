//! Helpers for the external command-line tools used during extraction.

use std::io;
use std::process::Output;

/// Outcome of running an external tool, before it is mapped to a module error.
#[derive(Debug)]
pub enum ToolFailure {
    /// The binary is not on PATH.
    NotFound,
    /// The tool ran but exited unsuccessfully.
    Failed(String),
    /// Spawning or waiting on the tool failed.
    Io(io::Error),
}

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Extract stdout from a finished command, or describe why it failed.
pub fn handle_cmd_output(result: io::Result<Output>, error_prefix: &str) -> Result<String, ToolFailure> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ToolFailure::Failed(format!(
                "{}: {}",
                error_prefix,
                stderr.trim()
            )))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ToolFailure::NotFound),
        Err(e) => Err(ToolFailure::Io(e)),
    }
}

/// Tools the extraction pipeline shells out to.
pub const REQUIRED_TOOLS: [&str; 4] = ["pdfinfo", "pdftotext", "pdftoppm", "tesseract"];

/// Report availability of every required tool.
pub fn check_tools() -> Vec<(String, bool)> {
    REQUIRED_TOOLS
        .iter()
        .map(|tool| (tool.to_string(), check_binary(tool)))
        .collect()
}
