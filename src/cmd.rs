use std::process::{Command, Output, Stdio};

use log::debug;

use crate::error::{BulkError, BulkResult};

/// Header names whose values never reach logs or error
/// messages.
const SECRET_HEADERS: [&str; 2] = ["authorization:", "x-auth-key:"];

/// Run a command and capture its output. Fails if the command
/// returns a non-zero exit code.
pub fn run(program: &str, args: &[&str]) -> BulkResult<String> {
    let output = spawn(program, args)?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let command = format_command(program, args);
        debug!("{command} failed: {stderr}");
        Err(BulkError::CommandFailed {
            command,
            status: output.status,
            stderr,
        })
    }
}

/// Check if a command exists on PATH.
#[must_use]
pub fn command_exists(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

fn spawn(program: &str, args: &[&str]) -> BulkResult<Output> {
    Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BulkError::CommandNotFound(program.to_string())
            } else {
                BulkError::Io(e)
            }
        })
}

/// Render a command line for diagnostics, masking credential
/// headers.
#[must_use]
pub fn format_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| redact(a)));
    parts.join(" ")
}

fn redact(arg: &str) -> String {
    let lower = arg.to_ascii_lowercase();
    SECRET_HEADERS
        .iter()
        .find(|h| lower.starts_with(*h))
        .map_or_else(|| arg.to_string(), |h| format!("{}***", &arg[..h.len()]))
}
