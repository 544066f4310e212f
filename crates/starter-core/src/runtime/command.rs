//! Running external commands with the terminal attached

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Render a command line for messages
pub(crate) fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program` in `cwd`, sharing this process's stdio, and wait for it
///
/// The error is a human-readable reason suitable for embedding in a
/// [`ScaffoldError`](crate::ScaffoldError).
pub(crate) async fn run_inherited(program: &str, args: &[String], cwd: &Path) -> Result<(), String> {
    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| e.to_string())?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("exit code {}", status.code().unwrap_or(-1)))
    }
}
