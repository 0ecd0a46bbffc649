use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use tokio::process::Command;
use tracing::debug;

/// Run `program` with `args` in `cwd` and return its stdout.
///
/// A non-zero exit status becomes an error carrying the command line and the trimmed
/// stderr of the process.
pub(crate) async fn run(program: &str, args: &[&str], cwd: &Path) -> Result<String> {
    debug!(%program, ?args, cwd = %cwd.display(), "exec");

    let output = Command::new(program)
        .current_dir(cwd)
        .args(args)
        .output()
        .await
        .with_context(|| format!("Failed to execute {} command", program))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "`{} {}` failed ({}): {}",
            program,
            args.join(" "),
            output.status,
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
