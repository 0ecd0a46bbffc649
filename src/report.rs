use std::fmt::Display;
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::repos::RepoEntry;

// -----------------------------------------------------------------------------
// Types

/// A failed step for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoFailure {
    pub repo: String,
    pub path: PathBuf,
    /// What was attempted, e.g. "creating branch feature"
    pub action: String,
    pub error: String,
}

impl Display for RepoFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Error {} in {} at {}: {}",
            self.action,
            self.repo,
            self.path.display(),
            self.error
        )
    }
}

/// Failures accumulated over one operation, in the order they happened.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorList {
    failures: Vec<RepoFailure>,
}

/// Final report of an operation, printed by the CLI.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub operation: &'a str,
    pub success: bool,
    pub errors: &'a ErrorList,
}

// -----------------------------------------------------------------------------
// ErrorList impl

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed step for `entry` and echo it to `stdout`.
    pub fn record(
        &mut self,
        entry: &RepoEntry,
        action: impl Into<String>,
        error: &anyhow::Error,
        stdout: &mut impl std::io::Write,
    ) -> std::io::Result<()> {
        let failure = RepoFailure {
            repo: entry.name.clone(),
            path: entry.path.clone(),
            action: action.into(),
            error: format!("{:#}", error),
        };
        tracing::debug!(repo = %failure.repo, action = %failure.action, "step failed");
        writeln!(stdout, "{}", failure.to_string().red())?;
        self.failures.push(failure);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepoFailure> {
        self.failures.iter()
    }

    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

// -----------------------------------------------------------------------------
// Summary impl

impl<'a> Summary<'a> {
    pub fn new(operation: &'a str, errors: &'a ErrorList) -> Self {
        Self {
            operation,
            success: errors.is_empty(),
            errors,
        }
    }

    pub fn write_text(&self, stdout: &mut impl std::io::Write) -> std::io::Result<()> {
        if self.success {
            writeln!(stdout, "{}", format!("{} finished without errors", self.operation).green())?;
            return Ok(());
        }

        writeln!(
            stdout,
            "{}",
            format!(
                "The following {} error(s) occurred during {}:",
                self.errors.len(),
                self.operation
            )
            .red()
            .bold()
        )?;
        for failure in self.errors.iter() {
            writeln!(stdout, "  {}", failure)?;
        }
        Ok(())
    }

    pub fn write_json(&self, stdout: &mut impl std::io::Write) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *stdout, self)?;
        writeln!(stdout)?;
        Ok(())
    }
}
