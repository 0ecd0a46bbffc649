//! Resolution of the managed repository set.
//!
//! The repos file lists one SSH remote URL per line. Blank lines and lines starting
//! with `#` are ignored. Every other line must look like `git@<host>:<owner>/<name>.git`;
//! the whole file is validated before any entry is handed out.

use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use thiserror::Error;
use tracing::info;
use tracing::warn;

static REMOTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@([A-Za-z0-9._-]+):([A-Za-z0-9._-]+)/([A-Za-z0-9._-]+)\.git$").unwrap()
});

/// Match `url` against the remote URL pattern.
///
/// Names made only of dots are refused: `.` and `..` would resolve to the destination
/// itself or its parent.
fn remote_captures(url: &str) -> Option<regex::Captures<'_>> {
    let caps = REMOTE_URL.captures(url)?;
    if caps[3].chars().all(|c| c == '.') {
        return None;
    }
    Some(caps)
}

// -----------------------------------------------------------------------------
// Types

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("line {line}: `{content}` is not a repository URL of the form git@<host>:<owner>/<name>.git")]
    MalformedLine { line: usize, content: String },
}

/// One managed repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub name: String,
    /// Working tree location, `<destination>/<name>`
    pub path: PathBuf,
    pub url: String,
    pub host: String,
    pub owner: String,
}

/// Which entries an operation wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Only repositories not yet on disk (clone)
    Missing,
    /// Only repositories already on disk (everything else)
    Existing,
}

/// The validated contents of a repos file.
#[derive(Debug, Clone)]
pub struct RepoSet {
    destination: PathBuf,
    entries: Vec<RepoEntry>,
}

// -----------------------------------------------------------------------------
// Parsing

fn entry_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Check every non-comment line against the remote URL pattern.
///
/// Stops at the first malformed line.
pub fn validate<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<(), ValidationError> {
    for (i, line) in lines.into_iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if remote_captures(line).is_none() {
            return Err(ValidationError::MalformedLine {
                line: i + 1,
                content: line.to_string(),
            });
        }
    }
    Ok(())
}

impl RepoEntry {
    /// Build the entry for `url`, rooted in `destination`.
    ///
    /// Returns `None` when `url` does not match the remote URL pattern.
    pub fn parse(url: &str, destination: &Path) -> Option<Self> {
        let caps = remote_captures(url)?;
        let name = caps[3].to_string();
        Some(Self {
            path: destination.join(&name),
            name,
            url: url.to_string(),
            host: caps[1].to_string(),
            owner: caps[2].to_string(),
        })
    }

    /// `owner/name`, as GitHub addresses the repository
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// The same repository under `user`'s account on the same host
    pub fn fork_url(&self, user: &str) -> String {
        format!("git@{}:{}/{}.git", self.host, user, self.name)
    }
}

impl RepoSet {
    pub fn parse(contents: &str, destination: &Path) -> Result<Self, ValidationError> {
        validate(contents.lines())?;

        let entries = entry_lines(contents)
            .map(|(line, url)| {
                RepoEntry::parse(url, destination).ok_or_else(|| ValidationError::MalformedLine {
                    line,
                    content: url.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            destination: destination.to_path_buf(),
            entries,
        })
    }

    /// Read and validate `repos_file`. Every call reads the file afresh.
    pub async fn load(repos_file: &Path, destination: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(repos_file)
            .await
            .with_context(|| format!("Failed to read repos file {}", repos_file.display()))?;
        let set = Self::parse(&contents, destination)
            .with_context(|| format!("Invalid repos file {}", repos_file.display()))?;
        Ok(set)
    }

    /// All entries in file order, duplicates included
    pub fn entries(&self) -> &[RepoEntry] {
        &self.entries
    }

    /// Entries in file order whose on-disk state matches `presence`.
    ///
    /// The existence check happens as the iterator is consumed, so a repository
    /// created by an earlier step of the same run is seen as existing.
    pub fn select(&self, presence: Presence) -> impl Iterator<Item = &RepoEntry> + '_ {
        self.entries.iter().filter(move |entry| {
            let exists = entry.path.exists();
            match (presence, exists) {
                (Presence::Missing, true) => {
                    info!(repo = %entry.name, "Skipping {} as it already exists", entry.name);
                    false
                }
                (Presence::Existing, false) => {
                    warn!(
                        repo = %entry.name,
                        "Skipping {} as it doesn't exist in {}",
                        entry.name,
                        self.destination.display()
                    );
                    false
                }
                _ => true,
            }
        })
    }
}
