#![allow(async_fn_in_trait)]

use std::path::Path;

use anyhow::Result;
#[cfg(test)]
use mockall::automock;

use super::process::run;

// -----------------------------------------------------------------------------
// Types

/// A pull request to open on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Target repository as `owner/name`
    pub repo: String,
    pub title: String,
    pub body: String,
    /// Branch holding the changes, optionally qualified as `user:branch` for forks
    pub head: String,
    /// Branch the changes should be merged into
    pub base: String,
}

// -----------------------------------------------------------------------------
// GithubOps trait

/// Operations for interacting with GitHub
#[cfg_attr(test, automock)]
pub trait GithubOps {
    /// Create a new PR and return the PR URL
    async fn pr_create(&self, path: &Path, pr: &NewPullRequest) -> Result<String>;
}

// -----------------------------------------------------------------------------
// RealGithub

/// Real implementation that calls the gh CLI
pub struct RealGithub;

impl GithubOps for RealGithub {
    async fn pr_create(&self, path: &Path, pr: &NewPullRequest) -> Result<String> {
        let out = run(
            "gh",
            &[
                "pr", "create", "--repo", &pr.repo, "--title", &pr.title, "--body", &pr.body,
                "--head", &pr.head, "--base", &pr.base,
            ],
            path,
        )
        .await?;

        // gh prints progress lines before the URL
        let url = out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .unwrap_or_default();
        Ok(url.to_string())
    }
}
