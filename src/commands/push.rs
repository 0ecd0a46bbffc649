use anyhow::Result;

use super::DEFAULT_REMOTE;
use super::required;
use crate::App;
use crate::ErrorList;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::repos::Presence;

#[derive(Debug, Clone)]
pub struct PushOptions {
    pub branch: Option<String>,
    pub remote: String,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            branch: None,
            remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Push a branch of every cloned repository to a remote.
    pub async fn cmd_push(
        &self,
        opts: &PushOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<ErrorList> {
        let branch = required(
            &opts.branch,
            "Please specify a branch to push with the --branch argument.",
        )?;
        let repos = self.repo_set().await?;

        let mut errors = ErrorList::new();
        for repo in repos.select(Presence::Existing) {
            writeln!(stdout, "Pushing {}/{} to {}", repo.name, branch, opts.remote)?;
            if let Err(e) = self.git.push(&repo.path, &opts.remote, branch).await {
                errors.record(
                    repo,
                    format!("pushing {} to {}", branch, opts.remote),
                    &e,
                    stdout,
                )?;
            }
        }

        Ok(errors)
    }
}
