use anyhow::Result;

use super::DEFAULT_BRANCH;
use super::DEFAULT_REMOTE;
use super::UPSTREAM_REMOTE;
use crate::App;
use crate::ErrorList;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::repos::Presence;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub default_branch: String,
    /// Remote to rebase from
    pub upstream: String,
    /// Push the rebased default branch to `remote` afterwards
    pub push: bool,
    pub remote: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            default_branch: DEFAULT_BRANCH.to_string(),
            upstream: UPSTREAM_REMOTE.to_string(),
            push: false,
            remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Rebase the default branch of every cloned repository onto its upstream, and
    /// optionally push it to the fork.
    pub async fn cmd_sync(
        &self,
        opts: &SyncOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<ErrorList> {
        let repos = self.repo_set().await?;
        let branch = opts.default_branch.as_str();
        let onto = format!("{}/{}", opts.upstream, branch);

        let mut errors = ErrorList::new();
        for repo in repos.select(Presence::Existing) {
            writeln!(
                stdout,
                "Syncing {} from {} to {}",
                repo.name,
                onto,
                repo.path.display()
            )?;

            if let Err(e) = self.git.switch(&repo.path, branch).await {
                errors.record(repo, format!("switching to {}", branch), &e, stdout)?;
                continue;
            }
            if let Err(e) = self.git.fetch_all(&repo.path).await {
                errors.record(repo, "fetching remotes", &e, stdout)?;
                continue;
            }
            if let Err(e) = self.git.rebase(&repo.path, &onto).await {
                errors.record(repo, format!("rebasing onto {}", onto), &e, stdout)?;
                continue;
            }

            if opts.push {
                writeln!(stdout, "Pushing {} to {}", repo.name, opts.remote)?;
                if let Err(e) = self.git.push(&repo.path, &opts.remote, branch).await {
                    errors.record(
                        repo,
                        format!("pushing {} to {}", branch, opts.remote),
                        &e,
                        stdout,
                    )?;
                }
            }
        }

        Ok(errors)
    }
}
