use anyhow::Result;

use super::required;
use crate::App;
use crate::ErrorList;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::repos::Presence;

#[derive(Debug, Clone, Default)]
pub struct BranchOptions {
    pub branch: Option<String>,
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Create a new feature branch and switch to it in every cloned repository.
    pub async fn cmd_branch(
        &self,
        opts: &BranchOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<ErrorList> {
        let branch = required(
            &opts.branch,
            "Please specify a branch to create with the --branch argument.",
        )?;
        let repos = self.repo_set().await?;

        let mut errors = ErrorList::new();
        for repo in repos.select(Presence::Existing) {
            writeln!(
                stdout,
                "Creating and switching to feature branch {} in {}",
                branch, repo.name
            )?;
            if let Err(e) = self.git.switch_create(&repo.path, branch).await {
                errors.record(repo, format!("creating branch {}", branch), &e, stdout)?;
            }
        }

        Ok(errors)
    }
}
