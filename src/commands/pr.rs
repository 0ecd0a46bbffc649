use anyhow::Result;
use anyhow::anyhow;

use super::DEFAULT_BRANCH;
use super::required;
use crate::App;
use crate::ErrorList;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::ops::github::NewPullRequest;
use crate::repos::Presence;

#[derive(Debug, Clone)]
pub struct PrOptions {
    pub title: Option<String>,
    pub body: String,
    pub default_branch: String,
    /// Owner of the fork holding the branch; `None` opens the PR from the repository itself
    pub github_user: Option<String>,
}

impl Default for PrOptions {
    fn default() -> Self {
        Self {
            title: None,
            body: String::new(),
            default_branch: DEFAULT_BRANCH.to_string(),
            github_user: None,
        }
    }
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Open a pull request from the current branch of every cloned repository into its
    /// upstream default branch.
    pub async fn cmd_pr(
        &self,
        opts: &PrOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<ErrorList> {
        let title = required(
            &opts.title,
            "Please specify a pull request title with the --title argument.",
        )?;
        let repos = self.repo_set().await?;

        let mut errors = ErrorList::new();
        for repo in repos.select(Presence::Existing) {
            let branch = match self.git.current_branch(&repo.path).await {
                Ok(branch) => branch,
                Err(e) => {
                    errors.record(repo, "reading current branch", &e, stdout)?;
                    continue;
                }
            };
            if branch.is_empty() {
                let e = anyhow!("HEAD is detached");
                errors.record(repo, "creating pull request", &e, stdout)?;
                continue;
            }
            if branch == opts.default_branch {
                let e = anyhow!("current branch {} is the default branch", branch);
                errors.record(repo, "creating pull request", &e, stdout)?;
                continue;
            }

            let head = match &opts.github_user {
                Some(user) => format!("{}:{}", user, branch),
                None => branch,
            };
            let pr = NewPullRequest {
                repo: repo.slug(),
                title: title.to_string(),
                body: opts.body.clone(),
                head,
                base: opts.default_branch.clone(),
            };
            writeln!(
                stdout,
                "Creating pull request in {} from {} into {}",
                pr.repo, pr.head, pr.base
            )?;

            match self.gh.pr_create(&repo.path, &pr).await {
                Ok(url) => {
                    writeln!(stdout, "Created PR: {}", url)?;
                    tokio::time::sleep(self.config.pr_delay).await;
                }
                Err(e) => {
                    errors.record(repo, format!("creating pull request from {}", pr.head), &e, stdout)?;
                }
            }
        }

        Ok(errors)
    }
}
