use anyhow::Result;

use crate::config::Config;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::repos::RepoSet;

pub struct App<G: GitOps, H: GithubOps> {
    pub config: Config,
    pub git: G,
    pub gh: H,
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    pub fn new(config: Config, git: G, gh: H) -> Self {
        Self { config, git, gh }
    }

    /// Load and validate the configured repos file
    pub(crate) async fn repo_set(&self) -> Result<RepoSet> {
        RepoSet::load(&self.config.repos_file, &self.config.destination).await
    }
}
