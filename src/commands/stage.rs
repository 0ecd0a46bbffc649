use anyhow::Result;
use tracing::warn;

use super::required;
use crate::App;
use crate::ErrorList;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::repos::Presence;

/// Pathspec staging every change in the working tree
pub const ALL_CHANGES: &str = ".";

#[derive(Debug, Clone)]
pub struct StageOptions {
    /// Pathspecs to stage; empty means [`ALL_CHANGES`]
    pub files: Vec<String>,
    pub message: Option<String>,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            files: vec![ALL_CHANGES.to_string()],
            message: None,
        }
    }
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Stage the given paths in every cloned repository and commit them.
    ///
    /// The commit takes everything staged, not only the last path added.
    pub async fn cmd_stage(
        &self,
        opts: &StageOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<ErrorList> {
        let message = required(
            &opts.message,
            "Please specify a commit message with the --message argument.",
        )?;
        let files: Vec<&str> = if opts.files.is_empty() {
            vec![ALL_CHANGES]
        } else {
            opts.files.iter().map(String::as_str).collect()
        };
        let repos = self.repo_set().await?;

        let mut errors = ErrorList::new();
        'repos: for repo in repos.select(Presence::Existing) {
            for file in &files {
                if *file == ALL_CHANGES {
                    writeln!(stdout, "Adding all changes in {} to staging:", repo.name)?;
                    match self.git.status_porcelain(&repo.path).await {
                        Ok(status) => write!(stdout, "{}", status)?,
                        Err(e) => warn!(repo = %repo.name, "Failed to read status: {:#}", e),
                    }
                } else {
                    writeln!(stdout, "Adding {} to staging in {}", file, repo.name)?;
                }

                if let Err(e) = self.git.add(&repo.path, file).await {
                    errors.record(repo, format!("staging {}", file), &e, stdout)?;
                    continue 'repos;
                }
            }

            writeln!(
                stdout,
                "Committing changes in {} with message {}",
                repo.name, message
            )?;
            if let Err(e) = self.git.commit(&repo.path, message).await {
                errors.record(repo, "committing changes", &e, stdout)?;
            }
        }

        Ok(errors)
    }
}
