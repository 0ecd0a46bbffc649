use anyhow::Context;
use anyhow::Result;

use super::UPSTREAM_REMOTE;
use super::required;
use crate::App;
use crate::ErrorList;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::repos::Presence;

#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// Remote to add for the user's fork after cloning, if any
    pub set_remote: Option<String>,
    /// Owner of the fork; required with `set_remote`
    pub github_user: Option<String>,
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Clone every repository not yet present in the destination directory.
    ///
    /// With `set_remote`, the original remote is renamed to `upstream` and the user's
    /// fork is added under the requested name.
    pub async fn cmd_clone(
        &self,
        opts: &CloneOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<ErrorList> {
        let fork = match &opts.set_remote {
            Some(remote) => Some((
                remote.as_str(),
                required(
                    &opts.github_user,
                    "Remote cannot be updated, please specify a GitHub username for the fork with --github-user.",
                )?,
            )),
            None => None,
        };
        let repos = self.repo_set().await?;

        let destination = &self.config.destination;
        if !destination.exists() {
            tokio::fs::create_dir_all(destination)
                .await
                .with_context(|| format!("Failed to create {}", destination.display()))?;
            writeln!(stdout, "Created destination directory {}", destination.display())?;
        }

        let mut errors = ErrorList::new();
        for repo in repos.select(Presence::Missing) {
            writeln!(
                stdout,
                "Cloning {} from {} to {}",
                repo.name,
                repo.url,
                repo.path.display()
            )?;
            if let Err(e) = self.git.clone_repo(destination, &repo.url, &repo.name).await {
                errors.record(repo, format!("cloning {}", repo.url), &e, stdout)?;
                continue;
            }

            let Some((remote, user)) = fork else {
                continue;
            };

            writeln!(stdout, "Renaming origin to '{}'", UPSTREAM_REMOTE)?;
            if let Err(e) = self
                .git
                .remote_rename(&repo.path, "origin", UPSTREAM_REMOTE)
                .await
            {
                errors.record(
                    repo,
                    format!("renaming origin to {}", UPSTREAM_REMOTE),
                    &e,
                    stdout,
                )?;
                continue;
            }

            let fork_url = repo.fork_url(user);
            writeln!(stdout, "Setting remote {} of fork to {}", remote, fork_url)?;
            if let Err(e) = self.git.remote_add(&repo.path, remote, &fork_url).await {
                errors.record(repo, format!("adding remote {}", remote), &e, stdout)?;
                continue;
            }

            match self.git.remote_list(&repo.path).await {
                Ok(remotes) => write!(stdout, "{}", remotes)?,
                Err(e) => errors.record(repo, "listing remotes", &e, stdout)?,
            }
        }

        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use anyhow::anyhow;
    use mockall::Sequence;

    use super::*;
    use crate::app::testing::Fleet;
    use crate::app::testing::repo_name;
    use crate::ops::git::MockGitOps;
    use crate::ops::github::MockGithubOps;

    /// A clone expectation that creates the directory like git would
    fn expect_clones(git: &mut MockGitOps, times: usize) {
        git.expect_clone_repo()
            .times(times)
            .returning(|parent: &Path, _, name| {
                std::fs::create_dir(parent.join(name))?;
                Ok(())
            });
    }

    #[tokio::test]
    async fn test_cmd_clone_clones_every_missing_repo() {
        let fleet = Fleet::new(&["a", "b", "c"], &[]);
        let destination = fleet.config().destination;

        let mut git = MockGitOps::new();
        let expected = destination.clone();
        git.expect_clone_repo()
            .withf(move |parent, url, name| {
                parent == expected && url == format!("git@github.com:org/{}.git", name)
            })
            .times(3)
            .returning(|_, _, _| Ok(()));
        let app = fleet.app(git, MockGithubOps::new());

        let errors = app
            .cmd_clone(&CloneOptions::default(), &mut std::io::sink())
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_cmd_clone_twice_is_idempotent() {
        let fleet = Fleet::new(&["a", "b"], &[]);

        let mut git = MockGitOps::new();
        expect_clones(&mut git, 2);
        let app = fleet.app(git, MockGithubOps::new());
        let errors = app
            .cmd_clone(&CloneOptions::default(), &mut std::io::sink())
            .await
            .unwrap();
        assert!(errors.is_empty());

        // Second run: every repository exists, so no clone may be attempted
        let app = fleet.app(MockGitOps::new(), MockGithubOps::new());
        let errors = app
            .cmd_clone(&CloneOptions::default(), &mut std::io::sink())
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_cmd_clone_creates_destination() {
        let fleet = Fleet::new(&["a"], &[]);
        let destination = fleet.config().destination;
        std::fs::remove_dir(&destination).unwrap();

        let mut git = MockGitOps::new();
        git.expect_clone_repo().times(1).returning(|_, _, _| Ok(()));
        let app = fleet.app(git, MockGithubOps::new());

        let mut out = Vec::new();
        app.cmd_clone(&CloneOptions::default(), &mut out)
            .await
            .unwrap();
        assert!(destination.is_dir());
        insta::assert_snapshot!(fleet.redact(&out), @r"
        Created destination directory [TMP]/repos
        Cloning a from git@github.com:org/a.git to [TMP]/repos/a
        ");
    }

    #[tokio::test]
    async fn test_cmd_clone_set_remote_requires_github_user() {
        let fleet = Fleet::new(&["a"], &[]);
        let app = fleet.app(MockGitOps::new(), MockGithubOps::new());

        let opts = CloneOptions {
            set_remote: Some("origin".to_string()),
            github_user: None,
        };
        let err = app
            .cmd_clone(&opts, &mut std::io::sink())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Remote cannot be updated"));
    }

    #[tokio::test]
    async fn test_cmd_clone_sets_fork_remote() {
        let fleet = Fleet::new(&["hub"], &[]);
        let mut seq = Sequence::new();

        let mut git = MockGitOps::new();
        git.expect_clone_repo()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        git.expect_remote_rename()
            .withf(|_, old, new| old == "origin" && new == "upstream")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        git.expect_remote_add()
            .withf(|_, name, url| name == "fork" && url == "git@github.com:alice/hub.git")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        git.expect_remote_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("fork\tgit@github.com:alice/hub.git (fetch)\n".to_string()));
        let app = fleet.app(git, MockGithubOps::new());

        let opts = CloneOptions {
            set_remote: Some("fork".to_string()),
            github_user: Some("alice".to_string()),
        };
        let mut out = Vec::new();
        let errors = app.cmd_clone(&opts, &mut out).await.unwrap();

        assert!(errors.is_empty());
        insta::assert_snapshot!(fleet.redact(&out), @r"
        Cloning hub from git@github.com:org/hub.git to [TMP]/repos/hub
        Renaming origin to 'upstream'
        Setting remote fork of fork to git@github.com:alice/hub.git
        fork	git@github.com:alice/hub.git (fetch)
        ");
    }

    #[tokio::test]
    async fn test_cmd_clone_skips_remote_steps_after_failed_clone() {
        let fleet = Fleet::new(&["a", "b"], &[]);

        let mut git = MockGitOps::new();
        git.expect_clone_repo()
            .times(2)
            .returning(|_, _, name| match name {
                "a" => Err(anyhow!("Repository not found")),
                _ => Ok(()),
            });
        git.expect_remote_rename()
            .withf(|path, _, _| repo_name(path) == "b")
            .times(1)
            .returning(|_, _, _| Ok(()));
        git.expect_remote_add()
            .times(1)
            .returning(|_, _, _| Err(anyhow!("remote origin already exists")));
        let app = fleet.app(git, MockGithubOps::new());

        let opts = CloneOptions {
            set_remote: Some("origin".to_string()),
            github_user: Some("alice".to_string()),
        };
        let errors = app.cmd_clone(&opts, &mut std::io::sink()).await.unwrap();

        // One failed clone for a, one failed remote add for b; remote listing never runs
        let messages: Vec<_> = errors.iter().map(|f| (f.repo.as_str(), f.action.as_str())).collect();
        assert_eq!(
            messages,
            vec![
                ("a", "cloning git@github.com:org/a.git"),
                ("b", "adding remote origin"),
            ]
        );
    }
}
