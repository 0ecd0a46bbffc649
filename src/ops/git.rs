#![allow(async_fn_in_trait)]

use std::path::Path;

use anyhow::Result;
#[cfg(test)]
use mockall::automock;

use super::process::run;

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations for interacting with Git.
///
/// `path` is always the working tree of the repository the command applies to, except
/// for [`GitOps::clone_repo`] which runs in the directory receiving the clone.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Clone `url` into `parent/name`.
    async fn clone_repo(&self, parent: &Path, url: &str, name: &str) -> Result<()>;

    async fn remote_rename(&self, path: &Path, old: &str, new: &str) -> Result<()>;
    async fn remote_add(&self, path: &Path, name: &str, url: &str) -> Result<()>;

    /// Verbose remote listing (`git remote -v`).
    async fn remote_list(&self, path: &Path) -> Result<String>;

    /// Create `branch` and switch to it.
    async fn switch_create(&self, path: &Path, branch: &str) -> Result<()>;
    async fn switch(&self, path: &Path, branch: &str) -> Result<()>;

    /// Name of the checked out branch; empty when HEAD is detached.
    async fn current_branch(&self, path: &Path) -> Result<String>;

    /// Fetch every remote, pruning deleted refs.
    async fn fetch_all(&self, path: &Path) -> Result<()>;
    async fn rebase(&self, path: &Path, onto: &str) -> Result<()>;
    async fn push(&self, path: &Path, remote: &str, branch: &str) -> Result<()>;

    async fn status_porcelain(&self, path: &Path) -> Result<String>;
    async fn add(&self, path: &Path, pathspec: &str) -> Result<()>;

    /// Commit everything currently staged.
    async fn commit(&self, path: &Path, message: &str) -> Result<()>;

    /// Apply a patch file given relative to the working tree.
    async fn apply(&self, path: &Path, patch: &str) -> Result<()>;
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit;

impl GitOps for RealGit {
    async fn clone_repo(&self, parent: &Path, url: &str, name: &str) -> Result<()> {
        run("git", &["clone", "--", url, name], parent).await?;
        Ok(())
    }

    async fn remote_rename(&self, path: &Path, old: &str, new: &str) -> Result<()> {
        run("git", &["remote", "rename", old, new], path).await?;
        Ok(())
    }

    async fn remote_add(&self, path: &Path, name: &str, url: &str) -> Result<()> {
        run("git", &["remote", "add", name, url], path).await?;
        Ok(())
    }

    async fn remote_list(&self, path: &Path) -> Result<String> {
        run("git", &["remote", "-v"], path).await
    }

    async fn switch_create(&self, path: &Path, branch: &str) -> Result<()> {
        run("git", &["switch", "-c", branch], path).await?;
        Ok(())
    }

    async fn switch(&self, path: &Path, branch: &str) -> Result<()> {
        run("git", &["switch", branch], path).await?;
        Ok(())
    }

    async fn current_branch(&self, path: &Path) -> Result<String> {
        let out = run("git", &["branch", "--show-current"], path).await?;
        Ok(out.trim().to_string())
    }

    async fn fetch_all(&self, path: &Path) -> Result<()> {
        run("git", &["fetch", "--all", "--prune"], path).await?;
        Ok(())
    }

    async fn rebase(&self, path: &Path, onto: &str) -> Result<()> {
        run("git", &["rebase", onto], path).await?;
        Ok(())
    }

    async fn push(&self, path: &Path, remote: &str, branch: &str) -> Result<()> {
        run("git", &["push", remote, branch], path).await?;
        Ok(())
    }

    async fn status_porcelain(&self, path: &Path) -> Result<String> {
        run("git", &["status", "--porcelain"], path).await
    }

    async fn add(&self, path: &Path, pathspec: &str) -> Result<()> {
        run("git", &["add", "--", pathspec], path).await?;
        Ok(())
    }

    async fn commit(&self, path: &Path, message: &str) -> Result<()> {
        run("git", &["commit", "-m", message], path).await?;
        Ok(())
    }

    async fn apply(&self, path: &Path, patch: &str) -> Result<()> {
        run("git", &["apply", patch], path).await?;
        Ok(())
    }
}
