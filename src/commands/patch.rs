use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use tracing::warn;

use crate::App;
use crate::ErrorList;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::repos::Presence;

#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    pub patch: Option<PathBuf>,
}

/// A copy of the patch inside a working tree, removed again on drop.
struct PatchCopy {
    path: PathBuf,
}

impl PatchCopy {
    async fn create(patch: &Path, path: PathBuf) -> Result<Self> {
        tokio::fs::copy(patch, &path)
            .await
            .with_context(|| format!("Failed to copy patch to {}", path.display()))?;
        Ok(Self { path })
    }
}

impl Drop for PatchCopy {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove patch copy {}: {}", self.path.display(), e);
        }
    }
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Apply a patch file to every cloned repository.
    ///
    /// The patch is copied into each working tree and applied from there, so paths
    /// inside the patch resolve against the repository root.
    pub async fn cmd_patch(
        &self,
        opts: &PatchOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<ErrorList> {
        let Some(patch) = opts.patch.as_deref() else {
            bail!("Please specify a patch file to apply with --patch.");
        };
        if !patch.is_file() {
            bail!("Patch file {} does not exist.", patch.display());
        }
        let file_name = patch
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Invalid patch file name {}", patch.display()))?;
        let repos = self.repo_set().await?;

        let mut errors = ErrorList::new();
        for repo in repos.select(Presence::Existing) {
            writeln!(
                stdout,
                "Applying patch {} to {} in {}",
                file_name,
                repo.name,
                repo.path.display()
            )?;

            let copy_path = repo.path.join(file_name);
            if copy_path.exists() {
                let e = anyhow::anyhow!("{} already exists in the working tree", file_name);
                errors.record(repo, format!("copying patch {}", file_name), &e, stdout)?;
                continue;
            }
            let copy = match PatchCopy::create(patch, copy_path).await {
                Ok(copy) => copy,
                Err(e) => {
                    errors.record(repo, format!("copying patch {}", file_name), &e, stdout)?;
                    continue;
                }
            };

            if let Err(e) = self.git.apply(&repo.path, file_name).await {
                errors.record(repo, format!("applying patch {}", file_name), &e, stdout)?;
            }
            drop(copy);
        }

        Ok(errors)
    }
}
