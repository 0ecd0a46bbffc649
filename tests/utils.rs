#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use manage_repos::App;
use manage_repos::Config;
use manage_repos::ops::git::RealGit;
use manage_repos::ops::github::RealGithub;
use tokio::process::Command;

/// Host whose SSH URLs are rewritten to local bare repositories.
pub const HOST: &str = "github.com";

/// Directory holding the bare repositories that stand in for GitHub.
///
/// `git@github.com:<owner>/<name>.git` resolves to `<remotes_root>/<owner>/<name>.git`.
pub fn remotes_root() -> PathBuf {
    std::env::temp_dir().join(format!("manage-repos-remotes-{}", std::process::id()))
}

/// Point git at the local remotes and give it an identity for commits.
///
/// Must run before any thread is spawned, since it mutates the environment.
pub fn configure_git_env() {
    let root = remotes_root();
    std::fs::create_dir_all(&root).unwrap();
    let entries = [
        (
            format!("url.file://{}/.insteadOf", root.display()),
            format!("git@{}:", HOST),
        ),
        ("user.name".to_string(), "Test User".to_string()),
        ("user.email".to_string(), "test@example.com".to_string()),
        ("init.defaultBranch".to_string(), "main".to_string()),
        ("commit.gpgsign".to_string(), "false".to_string()),
    ];
    // SAFETY: called from a constructor before the test harness starts any threads
    unsafe {
        std::env::set_var("GIT_CONFIG_COUNT", entries.len().to_string());
        for (i, (key, value)) in entries.iter().enumerate() {
            std::env::set_var(format!("GIT_CONFIG_KEY_{}", i), key);
            std::env::set_var(format!("GIT_CONFIG_VALUE_{}", i), value);
        }
    }
}

/// Runs git in `dir` and returns its stdout.
pub async fn git(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await?;
    anyhow::ensure!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?)
}

/// Creates the bare repository behind `git@github.com:<owner>/<name>.git`.
///
/// It holds a single commit on `main` with a `README.md` containing "hello".
pub async fn create_remote(owner: &str, name: &str) -> anyhow::Result<String> {
    let seed = tempfile::tempdir()?;
    git(seed.path(), &["init", "--initial-branch=main"]).await?;
    tokio::fs::write(seed.path().join("README.md"), "hello\n").await?;
    git(seed.path(), &["add", "README.md"]).await?;
    git(seed.path(), &["commit", "-m", "Initial commit"]).await?;

    let owner_dir = remotes_root().join(owner);
    tokio::fs::create_dir_all(&owner_dir).await?;
    let bare = format!("{}.git", name);
    let seed_path = seed.path().to_str().unwrap();
    git(&owner_dir, &["clone", "--bare", seed_path, &bare]).await?;

    Ok(format!("git@{}:{}/{}.git", HOST, owner, name))
}

/// Path of the bare repository standing in for `owner/name`.
pub fn remote_path(owner: &str, name: &str) -> PathBuf {
    remotes_root().join(owner).join(format!("{}.git", name))
}

/// Adds a commit to `main` of the remote `owner/name`, as another contributor would.
pub async fn push_upstream_commit(owner: &str, name: &str, file: &str) -> anyhow::Result<()> {
    let scratch = tempfile::tempdir()?;
    let url = format!("git@{}:{}/{}.git", HOST, owner, name);
    git(scratch.path(), &["clone", &url, "work"]).await?;
    let work = scratch.path().join("work");
    tokio::fs::write(work.join(file), "upstream\n").await?;
    git(&work, &["add", file]).await?;
    git(&work, &["commit", "-m", "Upstream change"]).await?;
    git(&work, &["push", "origin", "main"]).await?;
    Ok(())
}

/// A test directory with a repos file and a destination for clones.
pub struct Fleet {
    pub dir: TestDir,
}

impl Fleet {
    pub fn new(urls: &[String]) -> anyhow::Result<Self> {
        let dir = TestDir::new()?;
        let contents: String = urls.iter().map(|url| format!("{}\n", url)).collect();
        std::fs::write(dir.path().join("repos.txt"), contents)?;
        Ok(Self { dir })
    }

    pub fn destination(&self) -> PathBuf {
        self.dir.path().join("repos")
    }

    pub fn app(&self) -> App<RealGit, RealGithub> {
        let config = Config::new(self.dir.path().join("repos.txt"), self.destination())
            .with_pr_delay(Duration::ZERO);
        App::new(config, RealGit, RealGithub)
    }

    /// Regex matching the test directory, for snapshot filters.
    pub fn root_pattern(&self) -> String {
        regex::escape(self.dir.path().to_str().unwrap())
    }
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(std::path::PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}
