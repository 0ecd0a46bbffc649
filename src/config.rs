use std::path::PathBuf;
use std::time::Duration;

/// Config file read when `--config` is not given
pub const DEFAULT_REPOS_FILE: &str = "repos.txt";

/// Pause after each created pull request to stay clear of GitHub's secondary rate limits
pub const DEFAULT_PR_DELAY: Duration = Duration::from_secs(2);

/// Settings shared by every operation of one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// File listing one remote URL per line
    pub repos_file: PathBuf,
    /// Directory holding the managed repositories
    pub destination: PathBuf,
    pub pr_delay: Duration,
}

impl Config {
    pub fn new(repos_file: PathBuf, destination: PathBuf) -> Self {
        Self {
            repos_file,
            destination,
            pr_delay: DEFAULT_PR_DELAY,
        }
    }

    pub fn with_pr_delay(mut self, pr_delay: Duration) -> Self {
        self.pr_delay = pr_delay;
        self
    }

    /// Config rooted in `dir` with no PR pause (useful for tests)
    pub fn default_for_tests(dir: &std::path::Path) -> Self {
        Self::new(dir.join(DEFAULT_REPOS_FILE), dir.join("repos")).with_pr_delay(Duration::ZERO)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_REPOS_FILE), PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.repos_file, PathBuf::from("repos.txt"));
        assert_eq!(config.destination, PathBuf::from("."));
        assert_eq!(config.pr_delay, DEFAULT_PR_DELAY);
    }

    #[test]
    fn test_default_for_tests() {
        let config = Config::default_for_tests(std::path::Path::new("/tmp/x"));
        assert_eq!(config.repos_file, PathBuf::from("/tmp/x/repos.txt"));
        assert_eq!(config.destination, PathBuf::from("/tmp/x/repos"));
        assert_eq!(config.pr_delay, Duration::ZERO);
    }
}
