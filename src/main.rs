use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use manage_repos::App;
use manage_repos::Config;
use manage_repos::ErrorList;
use manage_repos::commands::BranchOptions;
use manage_repos::commands::CloneOptions;
use manage_repos::commands::DEFAULT_BRANCH;
use manage_repos::commands::DEFAULT_REMOTE;
use manage_repos::commands::PatchOptions;
use manage_repos::commands::PrOptions;
use manage_repos::commands::PushOptions;
use manage_repos::commands::StageOptions;
use manage_repos::commands::SyncOptions;
use manage_repos::commands::UPSTREAM_REMOTE;
use manage_repos::commands::stage::ALL_CHANGES;
use manage_repos::config::DEFAULT_REPOS_FILE;
use manage_repos::logging::setup_logging;
use manage_repos::ops::git::RealGit;
use manage_repos::ops::github::RealGithub;
use manage_repos::report::Summary;

#[derive(Parser)]
#[command(name = "manage-repos")]
#[command(about = "Run git operations across every repository listed in a config file", long_about = None)]
pub struct Cli {
    /// File listing the repositories to operate on, one remote URL per line
    #[arg(short, long, env = "MANAGE_REPOS_CONFIG", default_value = DEFAULT_REPOS_FILE)]
    pub config: PathBuf,
    /// Directory containing the managed repositories
    #[arg(short, long, env = "MANAGE_REPOS_DESTINATION", default_value = ".")]
    pub destination: PathBuf,
    /// Show debug logs, including every git and gh invocation
    #[arg(short, long)]
    pub verbose: bool,
    /// Exit with status 0 even when some repositories failed
    #[arg(long)]
    pub allow_failures: bool,
    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new feature branch in the managed repositories
    Branch {
        /// Name of the feature branch to create
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// Clone the managed repositories, optionally adding a remote for a fork
    Clone {
        /// Add the user's GitHub fork as a remote (named `origin` unless given) and
        /// rename the original remote to `upstream`
        #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_REMOTE)]
        set_remote: Option<String>,
        /// GitHub username owning the fork
        #[arg(short, long)]
        github_user: Option<String>,
    },
    /// Apply a git patch to the managed repositories
    Patch {
        /// Path to the patch file to apply
        #[arg(short, long)]
        patch: Option<PathBuf>,
    },
    /// Open a pull request from the current branch of each managed repository
    Pr {
        /// Pull request title
        #[arg(short, long)]
        title: Option<String>,
        /// Pull request body
        #[arg(long, default_value = "")]
        body: String,
        /// Branch the pull request targets
        #[arg(short, long = "branch-default", default_value = DEFAULT_BRANCH)]
        branch_default: String,
        /// GitHub username owning the fork the branch was pushed to
        #[arg(short, long)]
        github_user: Option<String>,
    },
    /// Push a branch of the managed repositories to a remote
    Push {
        /// Name of the branch to push
        #[arg(short, long)]
        branch: Option<String>,
        /// Name of the remote to push to
        #[arg(short, long, default_value = DEFAULT_REMOTE)]
        remote: String,
    },
    /// Stage and commit changes in the managed repositories
    Stage {
        /// Files to stage; all changes when omitted
        #[arg(short, long, num_args = 1.., default_value = ALL_CHANGES)]
        files: Vec<String>,
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Rebase the managed repositories onto their upstream and optionally push to the fork
    Sync {
        /// Default branch to sync
        #[arg(short, long = "branch-default", default_value = DEFAULT_BRANCH)]
        branch_default: String,
        /// Remote to sync from
        #[arg(short, long, default_value = UPSTREAM_REMOTE)]
        upstream: String,
        /// Push the synced branch to the fork
        #[arg(short, long)]
        push: bool,
        /// Fork remote to push to
        #[arg(short, long, default_value = DEFAULT_REMOTE)]
        remote: String,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Branch { .. } => "branch",
            Commands::Clone { .. } => "clone",
            Commands::Patch { .. } => "patch",
            Commands::Pr { .. } => "pr",
            Commands::Push { .. } => "push",
            Commands::Stage { .. } => "stage",
            Commands::Sync { .. } => "sync",
        }
    }
}

async fn run<W: std::io::Write>(
    app: &App<RealGit, RealGithub>,
    command: Commands,
    stdout: &mut W,
) -> Result<ErrorList> {
    let errors = match command {
        Commands::Branch { branch } => app.cmd_branch(&BranchOptions { branch }, stdout).await?,
        Commands::Clone {
            set_remote,
            github_user,
        } => {
            let opts = CloneOptions {
                set_remote,
                github_user,
            };
            app.cmd_clone(&opts, stdout).await?
        }
        Commands::Patch { patch } => app.cmd_patch(&PatchOptions { patch }, stdout).await?,
        Commands::Pr {
            title,
            body,
            branch_default,
            github_user,
        } => {
            let opts = PrOptions {
                title,
                body,
                default_branch: branch_default,
                github_user,
            };
            app.cmd_pr(&opts, stdout).await?
        }
        Commands::Push { branch, remote } => {
            app.cmd_push(&PushOptions { branch, remote }, stdout).await?
        }
        Commands::Stage { files, message } => {
            app.cmd_stage(&StageOptions { files, message }, stdout).await?
        }
        Commands::Sync {
            branch_default,
            upstream,
            push,
            remote,
        } => {
            let opts = SyncOptions {
                default_branch: branch_default,
                upstream,
                push,
                remote,
            };
            app.cmd_sync(&opts, stdout).await?
        }
    };
    Ok(errors)
}

/// Whether the run counts as a success for the exit status
fn succeeded(errors: &ErrorList, allow_failures: bool) -> bool {
    errors.is_empty() || allow_failures
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let app = App::new(
        Config::new(cli.config, cli.destination),
        RealGit,
        RealGithub,
    );

    let operation = cli.command.name();
    let mut stdout = std::io::stdout();

    // Keep stdout parseable in JSON mode by sending progress to stderr
    let errors = if cli.json {
        run(&app, cli.command, &mut std::io::stderr()).await?
    } else {
        run(&app, cli.command, &mut stdout).await?
    };

    let summary = Summary::new(operation, &errors);
    if cli.json {
        summary.write_json(&mut stdout)?;
    } else {
        summary.write_text(&mut stdout)?;
    }

    if succeeded(&errors, cli.allow_failures) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
