//! Operations modules for interacting with external tools.
//!
//! This module contains the integration layers for the two tools that `manage-repos` drives:
//!
//! - [`git`]: Git operations run inside a managed repository (clone, switch, fetch, rebase,
//!   push, add, commit, apply, remote management)
//! - [`github`]: Pull request creation via the GitHub CLI
//!
//! Each submodule provides a trait-based abstraction with a real implementation and a
//! mock implementation to support both production use and testing. Every call takes the
//! working directory explicitly; the process working directory is never changed.

pub mod git;
pub mod github;
mod process;
