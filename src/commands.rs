//! One module per operation.
//!
//! Every operation follows the same shape: required options are checked and the repos
//! file is validated before any repository is touched (failures there are returned as
//! errors), then each selected repository is processed in file order. A failing step is
//! recorded in the returned [`ErrorList`](crate::ErrorList), the rest of that
//! repository's steps are skipped and the batch moves on.

pub mod branch;
pub mod clone;
pub mod patch;
pub mod pr;
pub mod push;
pub mod stage;
pub mod sync;

pub use branch::BranchOptions;
pub use clone::CloneOptions;
pub use patch::PatchOptions;
pub use pr::PrOptions;
pub use push::PushOptions;
pub use stage::StageOptions;
pub use sync::SyncOptions;

use anyhow::Result;
use anyhow::bail;

/// Remote name given to the original repository once a fork remote is configured
pub const UPSTREAM_REMOTE: &str = "upstream";

pub const DEFAULT_REMOTE: &str = "origin";

pub const DEFAULT_BRANCH: &str = "main";

/// A required option, treating an empty value as missing
fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!("{}", message),
    }
}
