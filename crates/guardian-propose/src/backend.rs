// backend.rs — ReviewBackend trait: the capability surface over VCS/review.
//
// The proposal controller coordinates against an external mutable system
// (branches, change requests) that may hold state from a previous,
// possibly-interrupted run. This trait narrows that system to exactly the
// commands and queries the controller needs, so the idempotency logic can
// be tested against a fake backend without a repository or network.

use std::path::Path;

use crate::config::CommitIdentity;
use crate::error::Result;

/// A change request to open: title/body plus the base and head branches.
#[derive(Debug, Clone)]
pub struct ChangeRequest {
    pub title: String,
    pub body: String,
    pub base: String,
    pub head: String,
}

/// Informational repository/actor identity, logged at the start of a run.
#[derive(Debug, Clone, Default)]
pub struct RepoContext {
    /// e.g. "owner/repo", if the review system can tell us.
    pub repo: Option<String>,
    /// The authenticated actor, if known.
    pub actor: Option<String>,
}

/// Narrow command/query interface over the version-control and review
/// systems.
///
/// Queries (`*_exists`, `change_request_url`) never mutate. Commands map
/// one-to-one onto the controller's lifecycle steps; any of them failing
/// is fatal for the case being processed, except the annotation commands
/// (`add_label`, `comment`) which the controller treats as best-effort.
pub trait ReviewBackend {
    /// Root of the working tree the backend operates in. Proposal
    /// artifacts are written beneath this before being staged.
    fn work_dir(&self) -> &Path;

    /// Name of the repository's default branch.
    fn default_branch(&self) -> Result<String>;

    /// Set the commit identity for subsequent commits.
    fn configure_identity(&self, identity: &CommitIdentity) -> Result<()>;

    /// Repository/actor identity, purely informational. Implementations
    /// should degrade to `None` fields rather than fail.
    fn repo_context(&self) -> RepoContext;

    /// Does a change request with this head branch exist, in any state
    /// (open, closed, merged)?
    fn change_request_exists(&self, head_branch: &str) -> Result<bool>;

    /// Does this branch exist on the remote?
    fn remote_branch_exists(&self, branch: &str) -> Result<bool>;

    /// Create `branch` from the tip of `base` and switch to it.
    fn create_branch_from(&self, branch: &str, base: &str) -> Result<()>;

    /// Stage one file, by path relative to the work dir.
    fn stage(&self, path: &Path) -> Result<()>;

    /// Is anything actually staged?
    fn has_staged_changes(&self) -> Result<bool>;

    /// Commit the staged changes.
    fn commit(&self, message: &str) -> Result<()>;

    /// Push `branch` to the remote.
    fn push(&self, branch: &str) -> Result<()>;

    /// Open a change request.
    fn open_change_request(&self, request: &ChangeRequest) -> Result<()>;

    /// URL of the change request whose head is `head_branch`, if one
    /// exists and the review system can resolve it.
    fn change_request_url(&self, head_branch: &str) -> Result<Option<String>>;

    /// Add a label to a change request (best-effort annotation).
    fn add_label(&self, url: &str, label: &str) -> Result<()>;

    /// Post a comment on a change request (best-effort annotation).
    fn comment(&self, url: &str, body: &str) -> Result<()>;

    /// Return the working tree to `base`, discarding the current branch
    /// context. Called after every case, successful or not.
    fn restore_branch(&self, base: &str) -> Result<()>;
}
