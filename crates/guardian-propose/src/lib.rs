//! Proposal lifecycle for Guardian care-cases.
//!
//! This crate turns eligible care-cases into change requests, with the
//! guarantee that repeated runs over the same case never yield more than
//! one branch or request. The core abstraction is the `ReviewBackend`
//! trait — a narrow command/query surface over the version-control and
//! review systems — with a built-in implementation driving `git` and `gh`.
//!
//! The controller never grants detectors write access: it only ever writes
//! one proposal artifact per case onto its own branch, and existence checks
//! against the backend short-circuit every re-run into a no-op.

pub mod artifact;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod git;

pub use backend::{ChangeRequest, RepoContext, ReviewBackend};
pub use config::{CommitIdentity, ProposeConfig};
pub use controller::{CaseOutcome, ProposalController, ProposalOutcome, RunReport, SkipReason};
pub use error::ProposeError;
pub use git::GitBackend;
