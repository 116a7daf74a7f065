// controller.rs — ProposalController: the idempotent lifecycle manager.
//
// Guarantee: at most one change request per eligible care-case, against an
// external system that may already hold state from a previous, possibly
// interrupted run. The mechanism is existence-based idempotency — before
// any mutation the controller asks the backend whether a change request or
// remote branch already exists for the case's deterministic branch name,
// and short-circuits to a no-op skip if so. Stale content is never
// overwritten.
//
// Cases are processed independently: a hard failure on one case is
// recorded in that case's outcome, the working context is returned to the
// default branch, and the run continues with the next case.

use std::fs;

use uuid::Uuid;

use guardian_case::{CareCase, PolicyGate, RecommendedAction, Reversibility};

use crate::artifact;
use crate::backend::{ChangeRequest, ReviewBackend};
use crate::config::ProposeConfig;
use crate::error::{ProposeError, Result};

/// Why a case was skipped without any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A change request with this head branch already exists, in any
    /// state — the case was already handled, regardless of its outcome.
    RequestExists,
    /// The remote branch already exists; a prior run raced or partially
    /// completed. Never force-overwrite.
    BranchExists,
    /// Staging produced no actual change; no empty commits or requests.
    NoChanges,
}

/// What happened to one case during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalOutcome {
    /// The case failed the eligibility predicate; left for humans.
    Ineligible,
    /// An idempotency check short-circuited; nothing was mutated.
    Skipped(SkipReason),
    /// A change request was created. `annotated` is false when the
    /// best-effort labeling/commenting step failed afterwards.
    Created { annotated: bool },
}

/// Per-case result: the outcome, or the hard failure that stopped it.
#[derive(Debug)]
pub struct CaseOutcome {
    pub case_id: Uuid,
    pub result: std::result::Result<ProposalOutcome, ProposeError>,
}

/// Report over a whole run, in case processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl RunReport {
    /// Did any case result in a created change request?
    pub fn created_any(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o.result, Ok(ProposalOutcome::Created { .. })))
    }

    /// Cases that failed hard, with their errors.
    pub fn hard_failures(&self) -> impl Iterator<Item = (Uuid, &ProposeError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.case_id, e)))
    }
}

/// Eligibility predicate for automated proposal: green gate, patch action,
/// and a transition the case itself declares reversible. Everything else is
/// left for human review or other handling.
pub fn is_eligible(case: &CareCase) -> bool {
    case.policy_gate == PolicyGate::Green
        && case.recommended_action == RecommendedAction::ProposePatch
        && case
            .proposed_transition
            .as_ref()
            .is_some_and(|t| t.reversibility == Reversibility::Reversible)
}

/// The idempotent lifecycle manager. Scans care-cases, filters to eligible
/// ones, and ensures exactly one change request exists per eligible case.
pub struct ProposalController<'a, B: ReviewBackend> {
    backend: &'a B,
    config: ProposeConfig,
}

impl<'a, B: ReviewBackend> ProposalController<'a, B> {
    pub fn new(backend: &'a B, config: ProposeConfig) -> Self {
        Self { backend, config }
    }

    /// Process cases in the order given (callers pass CaseStore enumeration
    /// order, which is stable), returning a per-case report.
    ///
    /// Setup failures (identity, default-branch lookup) abort the whole
    /// run; per-case failures do not.
    pub fn run(&self, cases: &[CareCase]) -> Result<RunReport> {
        let context = self.backend.repo_context();
        tracing::info!(
            repo = context.repo.as_deref().unwrap_or("unavailable"),
            actor = context.actor.as_deref().unwrap_or("unknown"),
            "starting proposal run"
        );

        self.backend.configure_identity(&self.config.identity)?;
        let base = self.backend.default_branch()?;

        let mut report = RunReport::default();
        for case in cases {
            if !is_eligible(case) {
                tracing::debug!(case_id = %case.id, "case not eligible for automated proposal");
                report.outcomes.push(CaseOutcome {
                    case_id: case.id,
                    result: Ok(ProposalOutcome::Ineligible),
                });
                continue;
            }

            let result = self.propose_case(case, &base);
            if let Err(err) = &result {
                tracing::error!(case_id = %case.id, error = %err, "proposal failed for case");
            }
            report.outcomes.push(CaseOutcome {
                case_id: case.id,
                result,
            });
        }

        Ok(report)
    }

    /// Steps 1–3 for one case: compute the branch name and run the
    /// existence checks. Nothing is mutated before both checks pass.
    fn propose_case(&self, case: &CareCase, base: &str) -> Result<ProposalOutcome> {
        let branch = self.config.branch_for(case.id);

        if self.backend.change_request_exists(&branch)? {
            tracing::info!(case_id = %case.id, "change request already exists, skipping");
            return Ok(ProposalOutcome::Skipped(SkipReason::RequestExists));
        }

        if self.backend.remote_branch_exists(&branch)? {
            tracing::info!(case_id = %case.id, %branch, "remote branch exists, skipping");
            return Ok(ProposalOutcome::Skipped(SkipReason::BranchExists));
        }

        self.backend.create_branch_from(&branch, base)?;

        // From here on we're off the default branch; return to it whatever
        // happens so the next case starts from a clean context.
        let result = self.create_proposal(case, base, &branch);
        if let Err(err) = self.backend.restore_branch(base) {
            tracing::warn!(error = %err, "failed to restore default branch");
        }
        result
    }

    /// Steps 5–8: materialize the artifact, commit, push, open the
    /// request, annotate.
    fn create_proposal(
        &self,
        case: &CareCase,
        base: &str,
        branch: &str,
    ) -> Result<ProposalOutcome> {
        let rel_path = self.config.patch_path_for(case.id);
        let abs_path = self.backend.work_dir().join(&rel_path);
        if let Some(parent) = abs_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ProposeError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(&abs_path, artifact::render_patch_stub(case)).map_err(|source| {
            ProposeError::IoError {
                path: abs_path.display().to_string(),
                source,
            }
        })?;

        // Stage only that one file.
        self.backend.stage(&rel_path)?;
        if !self.backend.has_staged_changes()? {
            tracing::info!(case_id = %case.id, "no changes to commit, skipping");
            return Ok(ProposalOutcome::Skipped(SkipReason::NoChanges));
        }

        self.backend.commit(&artifact::commit_message(case.id))?;
        self.backend.push(branch)?;
        self.backend.open_change_request(&ChangeRequest {
            title: artifact::change_request_title(case.id),
            body: artifact::render_change_request_body(case),
            base: base.to_string(),
            head: branch.to_string(),
        })?;
        tracing::info!(case_id = %case.id, %branch, "change request created");

        let annotated = self.annotate(branch);
        Ok(ProposalOutcome::Created { annotated })
    }

    /// Best-effort post-creation annotation. A failure here never rolls
    /// back the created request; it is logged and reflected in the
    /// outcome.
    fn annotate(&self, branch: &str) -> bool {
        let url = match self.backend.change_request_url(branch) {
            Ok(Some(url)) => url,
            Ok(None) => {
                tracing::warn!(%branch, "could not resolve change request url; skipping labels/comment");
                return false;
            }
            Err(err) => {
                tracing::warn!(%branch, error = %err, "change request lookup failed; skipping labels/comment");
                return false;
            }
        };

        let mut annotated = true;
        for label in &self.config.labels {
            if let Err(err) = self.backend.add_label(&url, label) {
                tracing::warn!(%url, %label, error = %err, "failed to add label");
                annotated = false;
            }
        }
        if let Err(err) = self.backend.comment(&url, &artifact::reviewer_checklist()) {
            tracing::warn!(%url, error = %err, "failed to post reviewer checklist");
            annotated = false;
        }
        annotated
    }
}
