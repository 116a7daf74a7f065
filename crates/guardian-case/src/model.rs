// model.rs — Signal and care-case document types.
//
// These structs mirror the JSON Schema contracts under `interfaces/`
// one-to-one. Signals are produced by external detectors and consumed
// exactly once by the synthesizer; care-cases are created once, never
// mutated, and consumed by the proposal controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signal severity as reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Fail,
}

/// Three-level risk classification controlling automation permissiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyGate {
    Green,
    Yellow,
    Red,
}

/// What the pipeline recommends doing about a care-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    ProposePatch,
    HumanReview,
    Rollback,
}

/// Care-case lifecycle status. Synthesis only ever produces `Open`;
/// the other states are set by humans downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Open,
    Resolved,
    Dismissed,
}

/// Declared reversibility of a proposed transition. Only `Reversible`
/// transitions are ever eligible for automated proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reversibility {
    Reversible,
    Irreversible,
}

/// Structured identity of the observed system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRef {
    pub name: String,
    pub env: String,
    pub version: String,
}

/// An external observation about a running system.
///
/// Immutable once validated against the signal contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// Unique identifier assigned by the detector.
    pub id: String,
    pub system: SystemRef,
    /// Category tag, e.g. "web-perf" or "security".
    pub kind: String,
    pub severity: Severity,
    /// Normalized degree of concern in [0, 1].
    pub tension: f64,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_ref: Option<String>,
}

/// Back-reference to a contributing signal. Never ownership — the signal
/// document stays with its detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRef {
    pub signal_id: String,
}

/// A structured statement of intended change, without executable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedTransition {
    pub intent: String,
    pub scope: String,
    pub reversibility: Reversibility,
    pub verification: Vec<String>,
    pub trace_ref: String,
}

/// A triage record synthesized from a signal.
///
/// `id` is a pure function of the triggering signal's `id` — re-synthesizing
/// from the same signal yields the same `id` (idempotent identity, not
/// idempotent content, since `created_at` varies).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareCase {
    pub schema_version: String,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub system: SystemRef,
    pub policy_gate: PolicyGate,
    pub recommended_action: RecommendedAction,
    pub tension: f64,
    pub summary: String,
    /// Applicable constraint tags, in derivation order.
    pub constraints: Vec<String>,
    /// Back-references to contributing signal ids.
    pub signals: Vec<SignalRef>,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause_hypothesis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_transition: Option<ProposedTransition>,
}
