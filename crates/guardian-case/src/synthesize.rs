// synthesize.rs — Deterministic signal → care-case synthesis.
//
// Everything here is a pure function of the signal (plus the clock for
// `created_at`). The derivation chain:
//
// 1. tension → policy gate (fixed bands, boundaries land on the upper band)
// 2. gate + kind + severity → recommended action
// 3. gate + kind → constraint tags, in a fixed order
// 4. signal id → case id (UUIDv5 over the nil namespace)
//
// The "carecase:" prefix and the nil namespace are compatibility constants:
// changing either breaks the identity of every existing case.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use guardian_schema::{ContractValidator, SchemaError};

use crate::error::CaseError;
use crate::model::{
    CareCase, CaseStatus, PolicyGate, ProposedTransition, RecommendedAction, Reversibility,
    Severity, Signal, SignalRef,
};

/// Constraint tags attached to every care-case, in this order.
const BASE_CONSTRAINTS: [&str; 4] = [
    "reversibility-first",
    "minimal-intervention",
    "explainability",
    "human-seniority",
];

/// Appended when the gate is not green.
const CANARY_CONSTRAINT: &str = "canary-required";
/// Appended for security signals.
const NO_SECRETS_CONSTRAINT: &str = "no-secrets";

const CASE_ID_PREFIX: &str = "carecase:";

/// Conservative default hypothesis for web-perf regressions. A starting
/// point for a human, never presented as a diagnosis.
const WEB_PERF_HYPOTHESIS: &str =
    "Potentially heavier assets or blocking scripts introduced recently.";
const WEB_PERF_INTENT: &str =
    "Reduce LCP/TTFB by optimizing critical assets and deferring non-critical scripts";
const WEB_PERF_SCOPE: &str = "critical rendering path (hero assets, script loading)";
const WEB_PERF_VERIFICATION: [&str; 2] = [
    "Lighthouse LCP within budget",
    "No functional regressions (smoke)",
];

/// Classify a tension score into a policy gate.
///
/// Each band includes its lower bound and excludes its upper bound, so the
/// boundary values 0.40 and 0.75 land on the stricter gate.
pub fn gate_from_tension(tension: f64) -> PolicyGate {
    if tension < 0.40 {
        PolicyGate::Green
    } else if tension < 0.75 {
        PolicyGate::Yellow
    } else {
        PolicyGate::Red
    }
}

/// Derive the recommended action from the gate and the signal's nature.
///
/// The rollback special case must be checked before the generic non-green
/// rule: a failing web-perf signal behind a red gate is the one situation
/// where backing the change out beats waiting for a human.
pub fn recommended_action(gate: PolicyGate, kind: &str, severity: Severity) -> RecommendedAction {
    if gate == PolicyGate::Green {
        return RecommendedAction::ProposePatch;
    }
    if gate == PolicyGate::Red && kind == "web-perf" && severity == Severity::Fail {
        return RecommendedAction::Rollback;
    }
    RecommendedAction::HumanReview
}

/// Derive the constraint tags for a signal and its gate.
///
/// Base order is fixed, then conditional appends in this sequence — the
/// order only matters for reproducibility.
pub fn constraints_for(signal: &Signal, gate: PolicyGate) -> Vec<String> {
    let mut constraints: Vec<String> = BASE_CONSTRAINTS.iter().map(|c| c.to_string()).collect();
    if gate != PolicyGate::Green {
        constraints.push(CANARY_CONSTRAINT.to_string());
    }
    if signal.kind == "security" {
        constraints.push(NO_SECRETS_CONSTRAINT.to_string());
    }
    constraints
}

/// Deterministic, stable case identity for a signal id.
pub fn derive_case_id(signal_id: &str) -> Uuid {
    Uuid::new_v5(
        &Uuid::nil(),
        format!("{CASE_ID_PREFIX}{signal_id}").as_bytes(),
    )
}

/// Synthesize a care-case from a validated signal, stamped with the
/// current time.
pub fn synthesize(signal: &Signal) -> CareCase {
    synthesize_at(signal, Utc::now())
}

/// Synthesis with an explicit timestamp — the fully pure form.
pub fn synthesize_at(signal: &Signal, created_at: DateTime<Utc>) -> CareCase {
    let gate = gate_from_tension(signal.tension);
    let action = recommended_action(gate, &signal.kind, signal.severity);

    let mut case = CareCase {
        schema_version: "0.1".to_string(),
        id: derive_case_id(&signal.id),
        created_at,
        system: signal.system.clone(),
        policy_gate: gate,
        recommended_action: action,
        tension: signal.tension,
        summary: signal.summary.clone(),
        constraints: constraints_for(signal, gate),
        signals: vec![SignalRef {
            signal_id: signal.id.clone(),
        }],
        status: CaseStatus::Open,
        root_cause_hypothesis: None,
        proposed_transition: None,
    };

    // Default remediation stub for web-perf signals that stay on the
    // automated or review path. Rollback cases get none: there is nothing
    // to propose, only something to undo.
    if signal.kind == "web-perf"
        && matches!(
            action,
            RecommendedAction::ProposePatch | RecommendedAction::HumanReview
        )
    {
        case.root_cause_hypothesis = Some(WEB_PERF_HYPOTHESIS.to_string());
        case.proposed_transition = Some(ProposedTransition {
            intent: WEB_PERF_INTENT.to_string(),
            scope: WEB_PERF_SCOPE.to_string(),
            reversibility: Reversibility::Reversible,
            verification: WEB_PERF_VERIFICATION.iter().map(|v| v.to_string()).collect(),
            trace_ref: signal
                .trace_ref
                .clone()
                .unwrap_or_else(|| "pending".to_string()),
        });
    }

    case
}

/// Check a freshly synthesized case against the care-case contract.
///
/// A violation here is a synthesis defect, not a user input error, so it
/// maps to [`CaseError::Internal`] and should abort loudly.
pub fn verify_consistency(
    case: &CareCase,
    care_case_contract: &ContractValidator,
) -> Result<(), CaseError> {
    let value = serde_json::to_value(case)?;
    match care_case_contract.check(&value, "Care-Case (generated)") {
        Ok(()) => Ok(()),
        Err(err @ SchemaError::Violations { .. }) => Err(CaseError::Internal(err.to_string())),
        Err(SchemaError::Compile(msg)) => Err(CaseError::Internal(msg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts;
    use crate::model::{Severity, SystemRef};

    fn signal(tension: f64, kind: &str, severity: Severity) -> Signal {
        Signal {
            id: "s1".to_string(),
            system: SystemRef {
                name: "shop-frontend".to_string(),
                env: "prod".to_string(),
                version: "2.4.1".to_string(),
            },
            kind: kind.to_string(),
            severity,
            tension,
            summary: "slow LCP on product pages".to_string(),
            trace_ref: None,
        }
    }

    #[test]
    fn gate_bands_are_inclusive_below_exclusive_above() {
        assert_eq!(gate_from_tension(0.0), PolicyGate::Green);
        assert_eq!(gate_from_tension(0.39), PolicyGate::Green);
        assert_eq!(gate_from_tension(0.40), PolicyGate::Yellow);
        assert_eq!(gate_from_tension(0.74), PolicyGate::Yellow);
        assert_eq!(gate_from_tension(0.75), PolicyGate::Red);
        assert_eq!(gate_from_tension(1.0), PolicyGate::Red);
    }

    #[test]
    fn green_gate_always_proposes_patch() {
        assert_eq!(
            recommended_action(PolicyGate::Green, "security", Severity::Fail),
            RecommendedAction::ProposePatch
        );
    }

    #[test]
    fn red_failing_web_perf_recommends_rollback() {
        assert_eq!(
            recommended_action(PolicyGate::Red, "web-perf", Severity::Fail),
            RecommendedAction::Rollback
        );
    }

    #[test]
    fn rollback_requires_all_three_conditions() {
        assert_eq!(
            recommended_action(PolicyGate::Red, "web-perf", Severity::Warn),
            RecommendedAction::HumanReview
        );
        assert_eq!(
            recommended_action(PolicyGate::Red, "security", Severity::Fail),
            RecommendedAction::HumanReview
        );
        assert_eq!(
            recommended_action(PolicyGate::Yellow, "web-perf", Severity::Fail),
            RecommendedAction::HumanReview
        );
    }

    #[test]
    fn base_constraints_keep_fixed_order() {
        let s = signal(0.1, "web-perf", Severity::Warn);
        let constraints = constraints_for(&s, PolicyGate::Green);
        assert_eq!(
            constraints,
            vec![
                "reversibility-first",
                "minimal-intervention",
                "explainability",
                "human-seniority"
            ]
        );
    }

    #[test]
    fn non_green_gate_requires_canary() {
        let s = signal(0.5, "web-perf", Severity::Warn);
        let constraints = constraints_for(&s, PolicyGate::Yellow);
        assert_eq!(constraints.last().unwrap(), "canary-required");
    }

    #[test]
    fn security_signal_appends_no_secrets_after_canary() {
        let s = signal(0.8, "security", Severity::Fail);
        let constraints = constraints_for(&s, PolicyGate::Red);
        let tail: Vec<&str> = constraints.iter().rev().take(2).map(|c| c.as_str()).collect();
        assert_eq!(tail, vec!["no-secrets", "canary-required"]);
    }

    #[test]
    fn case_id_is_stable_across_runs() {
        assert_eq!(derive_case_id("s1"), derive_case_id("s1"));
        assert_ne!(derive_case_id("s1"), derive_case_id("s2"));
    }

    #[test]
    fn case_id_matches_known_derivation() {
        // UUIDv5(nil, "carecase:s1") — pinned so the namespace and prefix
        // can never drift silently.
        let expected = Uuid::new_v5(&Uuid::nil(), b"carecase:s1");
        assert_eq!(derive_case_id("s1"), expected);
    }

    #[test]
    fn green_web_perf_gets_remediation_stub() {
        let s = signal(0.2, "web-perf", Severity::Warn);
        let case = synthesize(&s);

        assert_eq!(case.policy_gate, PolicyGate::Green);
        assert_eq!(case.recommended_action, RecommendedAction::ProposePatch);
        let transition = case.proposed_transition.expect("stub expected");
        assert_eq!(transition.reversibility, Reversibility::Reversible);
        assert_eq!(transition.verification.len(), 2);
        assert_eq!(transition.trace_ref, "pending");
        assert!(case.root_cause_hypothesis.is_some());
    }

    #[test]
    fn stub_copies_trace_ref_when_present() {
        let mut s = signal(0.2, "web-perf", Severity::Warn);
        s.trace_ref = Some("trace-123".to_string());
        let case = synthesize(&s);
        assert_eq!(
            case.proposed_transition.unwrap().trace_ref,
            "trace-123"
        );
    }

    #[test]
    fn rollback_case_gets_no_stub() {
        let s = signal(0.9, "web-perf", Severity::Fail);
        let case = synthesize(&s);
        assert_eq!(case.recommended_action, RecommendedAction::Rollback);
        assert!(case.proposed_transition.is_none());
        assert!(case.root_cause_hypothesis.is_none());
    }

    #[test]
    fn non_web_perf_gets_no_stub() {
        let s = signal(0.2, "security", Severity::Warn);
        let case = synthesize(&s);
        assert_eq!(case.recommended_action, RecommendedAction::ProposePatch);
        assert!(case.proposed_transition.is_none());
    }

    #[test]
    fn synthesized_cases_satisfy_the_care_case_contract() {
        let contract =
            ContractValidator::new(&contracts::care_case_schema().unwrap()).unwrap();

        for (tension, kind, severity) in [
            (0.2, "web-perf", Severity::Warn),
            (0.5, "web-perf", Severity::Warn),
            (0.9, "web-perf", Severity::Fail),
            (0.1, "security", Severity::Info),
            (0.8, "security", Severity::Fail),
        ] {
            let case = synthesize(&signal(tension, kind, severity));
            verify_consistency(&case, &contract).unwrap();
        }
    }
}
