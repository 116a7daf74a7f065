// artifact.rs — Proposal artifact and change-request templating.
//
// The section markers are part of the wire contract: the receiving-side
// validator greps for them byte-for-byte. Do not reword them without
// versioning the contract on both sides.

use guardian_case::{CareCase, PolicyGate, RecommendedAction, Reversibility};
use uuid::Uuid;

pub const HEADER_MARKER: &str = "# Guardian Patch Proposal";
pub const ROOT_CAUSE_MARKER: &str = "## Root cause hypothesis";
pub const STEPS_MARKER: &str = "## Suggested patch steps";
pub const VERIFICATION_MARKER: &str = "## Verification checklist";

/// Render the markdown proposal artifact for a case.
pub fn render_patch_stub(case: &CareCase) -> String {
    let hypothesis = case.root_cause_hypothesis.as_deref().unwrap_or("TBD");
    let signal_lines = signal_list(case);
    let checklist = verification_checklist(case);

    format!(
        "{HEADER_MARKER} ({case_id})\n\
         \n\
         {ROOT_CAUSE_MARKER}\n\
         {hypothesis}\n\
         \n\
         {STEPS_MARKER} (generic web perf)\n\
         1. Audit critical rendering path (hero images, fonts, blocking scripts).\n\
         2. Defer or async non-critical scripts; ensure bundles are split appropriately.\n\
         3. Optimize images (proper sizing, modern formats, preload hero assets).\n\
         4. Reduce server response time (cache headers, CDN, origin optimization).\n\
         \n\
         ## Signals\n\
         {signal_lines}\n\
         \n\
         {VERIFICATION_MARKER}\n\
         {checklist}\n",
        case_id = case.id,
    )
}

/// Render the change-request body for a case.
pub fn render_change_request_body(case: &CareCase) -> String {
    let signal_lines = signal_list(case);
    let checklist = verification_checklist(case);
    let (intent, scope, reversibility) = match &case.proposed_transition {
        Some(t) => (
            t.intent.as_str(),
            t.scope.as_str(),
            reversibility_tag(t.reversibility),
        ),
        None => ("TBD", "TBD", "TBD"),
    };

    format!(
        "## Guardian Proposed Patch (green)\n\
         \n\
         **Care-Case:** `{case_id}`\n\
         **Gate:** `{gate}`\n\
         **Action:** `{action}`\n\
         **Tension:** `{tension}`\n\
         \n\
         ### Signals\n\
         {signal_lines}\n\
         \n\
         ### Proposed transition\n\
         - intent: {intent}\n\
         - scope: {scope}\n\
         - reversibility: {reversibility}\n\
         \n\
         ### Verification checklist\n\
         {checklist}\n",
        case_id = case.id,
        gate = gate_tag(case.policy_gate),
        action = action_tag(case.recommended_action),
        tension = case.tension,
    )
}

/// Title of the change request for a case.
pub fn change_request_title(case_id: Uuid) -> String {
    format!("Guardian proposed patch: {case_id}")
}

/// Commit message for the proposal commit.
pub fn commit_message(case_id: Uuid) -> String {
    format!("Guardian propose patch for {case_id}")
}

/// Fixed reviewer checklist posted as a comment after creation.
pub fn reviewer_checklist() -> String {
    "Guardian PR checklist for reviewer:\n\
     - Confirm patch file path: guardian/patches/<case_uuid>.md\n\
     - Confirm sections exist (Root cause / Steps / Verification)\n\
     - Confirm verification has checkboxes (- [ ])\n\
     - Confirm proposal stays reversible & scope-limited\n"
        .to_string()
}

fn signal_list(case: &CareCase) -> String {
    if case.signals.is_empty() {
        return "- (none)".to_string();
    }
    case.signals
        .iter()
        .map(|s| format!("- {}", s.signal_id))
        .collect::<Vec<_>>()
        .join("\n")
}

fn verification_checklist(case: &CareCase) -> String {
    let items: Vec<String> = case
        .proposed_transition
        .as_ref()
        .map(|t| t.verification.iter().map(|v| format!("- [ ] {v}")).collect())
        .unwrap_or_default();
    if items.is_empty() {
        "- [ ] Add verification steps".to_string()
    } else {
        items.join("\n")
    }
}

fn gate_tag(gate: PolicyGate) -> &'static str {
    match gate {
        PolicyGate::Green => "green",
        PolicyGate::Yellow => "yellow",
        PolicyGate::Red => "red",
    }
}

fn action_tag(action: RecommendedAction) -> &'static str {
    match action {
        RecommendedAction::ProposePatch => "propose_patch",
        RecommendedAction::HumanReview => "human_review",
        RecommendedAction::Rollback => "rollback",
    }
}

fn reversibility_tag(reversibility: Reversibility) -> &'static str {
    match reversibility {
        Reversibility::Reversible => "reversible",
        Reversibility::Irreversible => "irreversible",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_case::model::{Severity, Signal, SystemRef};
    use guardian_case::synthesize::synthesize;

    fn green_case() -> CareCase {
        synthesize(&Signal {
            id: "s1".to_string(),
            system: SystemRef {
                name: "shop-frontend".to_string(),
                env: "prod".to_string(),
                version: "2.4.1".to_string(),
            },
            kind: "web-perf".to_string(),
            severity: Severity::Warn,
            tension: 0.2,
            summary: "slow LCP".to_string(),
            trace_ref: None,
        })
    }

    #[test]
    fn stub_contains_every_required_marker() {
        let stub = render_patch_stub(&green_case());
        for marker in [
            HEADER_MARKER,
            ROOT_CAUSE_MARKER,
            STEPS_MARKER,
            VERIFICATION_MARKER,
        ] {
            assert!(stub.contains(marker), "missing marker: {marker}");
        }
    }

    #[test]
    fn stub_mentions_case_id_and_signals() {
        let case = green_case();
        let stub = render_patch_stub(&case);
        assert!(stub.contains(&case.id.to_string()));
        assert!(stub.contains("- s1"));
    }

    #[test]
    fn stub_has_unchecked_checklist_items() {
        let stub = render_patch_stub(&green_case());
        assert!(stub.contains("- [ ] Lighthouse LCP within budget"));
        assert!(stub.contains("- [ ] No functional regressions (smoke)"));
    }

    #[test]
    fn stub_without_transition_falls_back_to_placeholders() {
        let mut case = green_case();
        case.proposed_transition = None;
        case.root_cause_hypothesis = None;

        let stub = render_patch_stub(&case);
        assert!(stub.contains("TBD"));
        assert!(stub.contains("- [ ] Add verification steps"));
    }

    #[test]
    fn body_embeds_case_fields() {
        let case = green_case();
        let body = render_change_request_body(&case);
        assert!(body.contains(&case.id.to_string()));
        assert!(body.contains("**Tension:** `0.2`"));
        assert!(body.contains("- reversibility: reversible"));
        assert!(body.contains("- [ ] Lighthouse LCP within budget"));
    }
}
