// issue.rs — `guardian issue`: review-issue presentation for a care-case.
//
// Pure string templating over the raw document; works on the JSON value
// rather than the typed model so older records with extra fields still
// render.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

pub fn execute(title: bool, body: bool, case_file: &Path) -> anyhow::Result<()> {
    anyhow::ensure!(
        title != body,
        "provide exactly one of --title or --body"
    );

    let text = fs::read_to_string(case_file)
        .with_context(|| format!("failed to read care-case {}", case_file.display()))?;
    let case: Value = serde_json::from_str(&text)
        .with_context(|| format!("care-case {} is not valid JSON", case_file.display()))?;

    if title {
        println!("{}", issue_title(&case));
    } else {
        println!("{}", issue_body(&case)?);
    }
    Ok(())
}

fn str_field<'a>(case: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    case.get(key).and_then(Value::as_str).unwrap_or(fallback)
}

fn issue_title(case: &Value) -> String {
    let gate = str_field(case, "policy_gate", "unknown");
    let summary = str_field(case, "summary", "Unnamed care-case");
    format!("Care-Case ({gate}): {summary}")
}

fn issue_body(case: &Value) -> anyhow::Result<String> {
    let gate = str_field(case, "policy_gate", "unknown");
    let action = str_field(case, "recommended_action", "observe");
    let tension = case.get("tension").cloned().unwrap_or(Value::from(0));
    let empty = Value::Object(Default::default());
    let system = case.get("system").unwrap_or(&empty);

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        "**System:** `{}`  \n**Env:** `{}`  \n**Version:** `{}`",
        str_field(system, "name", "unknown"),
        str_field(system, "env", "unknown"),
        str_field(system, "version", "unknown"),
    ));
    lines.push(String::new());
    lines.push(format!("**Policy gate:** `{gate}`"));
    lines.push(format!("**Recommended action:** `{action}`"));
    lines.push(format!("**Tension:** `{tension}`"));
    lines.push(String::new());

    let signal_ids: Vec<&str> = case
        .get("signals")
        .and_then(Value::as_array)
        .map(|signals| {
            signals
                .iter()
                .filter_map(|s| s.get("signal_id").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if !signal_ids.is_empty() {
        lines.push("**Signals:**".to_string());
        for id in signal_ids {
            lines.push(format!("- `{id}`"));
        }
        lines.push(String::new());
    }

    if let Some(constraints) = case.get("constraints").and_then(Value::as_array) {
        if !constraints.is_empty() {
            lines.push("**Constraints:**".to_string());
            for constraint in constraints {
                if let Some(tag) = constraint.as_str() {
                    lines.push(format!("- `{tag}`"));
                }
            }
            lines.push(String::new());
        }
    }

    if let Some(hypothesis) = case.get("root_cause_hypothesis").and_then(Value::as_str) {
        lines.push("**Root-cause hypothesis (not a fact):**".to_string());
        lines.push(hypothesis.to_string());
        lines.push(String::new());
    }

    if let Some(transition) = case.get("proposed_transition") {
        lines.push("**Proposed transition (intent):**".to_string());
        lines.push(format!("- intent: {}", str_field(transition, "intent", "TBD")));
        lines.push(format!("- scope: {}", str_field(transition, "scope", "TBD")));
        lines.push(format!(
            "- reversibility: {}",
            str_field(transition, "reversibility", "TBD")
        ));
        if let Some(verification) = transition.get("verification").and_then(Value::as_array) {
            if !verification.is_empty() {
                lines.push("- verification:".to_string());
                for item in verification {
                    if let Some(step) = item.as_str() {
                        lines.push(format!("  - {step}"));
                    }
                }
            }
        }
        lines.push(String::new());
    }

    lines.push("```json".to_string());
    lines.push(serde_json::to_string_pretty(case)?);
    lines.push("```".to_string());
    Ok(lines.join("\n"))
}
