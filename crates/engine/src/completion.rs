// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-completion message building.
//!
//! When every non-persistent worker in a run reaches terminal state,
//! the coordinator gets exactly one notification. The wording is
//! phase-aware: a run of all-builders reads differently from a mixed
//! batch, because the coordinator's next move differs.

use ovs_core::{AgentSession, Capability};
use std::collections::BTreeMap;

/// Capabilities excluded from completion accounting.
pub fn is_completion_exempt(capability: Capability) -> bool {
    capability.is_persistent()
}

/// Subject and body for the one-shot run-complete mail.
pub fn run_complete_message(run_id: &str, workers: &[AgentSession]) -> (String, String) {
    let subject = format!("Run {run_id} complete");
    let n = workers.len();

    let first = workers.first().map(|w| w.capability);
    let uniform = first.filter(|c| workers.iter().all(|w| w.capability == *c));

    let body = match uniform {
        Some(Capability::Builder) => format!(
            "All {n} builders in run {run_id} have finished. Review their \
             branches and queue merges or dispatch the review phase."
        ),
        Some(Capability::Reviewer) => format!(
            "All {n} reviewers in run {run_id} have finished. Collect their \
             verdicts and decide what merges."
        ),
        Some(Capability::Scout) => format!(
            "All {n} scouts in run {run_id} have reported. Synthesize their \
             findings and plan the build phase."
        ),
        Some(Capability::Merger) => format!(
            "All {n} merge tasks in run {run_id} are done. The integration \
             branch is current."
        ),
        _ => format!(
            "All {n} workers in run {run_id} reached a terminal state: {}.",
            capability_breakdown(workers)
        ),
    };
    (subject, body)
}

/// Sorted counts like `2 builder, 1 reviewer`.
fn capability_breakdown(workers: &[AgentSession]) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for worker in workers {
        *counts.entry(worker.capability.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(capability, count)| format!("{count} {capability}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
