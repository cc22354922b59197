// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The job status transition graph as data.
//!
//! Forward chain `pending -> quoted -> approved -> scheduled -> in_progress
//! -> completed`, with side branches for cancellation, contractor pass, and
//! candidate exhaustion. `scheduled -> scheduled` is a reschedule.

use tradie_core::JobStatus;

use JobStatus::*;

const EDGES: &[(JobStatus, JobStatus)] = &[
    (Pending, Quoted),
    (Pending, Cancelled),
    (Quoted, Approved),
    (Quoted, ContractorPassed),
    (Quoted, Cancelled),
    (Approved, Scheduled),
    (Approved, Cancelled),
    (Scheduled, Scheduled),
    (Scheduled, InProgress),
    (Scheduled, Cancelled),
    (InProgress, Completed),
    (InProgress, Cancelled),
    (ContractorPassed, Quoted),
    (ContractorPassed, NoContractorsAvailable),
    (ContractorPassed, Cancelled),
];

/// Whether `from -> to` is an edge of the lifecycle graph.
pub fn can_transition(from: JobStatus, to: JobStatus) -> bool {
    EDGES.contains(&(from, to))
}

/// All statuses reachable in one step from `from`.
pub fn valid_targets(from: JobStatus) -> Vec<JobStatus> {
    EDGES
        .iter()
        .filter(|(f, _)| *f == from)
        .map(|(_, t)| *t)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_chain_is_walkable() {
        let chain = [Pending, Quoted, Approved, Scheduled, InProgress, Completed];
        for pair in chain.windows(2) {
            assert!(can_transition(pair[0], pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for status in [Completed, Cancelled, NoContractorsAvailable] {
            assert!(status.is_terminal());
            assert!(valid_targets(status).is_empty(), "{status} should be terminal");
        }
    }

    #[test]
    fn backward_and_skip_edges_are_rejected() {
        assert!(!can_transition(Completed, Pending));
        assert!(!can_transition(Pending, Scheduled));
        assert!(!can_transition(Approved, Quoted));
        assert!(!can_transition(Quoted, InProgress));
    }

    #[test]
    fn reschedule_is_a_self_edge() {
        assert!(can_transition(Scheduled, Scheduled));
        assert!(!can_transition(Quoted, Quoted));
    }

    #[test]
    fn passed_job_can_be_requoted_or_exhausted() {
        assert!(can_transition(ContractorPassed, Quoted));
        assert!(can_transition(ContractorPassed, NoContractorsAvailable));
    }
}
