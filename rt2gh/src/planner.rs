//! Migration planning.

use std::collections::HashSet;
use tracing::debug;

/// Computes the ordered work list for a run: candidate ids that are not
/// already migrated, sorted ascending, duplicates dropped.
///
/// Ascending order keeps processing deterministic, so a re-run after a
/// partial failure resumes predictably and logs stay diffable. Duplicate
/// candidates (a ticket sitting in two searched queues) are collapsed to a
/// single attempt.
#[must_use]
pub fn plan(candidates: &[u64], migrated: &HashSet<u64>) -> Vec<u64> {
    let mut planned: Vec<u64> = candidates
        .iter()
        .copied()
        .filter(|id| !migrated.contains(id))
        .collect();
    planned.sort_unstable();
    planned.dedup();

    debug!(
        candidates = candidates.len(),
        migrated = migrated.len(),
        planned = planned.len(),
        "Computed migration plan"
    );
    planned
}
