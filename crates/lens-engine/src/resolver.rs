//! Overlap resolution.

use crate::fragment::{FragmentKind, FragmentResult};

/// Reduce fragments to an ordered, non-overlapping sequence.
///
/// Candidates are taken in order of `start`. On overlap a tag beats an
/// output; otherwise the strictly longer span wins and ties keep the
/// fragment accepted first. A candidate that loses to any accepted
/// fragment is discarded without evicting anything.
#[must_use]
pub fn resolve_overlaps(mut fragments: Vec<FragmentResult>) -> Vec<FragmentResult> {
    fragments.sort_by_key(|f| f.start);

    let mut accepted: Vec<FragmentResult> = Vec::with_capacity(fragments.len());
    for candidate in fragments {
        let mut evict = Vec::new();
        let mut keep = true;

        for (index, existing) in accepted.iter().enumerate() {
            if !candidate.overlaps(existing) {
                continue;
            }
            if candidate_wins(&candidate, existing) {
                evict.push(index);
            } else {
                keep = false;
                break;
            }
        }

        if keep {
            for index in evict.into_iter().rev() {
                accepted.remove(index);
            }
            accepted.push(candidate);
        }
    }

    accepted.sort_by_key(|f| f.start);
    accepted
}

fn candidate_wins(candidate: &FragmentResult, existing: &FragmentResult) -> bool {
    match (candidate.kind, existing.kind) {
        (FragmentKind::Tag, FragmentKind::Output) => true,
        (FragmentKind::Output, FragmentKind::Tag) => false,
        _ => candidate.span_len() > existing.span_len(),
    }
}
