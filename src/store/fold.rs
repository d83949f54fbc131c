//! Folding new coverage into a time bucket.

use crate::config::FoldPolicy;
use crate::coverage::CoverageRegion;

/// What happened to a coverage region when it was folded into its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    /// The new region subsumed an existing entry and took its place.
    Replaced,
    /// The new region overlapped an existing entry and was merged into it.
    Merged,
    /// Nothing matched; the new region was added as its own entry.
    Appended,
    /// Transitive policy: this many entries were absorbed into the new region.
    Absorbed(usize),
}

/// Fold `incoming` into `bucket`, keeping the bucket sorted by ascending area.
pub(crate) fn fold(
    bucket: &mut Vec<CoverageRegion>,
    incoming: CoverageRegion,
    policy: FoldPolicy,
) -> FoldOutcome {
    sort_by_area(bucket);
    let outcome = match policy {
        FoldPolicy::FirstMatch => fold_first_match(bucket, incoming),
        FoldPolicy::Transitive => fold_transitive(bucket, incoming),
    };
    sort_by_area(bucket);
    outcome
}

fn sort_by_area(bucket: &mut [CoverageRegion]) {
    bucket.sort_by(|a, b| a.area().total_cmp(&b.area()));
}

fn matches(existing: &CoverageRegion, incoming: &CoverageRegion) -> bool {
    CoverageRegion::contains(incoming, existing) || CoverageRegion::overlaps(existing, incoming)
}

// Only the first matching entry is touched. A replaced entry's ids are
// dropped from the bucket; they stay in the event map.
fn fold_first_match(bucket: &mut Vec<CoverageRegion>, incoming: CoverageRegion) -> FoldOutcome {
    let Some(idx) = bucket.iter().position(|existing| matches(existing, &incoming)) else {
        bucket.push(incoming);
        return FoldOutcome::Appended;
    };

    if CoverageRegion::contains(&incoming, &bucket[idx]) {
        bucket[idx] = incoming;
        FoldOutcome::Replaced
    } else {
        bucket[idx] = CoverageRegion::union(&bucket[idx], &incoming);
        FoldOutcome::Merged
    }
}

fn fold_transitive(bucket: &mut Vec<CoverageRegion>, mut incoming: CoverageRegion) -> FoldOutcome {
    let mut absorbed = 0;

    // Growing `incoming` can bring earlier entries into range, so rescan
    // until a full pass absorbs nothing.
    loop {
        let mut changed = false;
        let mut idx = 0;
        while idx < bucket.len() {
            if matches(&bucket[idx], &incoming) {
                let existing = bucket.remove(idx);
                incoming = CoverageRegion::union(&existing, &incoming);
                absorbed += 1;
                changed = true;
            } else {
                idx += 1;
            }
        }
        if !changed {
            break;
        }
    }

    bucket.push(incoming);
    if absorbed == 0 {
        FoldOutcome::Appended
    } else {
        FoldOutcome::Absorbed(absorbed)
    }
}
