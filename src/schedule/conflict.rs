//! Time conflict detection between activities on the same weekday

use std::fmt;

use super::types::{Activity, Day};

/// Whether candidates in one batch are also checked against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Only check each candidate against the committed collection
    #[default]
    ExistingOnly,
    /// Also reject overlaps between candidates of the same batch
    IncludeSiblings,
}

/// A rejected candidate and the activity it collides with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub candidate: Activity,
    pub existing: Activity,
}

impl Conflict {
    pub fn day(&self) -> Day {
        self.candidate.day
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: \"{}\" ({})",
            self.day().label(),
            self.existing.title,
            self.existing.time_range()
        )
    }
}

/// Half-open interval overlap: `[s1, e1)` and `[s2, e2)` overlap iff `s1 < e2 && s2 < e1`.
/// Back-to-back intervals (`e1 == s2`) do not overlap.
pub fn overlaps(a: (u16, u16), b: (u16, u16)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// First activity in `existing` (in iteration order) on the candidate's day whose
/// interval overlaps the candidate's.
pub fn find_conflict<'a>(candidate: &Activity, existing: &'a [Activity]) -> Option<&'a Activity> {
    existing
        .iter()
        .filter(|activity| activity.day == candidate.day)
        .find(|activity| overlaps(candidate.interval(), activity.interval()))
}

/// Check every candidate of a batch, reporting at most one conflict per candidate
pub fn find_conflicts(candidates: &[Activity], existing: &[Activity], policy: BatchPolicy) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, candidate) in candidates.iter().enumerate() {
        let hit = find_conflict(candidate, existing).or_else(|| match policy {
            BatchPolicy::ExistingOnly => None,
            BatchPolicy::IncludeSiblings => find_conflict(candidate, &candidates[..i]),
        });

        if let Some(hit) = hit {
            conflicts.push(Conflict {
                candidate: candidate.clone(),
                existing: hit.clone(),
            });
        }
    }

    conflicts
}
