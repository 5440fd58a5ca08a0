//! Aggregation of pull request reviews into per-reviewer verdicts.

use std::collections::HashMap;

use crate::platform::types::RawReview;

/// The substantive outcome of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewVerdict {
    Approved,
    ChangesRequested,
    Dismissed,
    Commented,
}

impl ReviewVerdict {
    /// Parse a review state string as GitHub reports it (any casing).
    /// Unrecognized states yield `None` and are dropped from aggregation.
    pub fn parse(state: &str) -> Option<Self> {
        match state.to_ascii_lowercase().as_str() {
            "approved" => Some(Self::Approved),
            "changes_requested" => Some(Self::ChangesRequested),
            "dismissed" => Some(Self::Dismissed),
            "commented" => Some(Self::Commented),
            _ => None,
        }
    }
}

/// Projection of the aggregated verdicts onto the two signals rule
/// evaluation consumes. Both flags may be true at once when reviewers
/// disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub approved: bool,
    pub changes_requested: bool,
}

/// Reduce a chronological review stream (oldest first) to each reviewer's
/// latest verdict, then project onto approved / changes-requested flags.
///
/// `Commented` is not a verdict: it is never stored and does not displace a
/// reviewer's earlier real verdict. `Dismissed` is stored, so a reviewer
/// whose blocking review was dismissed stops counting against the PR.
pub fn aggregate(reviews: &[RawReview]) -> ReviewSummary {
    let verdicts = latest_verdicts(reviews);
    ReviewSummary {
        approved: verdicts.values().any(|v| *v == ReviewVerdict::Approved),
        changes_requested: verdicts
            .values()
            .any(|v| *v == ReviewVerdict::ChangesRequested),
    }
}

fn latest_verdicts(reviews: &[RawReview]) -> HashMap<u64, ReviewVerdict> {
    let mut latest = HashMap::new();
    for review in reviews {
        let Some(verdict) = ReviewVerdict::parse(&review.state) else {
            continue;
        };
        if verdict == ReviewVerdict::Commented {
            continue;
        }
        latest.insert(review.reviewer_id, verdict);
    }
    latest
}
