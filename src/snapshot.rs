use crate::review::ReviewSummary;
use crate::webhook::events::PullRequestPayload;

/// Immutable capture of the pull request attributes rule evaluation reads.
/// Built once per labeling pass; evaluation never mutates it.
#[derive(Debug, Clone)]
pub struct PrSnapshot {
    pub number: u64,
    pub labels: Vec<String>,
    pub draft: bool,
    pub branch_name: String,
    pub title: String,
    pub approved: bool,
    pub changes_requested: bool,
}

impl PrSnapshot {
    pub fn from_event(pr: &PullRequestPayload, reviews: ReviewSummary) -> Self {
        Self {
            number: pr.number,
            labels: pr.labels.iter().map(|l| l.name.clone()).collect(),
            draft: pr.draft,
            branch_name: pr.head.ref_name.clone(),
            title: pr.title.clone(),
            approved: reviews.approved,
            changes_requested: reviews.changes_requested,
        }
    }
}
