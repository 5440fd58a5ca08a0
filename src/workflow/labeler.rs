//! One labeling pass: fetch the rules file, aggregate reviews, evaluate the
//! rules against a snapshot of the pull request, and replace the labels only
//! if the result differs from what is already there.

use crate::error::Result;
use crate::platform::Platform;
use crate::review;
use crate::rules::RuleSet;
use crate::snapshot::PrSnapshot;
use crate::webhook::events::{PullRequestPayload, RepositoryPayload};

/// What a labeling pass did, for logging at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The desired labels already matched the current ones; nothing written.
    Unchanged,
    /// The full label set was replaced with these labels.
    Replaced(Vec<String>),
}

/// Run a single pass for one pull request. Either completes with no side
/// effect beyond an optional label replacement, or fails with no side effect
/// at all.
pub async fn run(
    platform: &dyn Platform,
    rules_path: &str,
    repo: &RepositoryPayload,
    pr: &PullRequestPayload,
) -> Result<PassOutcome> {
    let raw = platform.fetch_file(&repo.full_name, rules_path).await?;
    let rules = RuleSet::parse(&raw)?;

    let reviews = platform.list_reviews(&repo.full_name, pr.number).await?;
    let summary = review::aggregate(&reviews);

    let snapshot = PrSnapshot::from_event(pr, summary);
    let desired = rules.evaluate(&snapshot)?;

    // Reconciliation gate: re-running against an unchanged snapshot must
    // not touch the API.
    if desired == snapshot.labels {
        tracing::debug!(pr = snapshot.number, "Labels already up to date");
        return Ok(PassOutcome::Unchanged);
    }

    tracing::info!(
        repo = %repo.full_name,
        pr = snapshot.number,
        labels = ?desired,
        "Replacing label set"
    );
    platform
        .replace_labels(&repo.full_name, snapshot.number, &desired)
        .await?;

    Ok(PassOutcome::Replaced(desired))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::platform::types::RawReview;
    use crate::webhook::events::{LabelPayload, PullRequestRef};

    const RULES: &str = r#"
WIP:
  draft: true
Changes Requested:
  draft: false
  changes_requested: true
"#;

    struct FakePlatform {
        rules: &'static str,
        reviews: Vec<RawReview>,
        fail_reviews: bool,
        replaced: Mutex<Vec<Vec<String>>>,
    }

    impl FakePlatform {
        fn new(rules: &'static str, reviews: Vec<RawReview>) -> Self {
            Self {
                rules,
                reviews,
                fail_reviews: false,
                replaced: Mutex::new(Vec::new()),
            }
        }

        fn replacements(&self) -> Vec<Vec<String>> {
            self.replaced.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Platform for FakePlatform {
        async fn fetch_file(&self, _repo: &str, _path: &str) -> Result<Vec<u8>> {
            Ok(self.rules.as_bytes().to_vec())
        }

        async fn list_reviews(&self, _repo: &str, _pr: u64) -> Result<Vec<RawReview>> {
            if self.fail_reviews {
                return Err(AppError::GitHubApi("listing failed".to_string()));
            }
            Ok(self.reviews.clone())
        }

        async fn replace_labels(
            &self,
            _repo: &str,
            _issue: u64,
            labels: &[String],
        ) -> Result<()> {
            self.replaced.lock().unwrap().push(labels.to_vec());
            Ok(())
        }
    }

    fn repo() -> RepositoryPayload {
        RepositoryPayload {
            full_name: "widgets/factory".to_string(),
            default_branch: "main".to_string(),
        }
    }

    fn pr(draft: bool, labels: &[&str]) -> PullRequestPayload {
        PullRequestPayload {
            number: 7,
            title: "Add widgets".to_string(),
            draft,
            labels: labels
                .iter()
                .map(|name| LabelPayload {
                    name: name.to_string(),
                })
                .collect(),
            head: PullRequestRef {
                ref_name: "feature/widgets".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_draft_pr_gains_wip_label() {
        let platform = FakePlatform::new(RULES, Vec::new());
        let outcome = run(&platform, ".github/lichen.yml", &repo(), &pr(true, &["Epic"]))
            .await
            .unwrap();

        let expected = vec!["Epic".to_string(), "WIP".to_string()];
        assert_eq!(outcome, PassOutcome::Replaced(expected.clone()));
        assert_eq!(platform.replacements(), vec![expected]);
    }

    #[tokio::test]
    async fn test_unchanged_labels_issue_no_write() {
        let platform = FakePlatform::new(RULES, Vec::new());
        let outcome = run(&platform, ".github/lichen.yml", &repo(), &pr(true, &["WIP"]))
            .await
            .unwrap();

        assert_eq!(outcome, PassOutcome::Unchanged);
        assert!(platform.replacements().is_empty());
    }

    #[tokio::test]
    async fn test_reviews_drive_the_snapshot() {
        let reviews = vec![RawReview {
            reviewer_id: 1,
            state: "changes_requested".to_string(),
        }];
        let platform = FakePlatform::new(RULES, reviews);
        let outcome = run(&platform, ".github/lichen.yml", &repo(), &pr(false, &[]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PassOutcome::Replaced(vec!["Changes Requested".to_string()])
        );
    }

    #[tokio::test]
    async fn test_failed_review_listing_writes_nothing() {
        let mut platform = FakePlatform::new(RULES, Vec::new());
        platform.fail_reviews = true;

        let result = run(&platform, ".github/lichen.yml", &repo(), &pr(true, &[])).await;
        assert!(result.is_err());
        assert!(platform.replacements().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_rules_write_nothing() {
        let platform = FakePlatform::new("WIP: [unterminated", Vec::new());
        let result = run(&platform, ".github/lichen.yml", &repo(), &pr(true, &[])).await;
        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(platform.replacements().is_empty());
    }

    #[tokio::test]
    async fn test_second_pass_is_a_no_op() {
        let platform = FakePlatform::new(RULES, Vec::new());
        let first = run(&platform, ".github/lichen.yml", &repo(), &pr(true, &["Epic"]))
            .await
            .unwrap();
        let PassOutcome::Replaced(written) = first else {
            panic!("expected a replacement on the first pass");
        };

        // Re-run with the labels the first pass settled on.
        let settled: Vec<&str> = written.iter().map(String::as_str).collect();
        let second = run(&platform, ".github/lichen.yml", &repo(), &pr(true, &settled))
            .await
            .unwrap();
        assert_eq!(second, PassOutcome::Unchanged);
        assert_eq!(platform.replacements().len(), 1);
    }
}
