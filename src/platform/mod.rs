pub mod github;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::RawReview;

/// The narrow interface to the hosting platform. One implementation talks to
/// GitHub; tests substitute in-memory fakes.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Fetch the raw bytes of a file on the repository's default branch.
    /// Supplying a directory path is an error.
    async fn fetch_file(&self, repo_full_name: &str, path: &str) -> Result<Vec<u8>>;

    /// List every review on a pull request, oldest first, draining
    /// pagination before returning. Any page failure fails the whole call.
    async fn list_reviews(&self, repo_full_name: &str, pr_number: u64) -> Result<Vec<RawReview>>;

    /// Replace the complete label set on an issue or pull request.
    async fn replace_labels(
        &self,
        repo_full_name: &str,
        issue_number: u64,
        labels: &[String],
    ) -> Result<()>;
}
