use std::future::Future;

use async_trait::async_trait;
use base64::Engine as _;
use octocrab::Octocrab;

use crate::config::GitHubConfig;
use crate::error::{AppError, Result};
use crate::platform::types::RawReview;
use crate::platform::Platform;

const REVIEWS_PER_PAGE: usize = 100;

/// GitHub-backed implementation of [`Platform`], authenticated with a
/// personal access token.
pub struct GitHubPlatform {
    client: Octocrab,
}

impl GitHubPlatform {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(config.token.clone())
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build GitHub client: {e}")))?;

        Ok(Self { client })
    }

    fn parse_repo(repo_full_name: &str) -> Result<(&str, &str)> {
        match repo_full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok((owner, name))
            }
            _ => Err(AppError::Config(format!(
                "invalid repository name: {repo_full_name:?}"
            ))),
        }
    }
}

/// Drain a paginated review listing: fetch pages sequentially starting at 1,
/// accumulate every record, and stop after the first page shorter than
/// `per_page`. Any page failure fails the whole listing; accumulated pages
/// are discarded.
async fn drain_review_pages<F, Fut>(per_page: usize, mut fetch_page: F) -> Result<Vec<RawReview>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<serde_json::Value>>>,
{
    let mut reviews = Vec::new();
    let mut page = 1u32;
    loop {
        let batch = fetch_page(page).await?;
        let batch_len = batch.len();

        for review in batch {
            // Reviews from deleted accounts have no user; skip them.
            let Some(reviewer_id) = review["user"]["id"].as_u64() else {
                continue;
            };
            reviews.push(RawReview {
                reviewer_id,
                state: review["state"].as_str().unwrap_or_default().to_string(),
            });
        }

        if batch_len < per_page {
            break;
        }
        page += 1;
    }

    Ok(reviews)
}

#[async_trait]
impl Platform for GitHubPlatform {
    async fn fetch_file(&self, repo_full_name: &str, path: &str) -> Result<Vec<u8>> {
        let (owner, repo) = Self::parse_repo(repo_full_name)?;

        // No ref parameter: the contents API defaults to the default branch.
        let route = format!("/repos/{owner}/{repo}/contents/{path}");
        let response: serde_json::Value = self
            .client
            .get(&route, None::<&()>)
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to fetch {path:?}: {e}")))?;

        // The contents API returns an array when given a directory.
        if response.is_array() {
            return Err(AppError::Config(format!("directory path supplied: {path:?}")));
        }

        let content = response["content"].as_str().ok_or_else(|| {
            AppError::GitHubApi(format!("No file content returned for {path:?}"))
        })?;

        // GitHub wraps the base64 payload across lines.
        let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| AppError::GitHubApi(format!("Invalid base64 content for {path:?}: {e}")))
    }

    async fn list_reviews(&self, repo_full_name: &str, pr_number: u64) -> Result<Vec<RawReview>> {
        let (owner, repo) = Self::parse_repo(repo_full_name)?;
        let (owner, repo) = (owner.to_string(), repo.to_string());

        drain_review_pages(REVIEWS_PER_PAGE, |page| {
            let route = format!(
                "/repos/{owner}/{repo}/pulls/{pr_number}/reviews?per_page={REVIEWS_PER_PAGE}&page={page}"
            );
            let client = &self.client;
            async move {
                client.get(&route, None::<&()>).await.map_err(|e| {
                    AppError::GitHubApi(format!(
                        "Failed to list reviews for #{pr_number} (page {page}): {e}"
                    ))
                })
            }
        })
        .await
    }

    async fn replace_labels(
        &self,
        repo_full_name: &str,
        issue_number: u64,
        labels: &[String],
    ) -> Result<()> {
        let (owner, repo) = Self::parse_repo(repo_full_name)?;

        let route = format!("/repos/{owner}/{repo}/issues/{issue_number}/labels");
        let body = serde_json::json!({ "labels": labels });
        let _: serde_json::Value = self.client.put(&route, Some(&body)).await.map_err(|e| {
            AppError::GitHubApi(format!("Failed to replace labels on #{issue_number}: {e}"))
        })?;

        Ok(())
    }
}
