use serde::Deserialize;

use crate::error::Result;

/// Top-level webhook event, dispatched on the X-GitHub-Event header.
#[derive(Debug)]
pub enum WebhookEvent {
    PullRequest(PullRequestEvent),
    PullRequestReview(PullRequestReviewEvent),
    Ping,
    Unsupported(String),
}

#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: PullRequestPayload,
    pub repository: RepositoryPayload,
}

/// A review was submitted, edited, or dismissed. The inline review object is
/// not captured: the labeling pass re-fetches the full review list anyway,
/// so only the pull request and repository matter here.
#[derive(Debug, Deserialize)]
pub struct PullRequestReviewEvent {
    pub action: String,
    pub pull_request: PullRequestPayload,
    pub repository: RepositoryPayload,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub labels: Vec<LabelPayload>,
    pub head: PullRequestRef,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelPayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryPayload {
    pub full_name: String,
    pub default_branch: String,
}

impl WebhookEvent {
    /// Parse a raw payload according to its event-type name. Event types
    /// unrelated to pull requests are recognized but not parsed; a payload
    /// claiming a pull-request event type must parse or the whole call fails.
    pub fn parse(event_type: &str, payload: &[u8]) -> Result<Self> {
        match event_type {
            "pull_request" => {
                let event: PullRequestEvent = serde_json::from_slice(payload)?;
                Ok(WebhookEvent::PullRequest(event))
            }
            "pull_request_review" => {
                let event: PullRequestReviewEvent = serde_json::from_slice(payload)?;
                Ok(WebhookEvent::PullRequestReview(event))
            }
            "ping" => Ok(WebhookEvent::Ping),
            other => Ok(WebhookEvent::Unsupported(other.to_string())),
        }
    }
}
