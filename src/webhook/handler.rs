use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::server::AppState;
use crate::webhook::events::{PullRequestPayload, RepositoryPayload, WebhookEvent};
use crate::webhook::signature::verify_signature;
use crate::workflow::labeler::{self, PassOutcome};

pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let signature = match headers
        .get("x-hub-signature-256")
        .and_then(|v| v.to_str().ok())
    {
        Some(sig) => sig.to_string(),
        None => {
            tracing::warn!("Missing X-Hub-Signature-256 header");
            return StatusCode::UNAUTHORIZED;
        }
    };

    let event_type = match headers.get("x-github-event").and_then(|v| v.to_str().ok()) {
        Some(et) => et.to_string(),
        None => {
            tracing::warn!("Missing X-GitHub-Event header");
            return StatusCode::BAD_REQUEST;
        }
    };

    if let Err(e) = verify_signature(state.config.webhook_secret(), &body, &signature) {
        tracing::warn!(error = %e, "Webhook signature verification failed");
        return StatusCode::UNAUTHORIZED;
    }

    let event = match WebhookEvent::parse(&event_type, &body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, event_type = %event_type, "Failed to parse webhook event");
            return StatusCode::BAD_REQUEST;
        }
    };

    match event {
        WebhookEvent::PullRequest(event) => {
            run_pass(&state, &event.repository, &event.pull_request, &event.action).await
        }
        WebhookEvent::PullRequestReview(event) => {
            run_pass(&state, &event.repository, &event.pull_request, &event.action).await
        }
        WebhookEvent::Ping => {
            tracing::info!("Received ping event");
            StatusCode::OK
        }
        WebhookEvent::Unsupported(event_type) => {
            tracing::debug!(event_type = %event_type, "Ignoring event unrelated to pull requests");
            StatusCode::OK
        }
    }
}

async fn run_pass(
    state: &AppState,
    repo: &RepositoryPayload,
    pr: &PullRequestPayload,
    action: &str,
) -> StatusCode {
    tracing::info!(
        repo = %repo.full_name,
        pr = pr.number,
        action = %action,
        "Running labeling pass"
    );

    let rules_path = &state.config.github.rules_path;
    match labeler::run(&state.platform, rules_path, repo, pr).await {
        Ok(PassOutcome::Unchanged) => {
            tracing::debug!(repo = %repo.full_name, pr = pr.number, "No label change needed");
            StatusCode::OK
        }
        Ok(PassOutcome::Replaced(labels)) => {
            tracing::info!(
                repo = %repo.full_name,
                pr = pr.number,
                labels = ?labels,
                "Labels replaced"
            );
            StatusCode::OK
        }
        Err(e) => {
            // No labels were written; GitHub's redelivery is the retry path.
            tracing::error!(
                repo = %repo.full_name,
                pr = pr.number,
                error = %e,
                "Labeling pass failed"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
