use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::marketplace::domain::{
    Posting, PostingDraft, PostingId, Principal, UserId,
};
use crate::workflows::marketplace::repository::InMemoryMarketplaceRepository;
use crate::workflows::marketplace::review::{FeedbackError, FeedbackGenerator, FeedbackRequest};
use crate::workflows::marketplace::router::marketplace_router;
use crate::workflows::marketplace::service::{MarketplaceService, ProfileDraft};

pub(super) const CANNED_FEEDBACK: &str =
    "Strong draft. Name the team you want to join and quantify one project outcome.";

pub(super) fn employer() -> Principal {
    Principal::employer("emp-001")
}

pub(super) fn other_employer() -> Principal {
    Principal::employer("emp-002")
}

pub(super) fn candidate() -> Principal {
    Principal::candidate("cand-001")
}

pub(super) fn posting_draft(title: &str, required_skills: &[&str]) -> PostingDraft {
    PostingDraft {
        company_name: "Orbit Labs".to_string(),
        title: title.to_string(),
        description: "Build backend services for the launch telemetry platform.".to_string(),
        required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
        location: "Des Moines".to_string(),
        stipend: Some(2200),
        duration: Some("12 weeks".to_string()),
        application_deadline: None,
    }
}

pub(super) fn skills_profile(skills: &[&str]) -> ProfileDraft {
    ProfileDraft {
        skills: Some(skills.iter().map(|s| s.to_string()).collect()),
        education: Some("BSc Computer Science".to_string()),
        experience: Some("Two summers of backend work".to_string()),
    }
}

/// A cover letter long and warm enough to trip no red flags.
pub(super) fn clean_cover_letter() -> String {
    "Dear Orbit Labs team, I am excited to apply because your company builds the launch \
telemetry systems I have admired since my first robotics season. Last summer I shipped a \
monitoring service in Rust that cut alert noise for my lab by half, and I would love to \
bring the same energy to your internship. I have followed your open source work closely \
and contributed two patches to the ingestion pipeline, so I already know the codebase and \
the problems your team cares about solving every day."
        .to_string()
}

/// Generator double that always succeeds and records what it was asked.
#[derive(Default, Clone)]
pub(super) struct RecordingFeedback {
    requests: Arc<Mutex<Vec<FeedbackRequest>>>,
}

impl RecordingFeedback {
    pub(super) fn requests(&self) -> Vec<FeedbackRequest> {
        self.requests.lock().expect("feedback mutex poisoned").clone()
    }
}

impl FeedbackGenerator for RecordingFeedback {
    fn generate(&self, request: &FeedbackRequest) -> Result<String, FeedbackError> {
        self.requests
            .lock()
            .expect("feedback mutex poisoned")
            .push(request.clone());
        Ok(CANNED_FEEDBACK.to_string())
    }
}

/// Generator double standing in for a timed-out or failing provider.
#[derive(Default, Clone)]
pub(super) struct FailingFeedback;

impl FeedbackGenerator for FailingFeedback {
    fn generate(&self, _request: &FeedbackRequest) -> Result<String, FeedbackError> {
        Err(FeedbackError::Transport("connection timed out".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<MarketplaceService<InMemoryMarketplaceRepository, RecordingFeedback>>,
    Arc<InMemoryMarketplaceRepository>,
    Arc<RecordingFeedback>,
) {
    let repository = Arc::new(InMemoryMarketplaceRepository::default());
    let feedback = Arc::new(RecordingFeedback::default());
    let service = Arc::new(MarketplaceService::new(repository.clone(), feedback.clone()));
    (service, repository, feedback)
}

pub(super) fn build_degraded_service() -> (
    Arc<MarketplaceService<InMemoryMarketplaceRepository, FailingFeedback>>,
    Arc<InMemoryMarketplaceRepository>,
) {
    let repository = Arc::new(InMemoryMarketplaceRepository::default());
    let service = Arc::new(MarketplaceService::new(
        repository.clone(),
        Arc::new(FailingFeedback),
    ));
    (service, repository)
}

/// Publish a posting through the service facade and hand back its record.
pub(super) fn publish<R, G>(
    service: &MarketplaceService<R, G>,
    employer: &Principal,
    title: &str,
    required_skills: &[&str],
) -> Posting
where
    R: crate::workflows::marketplace::repository::MarketplaceRepository + 'static,
    G: FeedbackGenerator + 'static,
{
    service
        .create_posting(employer, posting_draft(title, required_skills))
        .expect("posting publishes")
}

pub(super) fn router_with(
    service: Arc<MarketplaceService<InMemoryMarketplaceRepository, RecordingFeedback>>,
) -> axum::Router {
    marketplace_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn posting_id(value: &Value) -> PostingId {
    PostingId(
        value
            .get("id")
            .and_then(Value::as_str)
            .expect("posting id present")
            .to_string(),
    )
}

pub(super) fn as_user(id: &str) -> UserId {
    UserId(id.to_string())
}
