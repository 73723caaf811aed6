use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ApplicationDraft, ApplicationId, ApplicationStatus, PostingDraft, PostingId, Principal, Role,
    UserId,
};
use super::repository::MarketplaceRepository;
use super::review::FeedbackGenerator;
use super::service::{
    MarketplaceService, PostingFilter, ProfileDraft, ReviewRequest, ServiceError,
};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extract the caller identity from the session-layer headers.
///
/// The upstream identity provider authenticates requests and stamps these
/// headers; the marketplace trusts the claim unconditionally.
#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .map(|value| UserId(value.trim().to_string()));

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(Role::parse);

        match (user_id, role) {
            (Some(user_id), Some(role)) => Ok(Principal { user_id, role }),
            _ => {
                let payload = json!({ "error": "missing or invalid identity headers" });
                Err((StatusCode::UNAUTHORIZED, Json(payload)).into_response())
            }
        }
    }
}

/// Router builder exposing the marketplace HTTP endpoints.
pub fn marketplace_router<R, F>(service: Arc<MarketplaceService<R, F>>) -> Router
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    Router::new()
        .route(
            "/api/v1/postings",
            get(list_postings_handler::<R, F>).post(create_posting_handler::<R, F>),
        )
        .route(
            "/api/v1/postings/recommended",
            get(recommendations_handler::<R, F>),
        )
        .route(
            "/api/v1/postings/employer",
            get(employer_postings_handler::<R, F>),
        )
        .route(
            "/api/v1/postings/:posting_id",
            get(get_posting_handler::<R, F>)
                .put(update_posting_handler::<R, F>)
                .delete(delete_posting_handler::<R, F>),
        )
        .route(
            "/api/v1/profile",
            get(get_profile_handler::<R, F>).post(save_profile_handler::<R, F>),
        )
        .route("/api/v1/profile/resume", post(attach_resume_handler::<R, F>))
        .route(
            "/api/v1/applications",
            post(create_application_handler::<R, F>),
        )
        .route(
            "/api/v1/applications/candidate",
            get(candidate_applications_handler::<R, F>),
        )
        .route(
            "/api/v1/applications/employer",
            get(employer_applications_handler::<R, F>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            put(set_status_handler::<R, F>),
        )
        .route(
            "/api/v1/applications/:application_id/review",
            post(review_application_handler::<R, F>),
        )
        .route("/api/v1/reviews", post(review_handler::<R, F>))
        .with_state(service)
}

fn error_response(error: ServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), Json(payload)).into_response()
}

/// Query-string form of [`PostingFilter`]; skills arrive comma separated.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PostingFilterQuery {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    skills: Option<String>,
}

impl PostingFilterQuery {
    fn into_filter(self) -> PostingFilter {
        PostingFilter {
            location: self.location,
            skills: self
                .skills
                .map(|raw| {
                    raw.split(',')
                        .map(|skill| skill.trim().to_string())
                        .filter(|skill| !skill.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChangeRequest {
    status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResumeUploadRequest {
    resume_ref: String,
}

pub(crate) async fn list_postings_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    Query(filter): Query<PostingFilterQuery>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.postings(&filter.into_filter()) {
        Ok(postings) => (StatusCode::OK, Json(postings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_posting_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
    Json(draft): Json<PostingDraft>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.create_posting(&principal, draft) {
        Ok(posting) => (StatusCode::CREATED, Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_posting_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    Path(posting_id): Path<String>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.posting(&PostingId(posting_id)) {
        Ok(posting) => (StatusCode::OK, Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_posting_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
    Path(posting_id): Path<String>,
    Json(draft): Json<PostingDraft>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.update_posting(&principal, &PostingId(posting_id), draft) {
        Ok(posting) => (StatusCode::OK, Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_posting_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
    Path(posting_id): Path<String>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.delete_posting(&principal, &PostingId(posting_id)) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "posting deleted" })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn employer_postings_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.postings_for_employer(&principal) {
        Ok(postings) => (StatusCode::OK, Json(postings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommendations_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.recommendations(&principal) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_profile_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.profile(&principal) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_profile_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
    Json(draft): Json<ProfileDraft>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.save_profile(&principal, draft) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn attach_resume_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
    Json(request): Json<ResumeUploadRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.attach_resume(&principal, request.resume_ref) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_application_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
    Json(draft): Json<ApplicationDraft>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.create_application(&principal, draft) {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_status_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
    Path(application_id): Path<String>,
    Json(request): Json<StatusChangeRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.set_application_status(
        &principal,
        &ApplicationId(application_id),
        request.status,
    ) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidate_applications_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.applications_for_candidate(&principal) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn employer_applications_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    match service.applications_for_employer(&principal) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Cover-letter preview. The analyzer may perform a blocking HTTP call to
/// the feedback generator, so the review runs on the blocking pool.
pub(crate) async fn review_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    Json(request): Json<ReviewRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    let outcome =
        tokio::task::spawn_blocking(move || service.review_cover_letter(&request)).await;

    match outcome {
        Ok(Ok(review)) => (StatusCode::OK, Json(review)).into_response(),
        Ok(Err(error)) => error_response(error),
        Err(join_error) => {
            let payload = json!({ "error": format!("review task failed: {join_error}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn review_application_handler<R, F>(
    State(service): State<Arc<MarketplaceService<R, F>>>,
    principal: Principal,
    Path(application_id): Path<String>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    let id = ApplicationId(application_id);
    let outcome =
        tokio::task::spawn_blocking(move || service.review_application(&principal, &id)).await;

    match outcome {
        Ok(Ok(review)) => (StatusCode::OK, Json(review)).into_response(),
        Ok(Err(error)) => error_response(error),
        Err(join_error) => {
            let payload = json!({ "error": format!("review task failed: {join_error}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
