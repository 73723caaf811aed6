use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationStatus, CandidateProfile, MatchResult,
    Posting, PostingDraft, PostingId, Principal, Role,
};
use super::matching;
use super::repository::{
    CandidateApplicationView, EmployerApplicationView, MarketplaceRepository, RepositoryError,
};
use super::review::{CoverLetterAnalyzer, FeedbackGenerator, ReviewResult};

/// Service facade composing the matcher, the analyzer, and the application
/// lifecycle over one repository.
pub struct MarketplaceService<R, F> {
    repository: Arc<R>,
    analyzer: CoverLetterAnalyzer<F>,
}

static POSTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_posting_id() -> PostingId {
    let id = POSTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PostingId(format!("post-{id:06}"))
}

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Optional narrowing criteria for the public posting listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostingFilter {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl PostingFilter {
    fn accepts(&self, posting: &Posting) -> bool {
        if let Some(location) = &self.location {
            if &posting.location != location {
                return false;
            }
        }
        if !self.skills.is_empty()
            && !self
                .skills
                .iter()
                .any(|skill| posting.required_skills.contains(skill))
        {
            return false;
        }
        true
    }
}

/// Candidate-supplied profile fields. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
}

/// Input for a standalone cover-letter review (the pre-submission preview).
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub cover_letter: String,
    pub company_name: String,
    pub job_title: String,
}

impl<R, F> MarketplaceService<R, F>
where
    R: MarketplaceRepository + 'static,
    F: FeedbackGenerator + 'static,
{
    pub fn new(repository: Arc<R>, feedback: Arc<F>) -> Self {
        Self {
            repository,
            analyzer: CoverLetterAnalyzer::new(feedback),
        }
    }

    fn require_role(principal: &Principal, role: Role) -> Result<(), ServiceError> {
        if principal.role == role {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    // --- Postings ---

    pub fn create_posting(
        &self,
        principal: &Principal,
        draft: PostingDraft,
    ) -> Result<Posting, ServiceError> {
        Self::require_role(principal, Role::Employer)?;
        let posting = draft.into_posting(next_posting_id(), principal.user_id.clone());
        let stored = self.repository.insert_posting(posting)?;
        info!(posting_id = %stored.id.0, employer = %principal.user_id.0, "posting published");
        Ok(stored)
    }

    pub fn update_posting(
        &self,
        principal: &Principal,
        id: &PostingId,
        draft: PostingDraft,
    ) -> Result<Posting, ServiceError> {
        Self::require_role(principal, Role::Employer)?;
        let existing = self
            .repository
            .posting(id)?
            .ok_or(ServiceError::NotFound("posting"))?;
        if existing.employer_id != principal.user_id {
            return Err(ServiceError::Forbidden);
        }

        let updated = draft.into_posting(existing.id, existing.employer_id);
        self.repository.update_posting(updated.clone())?;
        Ok(updated)
    }

    pub fn delete_posting(
        &self,
        principal: &Principal,
        id: &PostingId,
    ) -> Result<(), ServiceError> {
        Self::require_role(principal, Role::Employer)?;
        let existing = self
            .repository
            .posting(id)?
            .ok_or(ServiceError::NotFound("posting"))?;
        if existing.employer_id != principal.user_id {
            return Err(ServiceError::Forbidden);
        }
        self.repository.delete_posting(id)?;
        Ok(())
    }

    pub fn posting(&self, id: &PostingId) -> Result<Posting, ServiceError> {
        self.repository
            .posting(id)?
            .ok_or(ServiceError::NotFound("posting"))
    }

    pub fn postings(&self, filter: &PostingFilter) -> Result<Vec<Posting>, ServiceError> {
        let postings = self.repository.postings()?;
        Ok(postings
            .into_iter()
            .filter(|posting| filter.accepts(posting))
            .collect())
    }

    pub fn postings_for_employer(
        &self,
        principal: &Principal,
    ) -> Result<Vec<Posting>, ServiceError> {
        Self::require_role(principal, Role::Employer)?;
        Ok(self.repository.postings_for_employer(&principal.user_id)?)
    }

    // --- Recommendations ---

    /// Rank every open posting for the calling candidate, best match first.
    pub fn recommendations(&self, principal: &Principal) -> Result<Vec<MatchResult>, ServiceError> {
        Self::require_role(principal, Role::Candidate)?;
        let profile = self.repository.profile(&principal.user_id)?;
        let postings = self.repository.postings()?;
        Ok(matching::recommend(postings, profile.as_ref()))
    }

    // --- Profiles ---

    pub fn profile(&self, principal: &Principal) -> Result<CandidateProfile, ServiceError> {
        self.repository
            .profile(&principal.user_id)?
            .ok_or(ServiceError::NotFound("profile"))
    }

    /// Create the caller's profile on first save, merge on later saves.
    pub fn save_profile(
        &self,
        principal: &Principal,
        draft: ProfileDraft,
    ) -> Result<CandidateProfile, ServiceError> {
        Self::require_role(principal, Role::Candidate)?;
        let mut profile = self
            .repository
            .profile(&principal.user_id)?
            .unwrap_or_else(|| CandidateProfile::empty(principal.user_id.clone()));

        if let Some(skills) = draft.skills {
            profile.skills = skills;
        }
        if draft.education.is_some() {
            profile.education = draft.education;
        }
        if draft.experience.is_some() {
            profile.experience = draft.experience;
        }

        Ok(self.repository.upsert_profile(profile)?)
    }

    /// Record an uploaded resume reference on the caller's profile,
    /// creating the profile if this is their first interaction.
    pub fn attach_resume(
        &self,
        principal: &Principal,
        resume_ref: String,
    ) -> Result<CandidateProfile, ServiceError> {
        Self::require_role(principal, Role::Candidate)?;
        if resume_ref.trim().is_empty() {
            return Err(ServiceError::Validation(
                "resume reference must not be empty".to_string(),
            ));
        }

        let mut profile = self
            .repository
            .profile(&principal.user_id)?
            .unwrap_or_else(|| CandidateProfile::empty(principal.user_id.clone()));
        profile.resume_ref = Some(resume_ref);
        Ok(self.repository.upsert_profile(profile)?)
    }

    // --- Reviews ---

    /// Analyze a cover letter without creating an application.
    ///
    /// The only fatal input is a blank letter; external-generator failures
    /// degrade inside the analyzer and never reach the caller.
    pub fn review_cover_letter(&self, request: &ReviewRequest) -> Result<ReviewResult, ServiceError> {
        if request.cover_letter.trim().is_empty() {
            return Err(ServiceError::Validation(
                "cover letter must not be empty".to_string(),
            ));
        }

        Ok(self.analyzer.analyze(
            &request.cover_letter,
            &request.company_name,
            &request.job_title,
        ))
    }

    /// Review the cover letter of an already submitted application.
    pub fn review_application(
        &self,
        principal: &Principal,
        id: &ApplicationId,
    ) -> Result<ReviewResult, ServiceError> {
        let application = self
            .repository
            .application(id)?
            .ok_or(ServiceError::NotFound("application"))?;
        if application.candidate_id != principal.user_id {
            return Err(ServiceError::Forbidden);
        }

        let posting = self
            .repository
            .posting(&application.posting_id)?
            .ok_or(ServiceError::NotFound("posting"))?;

        self.review_cover_letter(&ReviewRequest {
            cover_letter: application.cover_letter,
            company_name: posting.company_name,
            job_title: posting.title,
        })
    }

    // --- Application lifecycle ---

    /// Submit a new application. The review pipeline is a separate,
    /// caller-triggered step; nothing beyond persistence happens here.
    pub fn create_application(
        &self,
        principal: &Principal,
        draft: ApplicationDraft,
    ) -> Result<Application, ServiceError> {
        Self::require_role(principal, Role::Candidate)?;

        if draft.cover_letter.trim().is_empty() {
            return Err(ServiceError::Validation(
                "cover letter must not be empty".to_string(),
            ));
        }

        self.repository
            .posting(&draft.posting_id)?
            .ok_or(ServiceError::NotFound("posting"))?;

        let application = Application {
            id: next_application_id(),
            candidate_id: principal.user_id.clone(),
            posting_id: draft.posting_id,
            status: ApplicationStatus::Pending,
            cover_letter: draft.cover_letter,
            resume_ref: draft.resume_ref,
            additional_info: draft.additional_info,
            submitted_at: Utc::now(),
        };

        let stored = match self.repository.insert_application(application) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(ServiceError::DuplicateApplication),
            Err(other) => return Err(other.into()),
        };

        info!(
            application_id = %stored.id.0,
            posting_id = %stored.posting_id.0,
            "application submitted"
        );
        Ok(stored)
    }

    /// Transition an application's status. Only the employer owning the
    /// targeted posting may do this, and only along defined transitions.
    pub fn set_application_status(
        &self,
        principal: &Principal,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ServiceError> {
        Self::require_role(principal, Role::Employer)?;

        let mut application = self
            .repository
            .application(id)?
            .ok_or(ServiceError::NotFound("application"))?;
        let posting = self
            .repository
            .posting(&application.posting_id)?
            .ok_or(ServiceError::NotFound("posting"))?;
        if posting.employer_id != principal.user_id {
            return Err(ServiceError::Forbidden);
        }

        if !application.status.allows_transition_to(status) {
            return Err(ServiceError::InvalidTransition {
                from: application.status,
                to: status,
            });
        }

        application.status = status;
        self.repository.update_application(application.clone())?;
        info!(
            application_id = %application.id.0,
            status = status.label(),
            "application status updated"
        );
        Ok(application)
    }

    /// Every application the calling candidate has submitted, joined with
    /// its posting. Rows whose posting was since deleted are dropped.
    pub fn applications_for_candidate(
        &self,
        principal: &Principal,
    ) -> Result<Vec<CandidateApplicationView>, ServiceError> {
        Self::require_role(principal, Role::Candidate)?;
        let applications = self
            .repository
            .applications_for_candidate(&principal.user_id)?;

        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            if let Some(posting) = self.repository.posting(&application.posting_id)? {
                views.push(CandidateApplicationView {
                    application,
                    posting,
                });
            }
        }
        Ok(views)
    }

    /// Every application against the calling employer's postings, joined
    /// with the candidate id and posting title for triage listings.
    pub fn applications_for_employer(
        &self,
        principal: &Principal,
    ) -> Result<Vec<EmployerApplicationView>, ServiceError> {
        Self::require_role(principal, Role::Employer)?;
        let postings = self.repository.postings_for_employer(&principal.user_id)?;
        let ids: Vec<PostingId> = postings.iter().map(|posting| posting.id.clone()).collect();
        let applications = self.repository.applications_for_postings(&ids)?;

        let views = applications
            .into_iter()
            .map(|application| {
                let posting_title = postings
                    .iter()
                    .find(|posting| posting.id == application.posting_id)
                    .map(|posting| posting.title.clone())
                    .unwrap_or_default();
                EmployerApplicationView {
                    candidate_id: application.candidate_id.clone(),
                    posting_title,
                    application,
                }
            })
            .collect();
        Ok(views)
    }
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("access denied")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("already applied to this posting")]
    DuplicateApplication,
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("status cannot change from {} to {}", from.label(), to.label())]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// HTTP status used when the error crosses the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::DuplicateApplication => StatusCode::CONFLICT,
            ServiceError::Validation(_) | ServiceError::InvalidTransition { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
